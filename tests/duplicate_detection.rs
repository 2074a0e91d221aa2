mod common;

use common::{create_file, uniquepack};
use tempfile::TempDir;

fn analyze_json(dir: &std::path::Path, algorithm: &str) -> serde_json::Value {
    let output = uniquepack()
        .arg("analyze")
        .arg("-i")
        .arg(dir)
        .arg("-m")
        .arg(algorithm)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).unwrap()
}

fn duplicate_groups(json: &serde_json::Value) -> Vec<&serde_json::Value> {
    json["groups"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|g| g.as_array().unwrap().len() > 1)
        .collect()
}

#[test]
fn test_finds_identical_files() {
    let dir = TempDir::new().unwrap();
    let content = b"identical content";
    create_file(dir.path(), "a.txt", content);
    create_file(dir.path(), "b.txt", content);

    let json = analyze_json(dir.path(), "md5");

    assert_eq!(json["unique_files"], 1);
    assert_eq!(json["total_files"], 2);
    assert_eq!(json["is_unique"], false);
    assert_eq!(duplicate_groups(&json).len(), 1);
}

#[test]
fn test_handles_different_files() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"content a");
    create_file(dir.path(), "b.txt", b"content b");

    let json = analyze_json(dir.path(), "sha1");

    assert_eq!(json["unique_files"], 2);
    assert_eq!(json["is_unique"], true);
    assert!(duplicate_groups(&json).is_empty());
}

#[test]
fn test_large_files_differing_after_first_chunk() {
    let dir = TempDir::new().unwrap();
    let mut content_a = b"test2".repeat(16384);
    content_a.push(b'a');
    let mut content_b = b"test2".repeat(16384);
    content_b.push(b'b');
    create_file(dir.path(), "large_a.bin", &content_a);
    create_file(dir.path(), "large_b.bin", &content_b);

    let json = analyze_json(dir.path(), "sha256");

    assert_eq!(json["is_unique"], true);
    assert_eq!(json["unique_files"], 2);
}

#[test]
fn test_multiple_duplicate_groups() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "group1_a.txt", b"group one content");
    create_file(dir.path(), "group1_b.txt", b"group one content");
    create_file(dir.path(), "group2_a.txt", b"group two content");
    create_file(dir.path(), "group2_b.txt", b"group two content");
    create_file(dir.path(), "lonely.txt", b"lonely");

    let json = analyze_json(dir.path(), "sha512");

    assert_eq!(json["unique_files"], 3);
    let groups = duplicate_groups(&json);
    assert_eq!(groups.len(), 2);
    for group in groups {
        assert_eq!(group.as_array().unwrap().len(), 2);
    }
}

#[test]
fn test_every_algorithm_agrees() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"triple duplicate");
    create_file(dir.path(), "b/c.txt", b"triple duplicate");
    create_file(dir.path(), "b/d/e.txt", b"triple duplicate");
    create_file(dir.path(), "f.txt", b"something else!!");

    for algorithm in ["md5", "sha1", "sha256", "sha512", "blake3"] {
        let json = analyze_json(dir.path(), algorithm);

        assert_eq!(json["algorithm"], algorithm);
        assert_eq!(json["unique_files"], 2);
        let groups = duplicate_groups(&json);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].as_array().unwrap().len(), 3);
    }
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();

    let json = analyze_json(dir.path(), "md5");

    assert_eq!(json["unique_files"], 0);
    assert_eq!(json["is_unique"], true);
    assert!(json["groups"].as_array().unwrap().is_empty());
}
