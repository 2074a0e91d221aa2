//! Diagnostic logging through the `log` facade with an `env_logger` backend.
//!
//! `RUST_LOG` takes precedence when set. Otherwise the `-v` count picks the level:
//! warnings only by default, `debug` with `-v`, `trace` with `-vv`. Everything is
//! written to stderr so reports on stdout stay machine-readable.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging once; later calls are ignored.
pub fn init_logging(verbose: u8) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    if builder.try_init().is_ok() {
        log::debug!("logging initialized at level {}", log::max_level());
    }
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
