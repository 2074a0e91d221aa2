use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use uniquepack::archive;
use uniquepack::grouping;
use uniquepack::hasher::HashAlgorithm;
use uniquepack::logging;
use uniquepack::output::AnalysisReport;
use uniquepack::scanner;

#[derive(Parser, Debug)]
#[command(name = "uniquepack")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (-v for debug logs, -vv for trace logs)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze an existing directory regarding file duplicates
    Analyze {
        /// Path to the input directory
        #[arg(short = 'i', long = "input-directory")]
        input: PathBuf,

        /// Hash algorithm used to identify files
        #[arg(short = 'm', long = "hash-algorithm", value_enum, default_value_t = HashAlgorithm::Md5, env = "UNIQUEPACK_HASH_ALGORITHM")]
        algorithm: HashAlgorithm,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Pack the files of a directory into an archive without duplicates
    Pack {
        /// Path to the input directory
        #[arg(short = 'i', long = "input-directory")]
        input: PathBuf,

        /// Path of the archive to create (must not exist)
        #[arg(short = 'o', long = "output-directory")]
        output: PathBuf,

        /// Hash algorithm used to identify files
        #[arg(short = 'm', long = "hash-algorithm", value_enum, default_value_t = HashAlgorithm::Md5, env = "UNIQUEPACK_HASH_ALGORITHM")]
        algorithm: HashAlgorithm,
    },

    /// Reconstruct a previously packed directory at a given destination
    Unpack {
        /// Path to the (previously packed) archive
        #[arg(short = 'i', long = "input-directory")]
        input: PathBuf,

        /// Existing directory to restore into
        #[arg(short = 'o', long = "output-directory")]
        output: PathBuf,
    },
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> uniquepack::Result<()> {
    let verbose = cli.verbose > 0;
    let show_progress = !cli.no_progress;

    match cli.command {
        Command::Analyze {
            input,
            algorithm,
            format,
        } => {
            let files = scanner::scan_directory(&input)?;
            let detection = grouping::detect_duplicates(files, algorithm)?;
            let report = AnalysisReport::from_detection(&detection, algorithm, &input);

            match format {
                OutputFormat::Human => report.print_human(verbose),
                OutputFormat::Json => report.print_json(),
            }
        }
        Command::Pack {
            input,
            output,
            algorithm,
        } => {
            let summary = archive::pack_with_progress(&input, &output, algorithm, show_progress)?;
            println!(
                "packed {} files into {} unique files ({} bytes)",
                summary.files, summary.classes, summary.bytes_copied
            );
        }
        Command::Unpack { input, output } => {
            let summary = archive::unpack_with_progress(&input, &output, show_progress)?;
            println!(
                "restored {} files from {} unique files",
                summary.restored, summary.classes
            );
        }
    }

    Ok(())
}
