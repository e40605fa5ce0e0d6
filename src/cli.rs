use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "spk")]
#[command(version)]
#[command(about = "SPK archive extractor and packer", long_about = None)]
#[command(after_help = "Examples:\n  \
  spk extract data.spk data/              extract data.spk into data/\n  \
  spk pack data/ data.spk --overwrite     rebuild data.spk, keeping the order in data/__files__.txt\n  \
  spk list -l data.spk                    show sizes and offsets of every entry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Show debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract an archive into a directory
    Extract {
        /// SPK archive to read
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Directory to create
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Replace the output directory if it exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Pack a directory into an archive
    Pack {
        /// Directory to pack
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// SPK archive to create
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Replace the archive if it exists
        #[arg(long)]
        overwrite: bool,
    },

    /// List archive contents
    List {
        /// SPK archive to read
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Show sizes, ratio and offsets
        #[arg(short = 'l', long = "long")]
        long: bool,
    },
}

impl Cli {
    /// Most verbose level to log; progress lines are `INFO`.
    pub fn log_level(&self) -> Level {
        match (self.verbose, self.quiet) {
            (true, 0) => Level::DEBUG,
            (_, 0) => Level::INFO,
            (_, 1) => Level::WARN,
            _ => Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extract_with_overwrite() {
        let cli = Cli::try_parse_from(["spk", "extract", "a.spk", "out", "--overwrite"]).unwrap();
        match cli.command {
            Command::Extract {
                ref archive,
                ref output_dir,
                overwrite,
            } => {
                assert_eq!(*archive, PathBuf::from("a.spk"));
                assert_eq!(*output_dir, PathBuf::from("out"));
                assert!(overwrite);
            }
            ref other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn parses_pack_defaults() {
        let cli = Cli::try_parse_from(["spk", "pack", "dir", "b.spk"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Pack {
                overwrite: false,
                ..
            }
        ));
    }

    #[test]
    fn verbosity_flags() {
        let cli = Cli::try_parse_from(["spk", "list", "-l", "a.spk", "-qq"]).unwrap();
        assert!(matches!(cli.command, Command::List { long: true, .. }));
        assert_eq!(cli.log_level(), Level::ERROR);

        let cli = Cli::try_parse_from(["spk", "-v", "list", "a.spk"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);

        let cli = Cli::try_parse_from(["spk", "-q", "list", "a.spk"]).unwrap();
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn missing_arguments_fail() {
        assert!(Cli::try_parse_from(["spk", "pack", "dir"]).is_err());
        assert!(Cli::try_parse_from(["spk", "unpack", "a", "b"]).is_err());
    }
}
