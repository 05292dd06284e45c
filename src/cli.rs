use clap::Parser;
use shoebox_config::Config;
use shoebox_storage::TransferMode;
use std::path::PathBuf;

/// Sorts camera dumps into a year/month shoebox.
///
/// Every flag is optional on the command line because it may come from the
/// config file or environment instead; [`Cli::apply`] layers the flags on
/// top of whatever [`Config::load`] resolved.
#[derive(Debug, Parser)]
#[command(name = "shoebox", version, about)]
pub struct Cli {
    /// Directory containing the media files to organize.
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory receiving the year/month hierarchy.
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Copy files instead of moving them.
    #[arg(long, conflicts_with = "move_files")]
    pub copy: bool,

    /// Move files out of the source directory (the default).
    #[arg(long = "move")]
    pub move_files: bool,

    /// Descend into subdirectories of the source.
    #[arg(short, long)]
    pub recursive: bool,

    /// Path of the journal database (defaults to the platform data dir).
    #[arg(long)]
    pub journal: Option<PathBuf>,
}

impl Cli {
    /// Layer the command-line flags over a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(target) = &self.target {
            config.target = Some(target.clone());
        }
        if self.copy {
            config.mode = TransferMode::Copy;
        }
        if self.move_files {
            config.mode = TransferMode::Move;
        }
        if self.recursive {
            config.recursive = true;
        }
        if let Some(journal) = &self.journal {
            config.journal = Some(journal.clone());
        }
    }
}
