use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Inspect and pack index-fs images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a fresh volume
    Format {
        #[arg(long, short)]
        image: PathBuf,

        /// Volume size in 512-byte sectors
        #[arg(long, short, default_value_t = 4096)]
        sectors: u32,
    },

    /// Copy a host file into the volume
    Put {
        #[arg(long, short)]
        image: PathBuf,

        host_file: PathBuf,

        /// Name inside the volume, defaults to the host file name
        #[arg(long, short)]
        name: Option<String>,
    },

    /// Copy a file out of the volume
    Get {
        #[arg(long, short)]
        image: PathBuf,

        name: String,

        /// Defaults to standard output
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// List the files in the volume
    Ls {
        #[arg(long, short)]
        image: PathBuf,
    },

    /// Remove a file from the volume
    Rm {
        #[arg(long, short)]
        image: PathBuf,

        name: String,
    },

    /// Show volume usage
    Stat {
        #[arg(long, short)]
        image: PathBuf,
    },
}
