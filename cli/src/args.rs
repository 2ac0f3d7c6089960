use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "diary")]
#[command(about = "Keep a photo diary of your travels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Where the identity and config files live
    #[arg(long, global = true, env = "DIARY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Travel service root, overrides config.json
    #[arg(long, global = true, env = "DIARY_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds, overrides config.json
    #[arg(long, global = true, env = "DIARY_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Sign in by caching your profile locally
    Login {
        #[arg(long)]
        name: String,

        /// Used as your user id for every request
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        photo_url: String,
    },

    /// Forget the cached profile
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// List your travel entries
    #[command(alias = "ls")]
    List,

    /// Show a single entry
    Show { id: i64 },

    /// Upload a new entry
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Photo to attach (JPEG, PNG or WebP)
        #[arg(long)]
        image: PathBuf,
    },

    /// Replace an entry's title, description and photo
    Edit {
        id: i64,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        image: PathBuf,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
