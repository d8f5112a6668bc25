use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    output::Format,
    source::{
        local::LocalPage,
        proxy::{DEFAULT_PROXY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER},
    },
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only print the report and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a Scholar profile through the reader proxy and list its latest publications
    Fetch {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Reader proxy the Scholar listing URL is appended to
        #[arg(long, value_name = "URL", default_value = DEFAULT_PROXY)]
        proxy: String,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        /// Also save the fetched page text, for later use with `parse`
        #[arg(long, value_name = "PATH")]
        save_raw: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the publications on an already-saved profile page
    Parse {
        /// Saved page text; `-` or nothing reads stdin
        #[arg(value_name = "INPUT", default_value = "-")]
        input: LocalPage,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Scholar profile id (the `user=` query parameter)
    #[arg(long, value_name = "ID", default_value = DEFAULT_USER)]
    pub user: String,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}
