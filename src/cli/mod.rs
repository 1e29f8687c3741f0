//! Command-line interface definition and command workflows.

pub mod orchestration;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::BumpLevels;

#[derive(Parser, Debug)]
#[command(
    name = "pepbump",
    version,
    about = "Keep a project version in one place and write it into every file that needs it"
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Print debug traces and the options in effect"
    )]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only print warnings and errors")]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Store file [default: pepbump.yaml]"
    )]
    pub store: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "History file, relative to the current directory \
                [default: pepbump_history.txt next to the store file]"
    )]
    pub history: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Custom configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a template store file and an empty history file
    Init {
        #[arg(long, help = "Replace an existing store file without asking")]
        overwrite: bool,
    },

    /// Print the current version
    CurrentVersion,

    /// Increment one or more version levels and update the managed files
    Bump {
        #[command(flatten)]
        levels: LevelArgs,

        #[command(flatten)]
        update: UpdateArgs,
    },

    /// Replace the version and update the managed files
    SetVersion {
        /// New version, e.g. 1.4.0rc1
        version: String,

        #[command(flatten)]
        update: UpdateArgs,
    },
}

/// Levels to increment; several may be combined but at least one is needed.
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = true)]
pub struct LevelArgs {
    #[arg(short = 'M', long)]
    pub major: bool,

    #[arg(short, long)]
    pub minor: bool,

    #[arg(short = 'u', long)]
    pub micro: bool,

    #[arg(short, long, conflicts_with_all = ["beta", "rc"])]
    pub alpha: bool,

    #[arg(short, long, conflicts_with = "rc")]
    pub beta: bool,

    #[arg(short, long)]
    pub rc: bool,

    #[arg(short, long)]
    pub post: bool,

    #[arg(short, long)]
    pub dev: bool,
}

impl LevelArgs {
    pub fn to_levels(&self) -> BumpLevels {
        BumpLevels {
            major: self.major,
            minor: self.minor,
            micro: self.micro,
            pre: BumpLevels::pre_from_flags(self.alpha, self.beta, self.rc),
            post: self.post,
            dev: self.dev,
        }
    }
}

/// Options shared by the commands that rewrite managed files.
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[arg(long, help = "Replace existing destination files without asking")]
    pub overwrite: bool,

    #[arg(long, help = "Print rendered files instead of writing anything")]
    pub dry_run: bool,

    #[arg(long, help = "Commit the changed files and push the current branch")]
    pub git_push: bool,

    #[arg(
        long,
        requires = "git_push",
        help = "Also create and push a tag named after the new version"
    )]
    pub git_tag: bool,

    #[arg(short = 'c', long, value_name = "TEXT", help = "Commit and history message")]
    pub message: Option<String>,
}
