//! CLI entry point for taskdeck.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use taskdeck_core::{ImportanceLevel, ProgressState};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Personal task tracking backed by a local document store.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: personal tasks with priorities, checklists, and progress tracking"
)]
struct Cli {
    /// Directory holding `.taskdeck/` (defaults to current).
    #[arg(long)]
    workdir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign it in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in to an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due day as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        importance: Option<ImportanceLevel>,
        #[arg(short = 's', long = "subtask")]
        subtasks: Vec<String>,
    },

    /// List tasks after search, filters, and sorting.
    Ls {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        importance: Option<ImportanceLevel>,
        #[arg(long)]
        status: Option<ProgressState>,
        /// Most recently completed first.
        #[arg(long)]
        sort_by_completion: bool,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Show every field of a task.
    Show {
        /// Task id or unique id prefix.
        #[arg(long)]
        task: String,
    },

    /// Move a task to UNDERWAY.
    Start {
        #[arg(long)]
        task: String,
    },

    /// Move a task to any status.
    Status {
        #[arg(long)]
        task: String,
        #[arg(long)]
        to: ProgressState,
    },

    /// Mark a task as CONCLUDED.
    Done {
        #[arg(long)]
        task: String,
    },

    /// Change fields of an existing task.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due day as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        importance: Option<ImportanceLevel>,
        /// Append a checklist item.
        #[arg(short = 's', long = "subtask")]
        subtasks: Vec<String>,
        /// Toggle the checklist item at this 1-based position.
        #[arg(long = "toggle")]
        toggles: Vec<usize>,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        task: String,
    },

    /// Count listed tasks per status.
    Summary,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
enum LsFormat {
    #[default]
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { workdir, cmd } = Cli::parse();
    install_tracing();

    let workdir = workdir.unwrap_or_else(|| PathBuf::from("."));
    tokio::runtime::Runtime::new()?.block_on(commands::run(&workdir, cmd))
}

fn install_tracing() {
    // RUST_LOG overrides; INFO by default.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
