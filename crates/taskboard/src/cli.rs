//! Clap derive structures for the `taskboard` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// taskboard -- boards, lists and tasks from the command line
#[derive(Debug, Parser)]
#[command(
    name = "taskboard",
    version,
    about = "Manage task boards from the command line",
    long_about = "A command-line client for a Trello-style task board server.\n\n\
        Boards hold ordered lists, lists hold ordered tasks. Every change is\n\
        saved to the server as soon as it is made.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "TASKBOARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Board server URL (overrides profile)
    #[arg(long, short = 's', env = "TASKBOARD_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TASKBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TASKBOARD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TASKBOARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Register(RegisterArgs),

    /// Sign in and remember the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage boards
    #[command(alias = "b")]
    Boards(BoardsArgs),

    /// Manage the lists of a board
    #[command(alias = "l")]
    Lists(ListsArgs),

    /// Manage the tasks of a list
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Email address
    #[arg(long, short = 'e')]
    pub email: String,

    /// Username (3-20 letters, digits or underscores)
    #[arg(long, short = 'u')]
    pub username: String,

    /// Password (prompted twice when omitted)
    #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(long, short = 'e')]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOARDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BoardsArgs {
    #[command(subcommand)]
    pub command: BoardsCommand,
}

/// Background selection shared by `boards create` and `boards edit`.
#[derive(Debug, Args)]
pub struct BackgroundArgs {
    /// Preset color background (0-5)
    #[arg(long, value_name = "N", conflicts_with = "image")]
    pub color: Option<usize>,

    /// Preset image background (0-3)
    #[arg(long, value_name = "N")]
    pub image: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum BoardsCommand {
    /// List open boards
    #[command(alias = "ls")]
    List {
        /// Only starred boards
        #[arg(long)]
        starred: bool,
    },

    /// List closed boards
    Closed,

    /// Show a board with its lists and tasks
    Show {
        /// Board ID or title
        board: String,
    },

    /// Create a board
    Create {
        /// Board title
        title: String,

        #[command(flatten)]
        background: BackgroundArgs,
    },

    /// Change a board's title or background
    Edit {
        /// Board ID or title
        board: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        background: BackgroundArgs,
    },

    /// Star or unstar a board
    Star {
        /// Board ID or title
        board: String,
    },

    /// Close a board (hides it from the dashboard)
    Close {
        /// Board ID or title
        board: String,
    },

    /// Reopen a closed board
    Reopen {
        /// Board ID or title
        board: String,
    },

    /// Permanently delete a board
    #[command(alias = "rm")]
    Delete {
        /// Board ID or title
        board: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LISTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub command: ListsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListsCommand {
    /// Append a list to a board
    Add {
        /// Board ID or title
        board: String,
        /// List title
        title: String,
    },

    /// Rename a list
    Rename {
        /// Board ID or title
        board: String,
        /// List ID or title
        list: String,
        /// New title
        title: String,
    },

    /// Delete a list and its tasks
    #[command(alias = "rm")]
    Delete {
        /// Board ID or title
        board: String,
        /// List ID or title
        list: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

/// Locates one task.
#[derive(Debug, Args)]
pub struct TaskRef {
    /// Board ID or title
    pub board: String,
    /// List ID or title
    pub list: String,
    /// Task ID or title
    pub task: String,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// Append a task to a list
    Add {
        /// Board ID or title
        board: String,
        /// List ID or title
        list: String,
        /// Task title
        title: String,
    },

    /// Change a task's title
    Edit {
        #[command(flatten)]
        target: TaskRef,
        /// New title
        title: String,
    },

    /// Set or clear a task's description
    Describe {
        #[command(flatten)]
        target: TaskRef,
        /// Description text (omit to clear)
        description: Option<String>,
    },

    /// Flip a task between open and completed
    Toggle {
        #[command(flatten)]
        target: TaskRef,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        #[command(flatten)]
        target: TaskRef,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, save_policy, session, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
