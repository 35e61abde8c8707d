// brix/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use brix_core::domain::project::Materialization;

#[derive(Parser)]
#[command(name = "brix")]
#[command(about = "dbt companion: profile editing, project scaffolding and passthrough", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Skip the check for a newer brix release
    #[arg(long, global = true, env = "BRIX_NO_UPDATE_CHECK")]
    pub no_update_check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true, env = "BRIX_LOG", ignore_case = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, env = "BRIX_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "BRIX_LOG_JSON")]
    pub log_json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
    #[default]
    Off,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧱 Runs dbt commands: built-in helpers or passthrough to the dbt CLI
    Dbt(DbtArgs),
}

#[derive(Args)]
pub struct DbtArgs {
    /// Path to the dbt project directory. Cached for subsequent commands.
    #[arg(long, short = 'p')]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: DbtCommand,
}

#[derive(Subcommand)]
pub enum DbtCommand {
    /// 👤 Manages dbt profiles.yml
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// 🏗️ Scaffolds dbt projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Anything else is forwarded to dbt as-is
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// 📝 Creates profiles.yml from the bundled template
    Init {
        /// Path to profiles.yml (default: ~/.dbt/profiles.yml, env: BRIX_DBT_PROFILE_PATH)
        #[arg(long, short = 'p')]
        profile_path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// 🔍 Shows the resolved profile path and its contents
    Show {
        #[arg(long, short = 'p')]
        profile_path: Option<PathBuf>,
    },

    /// 📋 Lists profiles and outputs as a table
    List {
        #[arg(long, short = 'p')]
        profile_path: Option<PathBuf>,
    },

    /// ✏️ Edits profiles.yml (interactive without --action)
    Edit(EditArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long, short = 'p')]
    pub profile_path: Option<PathBuf>,

    /// Non-interactive action to perform
    #[arg(long, short, value_enum)]
    pub action: Option<EditAction>,

    /// Profile name
    #[arg(long, short = 'P')]
    pub profile: Option<String>,

    /// Output name
    #[arg(long, short)]
    pub output: Option<String>,

    /// Default target name
    #[arg(long, short)]
    pub target: Option<String>,

    /// DuckDB database path
    #[arg(long)]
    pub path: Option<String>,

    /// Thread count
    #[arg(long)]
    pub threads: Option<u32>,

    /// Skip confirmation for destructive actions
    #[arg(long, short)]
    pub force: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    AddProfile,
    EditProfile,
    DeleteProfile,
    AddOutput,
    EditOutput,
    DeleteOutput,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// 🌱 Creates a new dbt project skeleton
    Init(ProjectInitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProjectInitArgs {
    /// Project name (letters, digits and underscores)
    #[arg(long, short)]
    pub name: String,

    /// Profile the project connects with
    #[arg(long, short = 'p', default_value = "default")]
    pub profile: String,

    /// Base directory (env: BRIX_DBT_PROJECT_BASE_DIR, default: cwd)
    #[arg(long, short)]
    pub base_dir: Option<PathBuf>,

    /// Team subdirectory under the base directory
    #[arg(long, short)]
    pub team: Option<String>,

    /// Hub package to add to packages.yml (repeatable)
    #[arg(long = "package")]
    pub packages: Vec<String>,

    /// Default materialization for models
    #[arg(long, value_parser = parse_materialization, default_value = "view")]
    pub materialization: Materialization,

    /// Enable persist_docs for relations and columns
    #[arg(long)]
    pub persist_docs: bool,

    /// Include an example model and schema
    #[arg(long)]
    pub with_example: bool,

    /// Run `dbt deps` once the project is created
    #[arg(long)]
    pub run_deps: bool,

    /// Overwrite an existing project
    #[arg(long, short)]
    pub force: bool,
}

fn parse_materialization(value: &str) -> Result<Materialization, String> {
    value.parse()
}
