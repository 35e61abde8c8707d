// brix/src/main.rs

use clap::Parser;

use brix_core::BrixError;
use brix_core::domain::DomainError;
use brix_core::infrastructure::InfrastructureError;
use brix_core::infrastructure::config::CacheSettings;
use brix_core::infrastructure::version_check::VersionChecker;

mod cli;
mod commands;
mod interactive;
mod logging;

use cli::{Cli, Commands, DbtCommand, ProfileCommand, ProjectCommand};

fn main() {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing), off unless requested
    if let Err(e) = logging::init(&cli.log) {
        eprintln!("⚠️  {:#}", e);
    }

    // 2. Update notice, answered from the cache
    if !cli.no_update_check {
        notify_update();
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            report(e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let Commands::Dbt(dbt) = cli.command;

    match dbt.command {
        // --- USE CASE: PASSTHROUGH TO DBT ---
        DbtCommand::External(args) => return commands::passthrough::execute(dbt.project, args),

        // --- USE CASE: PROFILES ---
        DbtCommand::Profile(command) => match command {
            ProfileCommand::Init {
                profile_path,
                force,
            } => commands::profile::init(profile_path, force)?,
            ProfileCommand::Show { profile_path } => commands::profile::show(profile_path)?,
            ProfileCommand::List { profile_path } => commands::profile::list(profile_path)?,
            ProfileCommand::Edit(args) => commands::profile::edit(args)?,
        },

        // --- USE CASE: SCAFFOLDING ---
        DbtCommand::Project(ProjectCommand::Init(args)) => commands::project::init(args)?,
    }

    Ok(0)
}

fn notify_update() {
    let Ok(settings) = CacheSettings::resolve() else {
        return;
    };
    let current = env!("CARGO_PKG_VERSION");
    if let Some(latest) = VersionChecker::new(settings.version_file, current).check_for_updates() {
        eprintln!(
            "⬆️  Update available: {} → {}\n  cargo install brix --force",
            current, latest
        );
    }
}

/// Library errors are rendered as miette diagnostics (code + help).
fn report(err: anyhow::Error) {
    let diagnostic = err
        .downcast::<BrixError>()
        .map(miette::Report::new)
        .or_else(|err| err.downcast::<DomainError>().map(miette::Report::new))
        .or_else(|err| err.downcast::<InfrastructureError>().map(miette::Report::new));

    match diagnostic {
        Ok(report) => eprintln!("{:?}", report),
        Err(err) => eprintln!("❌ Error: {:#}", err),
    }
}
