// brix/src/commands/profile.rs
//
// USE CASE: Manage profiles.yml (init, show, list, edit).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use comfy_table::{Cell, ContentArrangement, Table, presets};

use brix_core::BrixError;
use brix_core::application::editor;
use brix_core::application::init_profile;
use brix_core::domain::profile::{DuckDbOutput, MEMORY_PATH, OutputConfig, OutputUpdate, ProfileDocument};
use brix_core::infrastructure::InfrastructureError;
use brix_core::infrastructure::config::{ProfileSettings, load_profiles, save_profiles};
use brix_core::infrastructure::templates::PROFILES_TEMPLATE;

use crate::cli::{EditAction, EditArgs};
use crate::interactive;

const DEFAULT_TARGET: &str = "dev";

pub fn init(profile_path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let settings = ProfileSettings::resolve(profile_path)?;
    let result = init_profile(&settings, force, PROFILES_TEMPLATE)?;
    println!("✨ {}", result.message);
    Ok(())
}

pub fn show(profile_path: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = ProfileSettings::resolve(profile_path)?;
    let path = &settings.profile_path;
    let exists = path.exists();

    println!("Profile path: {}", path.display());
    println!("Exists: {}", exists);

    if exists {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        println!("\nContents:");
        println!("{}", content);
    }
    Ok(())
}

pub fn list(profile_path: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = ProfileSettings::resolve(profile_path)?;
    let document = load_profiles(&settings.profile_path)?;

    if document.is_empty() {
        println!("No profiles defined in {}", settings.profile_path.display());
        return Ok(());
    }
    println!("{}", profiles_table(&document));
    Ok(())
}

fn profiles_table(document: &ProfileDocument) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Profile", "Output", "Type", "Threads", "Target"]);

    for (name, profile) in document.iter() {
        for (output_name, output) in &profile.outputs {
            let marker = if *output_name == profile.target { "*" } else { "" };
            table.add_row(vec![
                Cell::new(name),
                Cell::new(output_name),
                Cell::new(output.type_name()),
                Cell::new(output.threads()),
                Cell::new(marker),
            ]);
        }
    }
    table
}

pub fn edit(args: EditArgs) -> anyhow::Result<()> {
    let settings = ProfileSettings::resolve(args.profile_path.clone())?;
    let path = settings.profile_path.as_path();

    match args.action {
        None => interactive::run(path),
        Some(action) => {
            let document = load_or_empty(path)?;
            run_action(action, &args, &document, path)
        }
    }
}

/// A missing file is treated as an empty document.
pub fn load_or_empty(path: &Path) -> Result<ProfileDocument, BrixError> {
    match load_profiles(path) {
        Err(BrixError::Infrastructure(InfrastructureError::NotFound(_))) => {
            Ok(ProfileDocument::new())
        }
        other => other,
    }
}

fn run_action(
    action: EditAction,
    args: &EditArgs,
    document: &ProfileDocument,
    path: &Path,
) -> anyhow::Result<()> {
    let message = match action {
        EditAction::AddProfile => {
            let profile = required(&args.profile, "--profile", "add-profile")?;
            let target = args.target.as_deref().unwrap_or(DEFAULT_TARGET);
            let output_name = args.output.as_deref().unwrap_or(target);
            let next = editor::add_profile(document, profile, target, output_name, duckdb_output(args)?)?;
            save_profiles(&next, path)?;
            format!("Added profile '{}'", profile)
        }
        EditAction::EditProfile => {
            let profile = required(&args.profile, "--profile", "edit-profile")?;
            let target = required(&args.target, "--target", "edit-profile")?;
            let next = editor::update_profile_target(document, profile, target)?;
            save_profiles(&next, path)?;
            format!("Updated profile '{}' target to '{}'", profile, target)
        }
        EditAction::DeleteProfile => {
            let profile = required(&args.profile, "--profile", "delete-profile")?;
            confirm(args.force, &format!("Delete profile '{}'?", profile))?;
            let next = editor::delete_profile(document, profile)?;
            save_profiles(&next, path)?;
            format!("Deleted profile '{}'", profile)
        }
        EditAction::AddOutput => {
            let profile = required(&args.profile, "--profile", "add-output")?;
            let output = required(&args.output, "--output", "add-output")?;
            let next = editor::add_output(document, profile, output, duckdb_output(args)?)?;
            save_profiles(&next, path)?;
            format!("Added output '{}' to profile '{}'", output, profile)
        }
        EditAction::EditOutput => {
            let profile = required(&args.profile, "--profile", "edit-output")?;
            let output = required(&args.output, "--output", "edit-output")?;
            let update = OutputUpdate {
                path: args.path.clone(),
                threads: args.threads,
            };
            if update.is_empty() {
                bail!("--path or --threads is required for edit-output");
            }
            let next = editor::update_output(document, profile, output, &update)?;
            save_profiles(&next, path)?;
            format!("Updated output '{}' in profile '{}'", output, profile)
        }
        EditAction::DeleteOutput => {
            let profile = required(&args.profile, "--profile", "delete-output")?;
            let output = required(&args.output, "--output", "delete-output")?;
            confirm(
                args.force,
                &format!("Delete output '{}' from profile '{}'?", output, profile),
            )?;
            let next = editor::delete_output(document, profile, output)?;
            save_profiles(&next, path)?;
            format!("Deleted output '{}' from profile '{}'", output, profile)
        }
    };

    println!("✅ {}", message);
    Ok(())
}

fn required<'a>(value: &'a Option<String>, flag: &str, action: &str) -> anyhow::Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{} is required for {}", flag, action),
    }
}

fn duckdb_output(args: &EditArgs) -> anyhow::Result<OutputConfig> {
    let path = args.path.as_deref().unwrap_or(MEMORY_PATH);
    let threads = args.threads.unwrap_or(1);
    Ok(DuckDbOutput::new(path, threads)?.into())
}

fn confirm(force: bool, question: &str) -> anyhow::Result<()> {
    if force {
        return Ok(());
    }
    let confirmed = inquire::Confirm::new(question)
        .with_default(false)
        .prompt()
        .context("Confirmation cancelled")?;
    if !confirmed {
        bail!("Aborted");
    }
    Ok(())
}
