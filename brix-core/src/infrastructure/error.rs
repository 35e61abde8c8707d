// brix-core/src/infrastructure/error.rs

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(brix::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("File not found at '{}'", .0.display())]
    #[diagnostic(code(brix::infra::not_found))]
    NotFound(PathBuf),

    #[error("Could not determine the home directory")]
    #[diagnostic(
        code(brix::infra::home),
        help("Set BRIX_DBT_PROFILE_PATH or pass --profile-path explicitly.")
    )]
    HomeDirUnavailable,

    // --- CACHE ---
    #[error("JSON Error: {0}")]
    #[diagnostic(code(brix::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Cached project path '{}' no longer exists", .0.display())]
    #[diagnostic(
        code(brix::infra::cache),
        help("Please specify a valid project path with --project.")
    )]
    CachedPathNotFound(PathBuf),

    // --- UPDATE CHECK ---
    #[error("HTTP Error: {0}")]
    #[diagnostic(code(brix::infra::http))]
    Http(#[from] reqwest::Error),

    // --- TEMPLATES / SCAFFOLDING ---
    #[error("Template '{0}' not found")]
    #[diagnostic(code(brix::infra::template))]
    TemplateNotFound(String),

    #[error("Profile already exists at {}. Use --force to overwrite.", .0.display())]
    #[diagnostic(code(brix::infra::profile_exists))]
    ProfileFileExists(PathBuf),

    #[error("Project already exists at {}. Use --force to overwrite.", .0.display())]
    #[diagnostic(code(brix::infra::project_exists))]
    ProjectExists(PathBuf),

    // --- DBT LAUNCHER ---
    #[error("dbt executable '{0}' not found in PATH")]
    #[diagnostic(
        code(brix::infra::dbt_missing),
        help("Ensure dbt is installed and available, or install brix in the same environment as dbt.")
    )]
    DbtNotFound(String),

    #[error("Project path '{}' does not exist or is not a directory", .0.display())]
    #[diagnostic(code(brix::infra::project_path))]
    InvalidProjectPath(PathBuf),
}
