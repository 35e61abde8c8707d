// brix-core/src/application/project_init.rs

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::profile_init::InitAction;
use crate::domain::project::{DbtPackages, DbtProject, Materialization, validate_project_name};
use crate::error::BrixError;
use crate::infrastructure::config::ProjectSettings;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::templates::{
    EXAMPLE_MODEL_TEMPLATE, EXAMPLE_SCHEMA_TEMPLATE, GITIGNORE_TEMPLATE, get_template,
};

pub const PROJECT_DIRECTORIES: [&str; 6] =
    ["models", "seeds", "tests", "macros", "snapshots", "analyses"];

/// Version constraints used for well-known hub packages.
pub const DEFAULT_PACKAGE_VERSIONS: [(&str, &str); 5] = [
    ("dbt-labs/dbt_utils", ">=1.0.0"),
    ("elementary-data/elementary", ">=0.13.0"),
    ("dbt-labs/codegen", ">=0.12.0"),
    ("calogica/dbt_expectations", ">=0.10.0"),
    ("dbt-labs/audit_helper", ">=0.9.0"),
];

const FALLBACK_PACKAGE_VERSION: &str = ">=0.1.0";

pub fn package_version(package: &str) -> &'static str {
    DEFAULT_PACKAGE_VERSIONS
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, version)| *version)
        .unwrap_or(FALLBACK_PACKAGE_VERSION)
}

#[derive(Debug, Clone, Default)]
pub struct ProjectInitOptions {
    pub name: String,
    pub profile: String,
    pub base_dir: Option<PathBuf>,
    pub team: Option<String>,
    /// `None` skips `packages.yml` entirely.
    pub packages: Option<Vec<String>>,
    pub materialization: Materialization,
    pub persist_docs: bool,
    pub with_example: bool,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInitResult {
    pub project_path: PathBuf,
    pub action: InitAction,
    pub message: String,
    /// Relative to `project_path`, in creation order.
    pub files_created: Vec<String>,
}

/// `<base>/<team>/<name>` or `<base>/<name>`. The base is the explicit
/// value, then the configured one, then the cwd; relative bases are
/// anchored at the cwd.
pub fn resolve_project_path(
    name: &str,
    base_dir: Option<&Path>,
    team: Option<&str>,
    settings: &ProjectSettings,
) -> Result<PathBuf, BrixError> {
    let cwd = env::current_dir()?;
    let base = base_dir
        .map(Path::to_path_buf)
        .or_else(|| settings.base_dir.clone())
        .unwrap_or_else(|| cwd.clone());
    let base = if base.is_absolute() {
        base
    } else {
        cwd.join(base)
    };

    Ok(match team {
        Some(team) => base.join(team).join(name),
        None => base.join(name),
    })
}

#[instrument(skip_all, fields(project = %options.name))]
pub fn init_project(
    options: &ProjectInitOptions,
    settings: &ProjectSettings,
) -> Result<ProjectInitResult, BrixError> {
    validate_project_name(&options.name)?;

    let project_path = resolve_project_path(
        &options.name,
        options.base_dir.as_deref(),
        options.team.as_deref(),
        settings,
    )?;
    debug!(path = %project_path.display(), "Resolved project path");

    let exists = project_path.join("dbt_project.yml").exists();
    if exists && !options.force {
        return Err(InfrastructureError::ProjectExists(project_path).into());
    }
    let action = if exists {
        InitAction::Overwritten
    } else {
        InitAction::Created
    };

    fs::create_dir_all(&project_path)?;
    let files_created = create_project_structure(&project_path, options)?;

    info!(%action, path = %project_path.display(), "Project initialized");
    Ok(ProjectInitResult {
        message: format!("Project {} at {}", action, project_path.display()),
        project_path,
        action,
        files_created,
    })
}

fn create_project_structure(
    root: &Path,
    options: &ProjectInitOptions,
) -> Result<Vec<String>, BrixError> {
    let mut created = Vec::new();

    for dir in PROJECT_DIRECTORIES {
        fs::create_dir_all(root.join(dir))?;
        let keep = format!("{}/.gitkeep", dir);
        write_file(root, &keep, "", &mut created)?;
    }

    let project = DbtProject::new(options.name.as_str(), options.profile.as_str())?
        .with_model_defaults(options.materialization, options.persist_docs);
    write_file(root, "dbt_project.yml", &project.to_yaml()?, &mut created)?;

    if let Some(names) = &options.packages {
        let mut packages = DbtPackages::default();
        for name in names {
            packages.add_hub_package(name.as_str(), package_version(name));
        }
        write_file(root, "packages.yml", &packages.to_yaml()?, &mut created)?;
    }

    write_file(root, ".gitignore", get_template(GITIGNORE_TEMPLATE)?, &mut created)?;

    if options.with_example {
        fs::create_dir_all(root.join("models").join("example"))?;
        write_file(
            root,
            "models/example/my_first_model.sql",
            get_template(EXAMPLE_MODEL_TEMPLATE)?,
            &mut created,
        )?;
        write_file(
            root,
            "models/example/schema.yml",
            get_template(EXAMPLE_SCHEMA_TEMPLATE)?,
            &mut created,
        )?;
    }

    Ok(created)
}

fn write_file(
    root: &Path,
    relative: &str,
    content: &str,
    created: &mut Vec<String>,
) -> Result<(), BrixError> {
    let path = root.join(relative);
    fs::write(&path, content)?;
    debug!(path = %path.display(), "Created");
    created.push(relative.to_string());
    Ok(())
}
