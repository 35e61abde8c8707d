use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Isolated home for one test: profiles.yml, cache and projects live here.
struct BrixTestEnv {
    tmp: TempDir,
}

impl BrixTestEnv {
    fn new() -> Result<Self> {
        Ok(Self {
            tmp: tempfile::tempdir()?,
        })
    }

    fn profile_path(&self) -> PathBuf {
        self.tmp.path().join(".dbt").join("profiles.yml")
    }

    fn brix(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("brix"));
        cmd.current_dir(self.tmp.path())
            .env("BRIX_DBT_PROFILE_PATH", self.profile_path())
            .env("BRIX_CACHE_DIR", self.tmp.path().join("cache"))
            .env("BRIX_DBT_PROJECT_BASE_DIR", self.tmp.path().join("projects"))
            .env("BRIX_NO_UPDATE_CHECK", "1")
            .env_remove("BRIX_LOG")
            .env_remove("BRIX_LOG_PATH")
            .env_remove("BRIX_LOG_JSON");
        cmd
    }

    fn edit(&self, args: &[&str]) -> Command {
        let mut cmd = self.brix();
        cmd.args(["dbt", "profile", "edit"]).args(args);
        cmd
    }

    fn profiles(&self) -> Result<serde_yaml::Value> {
        Ok(serde_yaml::from_str(&fs::read_to_string(self.profile_path())?)?)
    }
}

#[test]
fn test_profile_init_then_refuse_then_force() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args(["dbt", "profile", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile created"));
    assert!(env.profile_path().exists());

    env.brix()
        .args(["dbt", "profile", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    env.brix()
        .args(["dbt", "profile", "init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile overwritten"));
    Ok(())
}

#[test]
fn test_profile_show_reports_missing_file() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args(["dbt", "profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exists: false"));
    Ok(())
}

#[test]
fn test_update_notice_comes_from_cache() -> Result<()> {
    let env = BrixTestEnv::new()?;
    let cache_dir = env.tmp.path().join("cache");
    fs::create_dir_all(&cache_dir)?;
    fs::write(
        cache_dir.join("version_check.json"),
        r#"{"last_check":"2999-01-01T00:00:00Z","latest_version":"99.0.0"}"#,
    )?;

    env.brix()
        .env_remove("BRIX_NO_UPDATE_CHECK")
        .args(["dbt", "profile", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Update available"))
        .stderr(predicate::str::contains("99.0.0"));

    env.brix()
        .args(["dbt", "profile", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Update available").not());
    Ok(())
}

#[test]
fn test_profile_list_requires_file() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args(["dbt", "profile", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
    Ok(())
}

#[test]
fn test_add_profile_on_missing_file_creates_it() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.edit(&["--action", "add-profile", "--profile", "sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added profile 'sandbox'"));

    let profiles = env.profiles()?;
    assert_eq!(profiles["sandbox"]["target"].as_str(), Some("dev"));
    assert_eq!(
        profiles["sandbox"]["outputs"]["dev"]["path"].as_str(),
        Some(":memory:")
    );
    assert_eq!(
        profiles["sandbox"]["outputs"]["dev"]["database"].as_str(),
        Some("memory")
    );

    env.brix()
        .args(["dbt", "profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sandbox"));
    Ok(())
}

#[test]
fn test_duplicate_profile_fails() -> Result<()> {
    let env = BrixTestEnv::new()?;
    env.brix().args(["dbt", "profile", "init"]).assert().success();
    let before = fs::read_to_string(env.profile_path())?;

    env.edit(&["--action", "add-profile", "--profile", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(env.profile_path())?, before);
    Ok(())
}

#[test]
fn test_output_lifecycle() -> Result<()> {
    let env = BrixTestEnv::new()?;
    env.brix().args(["dbt", "profile", "init"]).assert().success();

    env.edit(&[
        "--action",
        "add-output",
        "-P",
        "default",
        "-o",
        "prod",
        "--path",
        "prod.duckdb",
        "--threads",
        "4",
    ])
    .assert()
    .success();

    env.edit(&[
        "--action",
        "edit-output",
        "-P",
        "default",
        "-o",
        "prod",
        "--threads",
        "8",
    ])
    .assert()
    .success();
    assert_eq!(
        env.profiles()?["default"]["outputs"]["prod"]["threads"].as_u64(),
        Some(8)
    );

    env.edit(&[
        "--action",
        "edit-profile",
        "-P",
        "default",
        "-t",
        "prod",
    ])
    .assert()
    .success();
    assert_eq!(env.profiles()?["default"]["target"].as_str(), Some("prod"));

    env.edit(&["--action", "delete-output", "-P", "default", "-o", "dev", "-f"])
        .assert()
        .success();
    env.edit(&["--action", "delete-output", "-P", "default", "-o", "prod", "-f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only output"));

    let profiles = env.profiles()?;
    assert!(profiles["default"]["outputs"].get("dev").is_none());
    assert!(profiles["default"]["outputs"].get("prod").is_some());
    Ok(())
}

#[test]
fn test_invalid_threads_are_not_saved() -> Result<()> {
    let env = BrixTestEnv::new()?;
    env.brix().args(["dbt", "profile", "init"]).assert().success();
    let before = fs::read_to_string(env.profile_path())?;

    env.edit(&[
        "--action",
        "edit-output",
        "-P",
        "default",
        "-o",
        "dev",
        "--threads",
        "0",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("threads must be at least 1"));

    assert_eq!(fs::read_to_string(env.profile_path())?, before);
    Ok(())
}

#[test]
fn test_edit_output_requires_a_change() -> Result<()> {
    let env = BrixTestEnv::new()?;
    env.brix().args(["dbt", "profile", "init"]).assert().success();

    env.edit(&["--action", "edit-output", "-P", "default", "-o", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--path or --threads is required"));
    Ok(())
}

#[test]
fn test_delete_profile_with_force() -> Result<()> {
    let env = BrixTestEnv::new()?;
    env.brix().args(["dbt", "profile", "init"]).assert().success();

    env.edit(&["--action", "delete-profile", "-P", "default", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted profile 'default'"));

    env.edit(&["--action", "delete-profile", "-P", "default", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn test_project_init() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args([
            "dbt",
            "project",
            "init",
            "-n",
            "analytics",
            "-t",
            "finance",
            "--package",
            "dbt-labs/dbt_utils",
            "--with-example",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project created"));

    let root = env.tmp.path().join("projects").join("finance").join("analytics");
    assert!(root.join("dbt_project.yml").is_file());
    assert!(root.join("packages.yml").is_file());
    assert!(root.join("models/example/my_first_model.sql").is_file());

    env.brix()
        .args(["dbt", "project", "init", "-n", "analytics", "-t", "finance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    Ok(())
}

#[test]
fn test_project_init_rejects_bad_name() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args(["dbt", "project", "init", "-n", "my-project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project name"));
    Ok(())
}

#[test]
fn test_passthrough_rejects_missing_project() -> Result<()> {
    let env = BrixTestEnv::new()?;

    env.brix()
        .args(["dbt", "--project", "does_not_exist", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist"));
    Ok(())
}
