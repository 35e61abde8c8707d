// brix-core/src/infrastructure/version_check.rs
//
// Update notice backed by GitHub releases. The cached answer is returned
// immediately; a stale cache is refreshed on a background thread so the
// notice shows up on a later run. Failures only reach the debug log.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, ensure_parent_dir};

pub const RELEASES_URL: &str = "https://api.github.com/repos/Spycner/brix/releases/latest";

const CHECK_INTERVAL_HOURS: i64 = 24;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Last known release, as written to `version_check.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCache {
    pub last_check: DateTime<Utc>,
    pub latest_version: String,
}

impl VersionCache {
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.last_check > TimeDelta::hours(CHECK_INTERVAL_HOURS)
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

#[derive(Debug, Clone)]
pub struct VersionChecker {
    cache_file: PathBuf,
    current_version: String,
    url: String,
}

impl VersionChecker {
    pub fn new(cache_file: impl Into<PathBuf>, current_version: impl Into<String>) -> Self {
        Self {
            cache_file: cache_file.into(),
            current_version: current_version.into(),
            url: RELEASES_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns the cached latest version when it is newer than the running
    /// one. Never blocks on the network.
    pub fn check_for_updates(&self) -> Option<String> {
        let cache = self.load_cache();

        if cache.as_ref().is_none_or(|c| c.is_stale(Utc::now())) {
            debug!("Version cache stale, spawning background refresh");
            self.spawn_refresh();
        }

        let cache = cache?;
        if is_newer(&cache.latest_version, &self.current_version) {
            debug!(current = %self.current_version, latest = %cache.latest_version, "Update available");
            Some(cache.latest_version)
        } else {
            None
        }
    }

    /// Unreadable or corrupt caches count as missing.
    pub fn load_cache(&self) -> Option<VersionCache> {
        let content = match fs::read_to_string(&self.cache_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.cache_file.display(), "Version cache file not found");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "Failed to read version cache");
                return None;
            }
        };

        serde_json::from_str(&content)
            .inspect_err(|e| debug!(error = %e, "Failed to parse version cache"))
            .ok()
    }

    pub fn store(
        &self,
        latest_version: &str,
        now: DateTime<Utc>,
    ) -> Result<VersionCache, InfrastructureError> {
        let cache = VersionCache {
            last_check: now,
            latest_version: latest_version.to_string(),
        };
        ensure_parent_dir(&self.cache_file)?;
        atomic_write(&self.cache_file, serde_json::to_string_pretty(&cache)?)?;
        debug!(path = %self.cache_file.display(), "Version cache updated");
        Ok(cache)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub fn fetch_latest(&self) -> Result<String, InfrastructureError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("brix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let release: GitHubRelease = client.get(&self.url).send()?.error_for_status()?.json()?;
        let latest = release.tag_name.trim_start_matches('v').to_string();
        debug!(%latest, "Latest release");
        Ok(latest)
    }

    pub fn refresh(&self) -> Result<VersionCache, InfrastructureError> {
        let latest = self.fetch_latest()?;
        self.store(&latest, Utc::now())
    }

    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let checker = self.clone();
        thread::spawn(move || {
            if let Err(e) = checker.refresh() {
                debug!(error = %e, "Failed to refresh version cache");
            }
        })
    }
}

/// Dotted numeric versions compare component-wise; anything else is
/// "newer" when it differs.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => latest.trim_start_matches('v') != current.trim_start_matches('v'),
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    let mut parts = version
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().ok())
        .collect::<Option<Vec<u64>>>()?;
    while parts.len() > 1 && parts.last() == Some(&0) {
        parts.pop();
    }
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_cache_staleness() -> Result<()> {
        let now = Utc::now();
        let fresh = VersionCache {
            last_check: now - TimeDelta::hours(1),
            latest_version: "1.0.0".to_string(),
        };
        let stale = VersionCache {
            last_check: now - TimeDelta::hours(25),
            ..fresh.clone()
        };
        assert!(!fresh.is_stale(now));
        assert!(stale.is_stale(now));
        Ok(())
    }

    #[test]
    fn test_missing_and_corrupt_cache_are_ignored() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("version_check.json");
        let checker = VersionChecker::new(&path, "0.1.0");
        assert_eq!(checker.load_cache(), None);

        fs::write(&path, "not valid json")?;
        assert_eq!(checker.load_cache(), None);
        Ok(())
    }

    #[test]
    fn test_store_then_load() -> Result<()> {
        let dir = tempdir()?;
        let checker = VersionChecker::new(dir.path().join("nested/version_check.json"), "0.1.0");

        let stored = checker.store("0.2.0", Utc::now())?;
        assert_eq!(checker.load_cache(), Some(stored));
        Ok(())
    }

    #[test]
    fn test_fresh_cache_reports_newer_release() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("version_check.json");
        VersionChecker::new(&path, "0.1.0").store("0.2.0", Utc::now())?;

        assert_eq!(
            VersionChecker::new(&path, "0.1.0").check_for_updates(),
            Some("0.2.0".to_string())
        );
        assert_eq!(VersionChecker::new(&path, "0.2.0").check_for_updates(), None);
        assert_eq!(VersionChecker::new(&path, "0.3.0").check_for_updates(), None);
        Ok(())
    }

    #[test]
    fn test_failed_refresh_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("version_check.json");
        let checker =
            VersionChecker::new(&path, "0.1.0").with_url("http://127.0.0.1:9/releases/latest");

        assert!(checker.refresh().is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_version_ordering() {
        assert!(is_newer("0.2.0", "0.1.9"));
        assert!(is_newer("v1.10.0", "1.9.3"));
        assert!(!is_newer("1.0", "1.0.0"));
        assert!(!is_newer("0.1.0", "0.1.0"));
        assert!(is_newer("1.0.0-rc1", "0.9.0"));
        assert!(!is_newer("v0.1.0", "0.1.0"));
    }
}
