#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::engine::MAX_JOBS;
use crate::core::{CleanupPolicy, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

pub const MAX_THREADS: usize = 64;

/// Fully resolved settings for one fetch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSettings {
    pub accessions: PathBuf,
    pub out_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub sra_dir: PathBuf,
    pub log_path: PathBuf,
    pub jobs: usize,
    pub threads: usize,
    pub dry_run: bool,
    pub cleanup: CleanupPolicy,
    pub monitor: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            accessions: PathBuf::from("accessions.txt"),
            out_dir: PathBuf::from("data/fastq_files"),
            tmp_dir: PathBuf::from("data/tmp_files"),
            sra_dir: PathBuf::from("data/sra_cache"),
            log_path: PathBuf::from("logs/sra_fetch.log"),
            jobs: 2,
            threads: 2,
            dry_run: false,
            cleanup: CleanupPolicy::default(),
            monitor: false,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub accessions: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub sra_dir: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub threads: Option<usize>,
    pub dry_run: Option<bool>,
    pub delete_tmp_after: Option<bool>,
    pub delete_sra_after: Option<bool>,
    pub monitor: Option<bool>,
}

fn apply<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl FetchSettings {
    /// defaults → config file → command line
    pub fn resolve(file: Option<&TomlConfig>, overrides: &SettingsOverrides) -> Self {
        let mut settings = Self::default();
        if let Some(file) = file {
            settings.apply_toml(file);
        }
        settings.apply_overrides(overrides);
        settings
    }

    pub fn apply_toml(&mut self, file: &TomlConfig) {
        apply(&mut self.accessions, &file.paths.accessions);
        apply(&mut self.out_dir, &file.paths.out_dir);
        apply(&mut self.tmp_dir, &file.paths.tmp_dir);
        apply(&mut self.sra_dir, &file.paths.sra_dir);
        apply(&mut self.log_path, &file.paths.log_path);
        apply(&mut self.jobs, &file.download.jobs);
        apply(&mut self.threads, &file.download.threads);
        apply(&mut self.dry_run, &file.download.dry_run);
        apply(&mut self.cleanup.delete_tmp_after, &file.cleanup.delete_tmp_after);
        apply(&mut self.cleanup.delete_sra_after, &file.cleanup.delete_sra_after);
        if let Some(monitoring) = &file.monitoring {
            self.monitor = monitoring.enabled;
        }
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        apply(&mut self.accessions, &overrides.accessions);
        apply(&mut self.out_dir, &overrides.out_dir);
        apply(&mut self.tmp_dir, &overrides.tmp_dir);
        apply(&mut self.sra_dir, &overrides.sra_dir);
        apply(&mut self.log_path, &overrides.log_path);
        apply(&mut self.jobs, &overrides.jobs);
        apply(&mut self.threads, &overrides.threads);
        apply(&mut self.dry_run, &overrides.dry_run);
        apply(&mut self.cleanup.delete_tmp_after, &overrides.delete_tmp_after);
        apply(&mut self.cleanup.delete_sra_after, &overrides.delete_sra_after);
        apply(&mut self.monitor, &overrides.monitor);
    }
}

impl Validate for FetchSettings {
    fn validate(&self) -> Result<()> {
        validate_path("paths.accessions", &self.accessions)?;
        validate_path("paths.out_dir", &self.out_dir)?;
        validate_path("paths.tmp_dir", &self.tmp_dir)?;
        validate_path("paths.sra_dir", &self.sra_dir)?;
        validate_path("paths.log_path", &self.log_path)?;
        validate_range("download.jobs", self.jobs, 1, MAX_JOBS)?;
        validate_range("download.threads", self.threads, 1, MAX_THREADS)?;
        Ok(())
    }
}

impl ConfigProvider for FetchSettings {
    fn accessions_path(&self) -> &Path {
        &self.accessions
    }

    fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    fn sra_dir(&self) -> &Path {
        &self.sra_dir
    }

    fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn jobs(&self) -> usize {
        self.jobs
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn cleanup(&self) -> CleanupPolicy {
        self.cleanup
    }
}
