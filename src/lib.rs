pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{LocalWorkspace, ProcessRunner};
#[cfg(feature = "cli")]
pub use crate::config::cli::{Cli, Commands};
pub use crate::config::{FetchSettings, SettingsOverrides};
pub use crate::core::{downloader::SraDownloader, engine::FetchEngine, run_log::RunLog};
pub use crate::domain::model::{Accession, AccessionReport, FetchStatus, RunSummary};
pub use crate::utils::error::{FetchError, Result};
