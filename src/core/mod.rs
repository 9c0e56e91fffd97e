pub mod accession;
pub mod downloader;
pub mod engine;
pub mod env_export;
pub mod layout;
pub mod preflight;
pub mod run_log;

pub use crate::domain::model::{Accession, AccessionReport, CleanupPolicy, FetchStatus, RunSummary};
pub use crate::domain::ports::{CommandRunner, ConfigProvider, Workspace};
pub use crate::utils::error::Result;
