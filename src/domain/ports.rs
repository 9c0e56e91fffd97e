use crate::domain::model::{CleanupPolicy, CommandOutput, CommandSpec};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// File system operations the downloader needs.
pub trait Workspace: Send + Sync {
    /// Size of a regular file, `None` if it does not exist or is not a file.
    fn file_size(&self, path: &Path) -> impl std::future::Future<Output = Option<u64>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
    fn create_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

pub trait ConfigProvider: Send + Sync {
    fn accessions_path(&self) -> &Path;
    fn out_dir(&self) -> &Path;
    fn tmp_dir(&self) -> &Path;
    fn sra_dir(&self) -> &Path;
    fn log_path(&self) -> &Path;
    fn jobs(&self) -> usize;
    fn threads(&self) -> usize;
    fn dry_run(&self) -> bool;
    fn cleanup(&self) -> CleanupPolicy;
}
