use crate::domain::ports::Workspace;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWorkspace;

impl LocalWorkspace {
    pub fn new() -> Self {
        Self
    }
}

impl Workspace for LocalWorkspace {
    async fn file_size(&self, path: &Path) -> Option<u64> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        metadata.is_file().then(|| metadata.len())
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(path).await?;
        Ok(())
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
