use crate::domain::model::CommandSpec;
use crate::domain::ports::{CommandRunner, Workspace};
use crate::utils::error::Result;
use crate::utils::validation::validate_file_stem;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENVS_DIR: &str = "envs";

/// `<envs_dir>/<name>.from_history.yml`
pub fn export_path(envs_dir: &Path, name: &str) -> PathBuf {
    envs_dir.join(format!("{}.from_history.yml", name))
}

pub fn validate_env_name(name: &str) -> Result<()> {
    validate_file_stem("env_name", name)
}

/// Writes the explicitly requested packages of a conda environment
/// (`conda env export --from-history`) into the project's `envs/` directory.
pub async fn export_env<R: CommandRunner, W: Workspace>(
    runner: &R,
    workspace: &W,
    envs_dir: &Path,
    name: &str,
    dry_run: bool,
) -> Result<PathBuf> {
    validate_env_name(name)?;

    let target = export_path(envs_dir, name);
    let spec = CommandSpec::new("conda", ["env", "export", "--from-history", "--name", name]);
    let output = runner.run(&spec).await?;

    if dry_run {
        tracing::info!("Dry run: would write {}", target.display());
        return Ok(target);
    }

    workspace.create_dir_all(envs_dir).await?;
    workspace.write_file(&target, output.stdout.as_bytes()).await?;
    tracing::info!("Exported environment {} to {}", name, target.display());

    Ok(target)
}
