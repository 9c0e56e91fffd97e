use crate::domain::model::{CommandOutput, CommandSpec};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Runs external programs with captured output.
///
/// In dry-run mode the command line is printed and nothing is spawned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    dry_run: bool,
}

impl ProcessRunner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let printable = spec.display();
        println!("Running: {}", printable);

        if self.dry_run {
            return Ok(CommandOutput::default());
        }

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::ToolNotFound {
                        program: spec.program.clone(),
                    }
                } else {
                    FetchError::IoError(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!("{} exited with {}", spec.program, output.status);
            return Err(FetchError::CommandFailed {
                command: printable,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
