use crate::core::layout::DownloadLayout;
use crate::core::run_log::{LogStatus, RunLog};
use crate::domain::model::{Accession, AccessionReport, CleanupPolicy, CommandSpec};
use crate::domain::ports::{CommandRunner, ConfigProvider, Workspace};
use crate::utils::error::{FetchError, Result};
use std::path::Path;

/// Downloads a single accession with `prefetch` followed by `fasterq-dump`.
pub struct SraDownloader<R: CommandRunner, W: Workspace> {
    layout: DownloadLayout,
    threads: usize,
    dry_run: bool,
    cleanup: CleanupPolicy,
    runner: R,
    workspace: W,
}

impl<R: CommandRunner, W: Workspace> SraDownloader<R, W> {
    pub fn new(layout: DownloadLayout, threads: usize, runner: R, workspace: W) -> Self {
        Self {
            layout,
            threads,
            dry_run: false,
            cleanup: CleanupPolicy::default(),
            runner,
            workspace,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, runner: R, workspace: W) -> Self {
        let layout = DownloadLayout::new(config.out_dir(), config.tmp_dir(), config.sra_dir());
        Self::new(layout, config.threads(), runner, workspace)
            .with_dry_run(config.dry_run())
            .with_cleanup(config.cleanup())
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn layout(&self) -> &DownloadLayout {
        &self.layout
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// A non-empty single-end or first-mate FASTQ means the accession is finished.
    pub async fn is_done(&self, acc: &Accession) -> bool {
        for fastq in [
            self.layout.single_end_fastq(acc),
            self.layout.paired_end_fastq(acc),
        ] {
            if matches!(self.workspace.file_size(&fastq).await, Some(size) if size > 0) {
                return true;
            }
        }
        false
    }

    pub async fn prefetch_one(&self, acc: &Accession) -> Result<()> {
        let spec = CommandSpec::new(
            "prefetch",
            [
                acc.to_string(),
                "--output-directory".to_string(),
                path_arg(self.layout.sra_root()),
            ],
        );
        self.runner.run(&spec).await?;
        println!("prefetch successful for {}", acc);
        Ok(())
    }

    pub async fn fasterq_dump_one(&self, acc: &Accession) -> Result<()> {
        let out_dir_acc = self.layout.out_dir_for(acc);
        let tmp_dir_acc = self.layout.tmp_dir_for(acc);
        let sra_path = self.layout.sra_file(acc);

        self.workspace.create_dir_all(&out_dir_acc).await?;
        self.workspace.create_dir_all(&tmp_dir_acc).await?;

        // prefetch never ran for real in dry-run, so there is nothing to check
        if !self.dry_run && !self.workspace.exists(&sra_path).await {
            return Err(FetchError::MissingSraFile {
                path: path_arg(&sra_path),
            });
        }

        let spec = CommandSpec::new(
            "fasterq-dump",
            [
                path_arg(&sra_path),
                "--outdir".to_string(),
                path_arg(&out_dir_acc),
                "--temp".to_string(),
                path_arg(&tmp_dir_acc),
                "--threads".to_string(),
                self.threads.to_string(),
                "--split-files".to_string(),
            ],
        );
        self.runner.run(&spec).await?;
        println!("fasterq-dump successful for {}", acc);
        Ok(())
    }

    /// Runs one accession end to end. Failures are logged and reported, never returned.
    pub async fn process_one(&self, acc: &Accession, log: &RunLog) -> AccessionReport {
        if self.is_done(acc).await {
            if let Err(e) = log.append(acc.as_str(), LogStatus::Skip, "fastq already downloaded").await {
                tracing::warn!("Could not write run log for {}: {}", acc, e);
            }
            return AccessionReport::skipped(acc);
        }

        match self.download(acc, log).await {
            Ok(()) => AccessionReport::ok(acc),
            Err(e) => {
                tracing::debug!("{} failed: {:?}", acc, e);
                let message = e.to_string();
                if let Err(log_err) = log.append(acc.as_str(), LogStatus::Fail, &message).await {
                    tracing::warn!("Could not write run log for {}: {}", acc, log_err);
                }
                AccessionReport::failed(acc, message)
            }
        }
    }

    async fn download(&self, acc: &Accession, log: &RunLog) -> Result<()> {
        self.prefetch_one(acc).await?;
        self.fasterq_dump_one(acc).await?;

        if self.cleanup.delete_tmp_after {
            self.safe_remove(&self.layout.tmp_dir_for(acc)).await?;
        }
        if self.cleanup.delete_sra_after {
            self.safe_remove(&self.layout.sra_dir_for(acc)).await?;
        }

        log.append(acc.as_str(), LogStatus::Ok, "prefetch + fasterq-dump completed")
            .await
    }

    async fn safe_remove(&self, path: &Path) -> Result<()> {
        if !self.workspace.exists(path).await {
            return Ok(());
        }
        println!("Cleaning: {}", path.display());
        if self.dry_run {
            return Ok(());
        }
        self.workspace.remove_dir_all(path).await
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
