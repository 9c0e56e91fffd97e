use crate::core::downloader::SraDownloader;
use crate::core::run_log::RunLog;
use crate::domain::model::{Accession, AccessionReport, RunSummary};
use crate::domain::ports::{CommandRunner, Workspace};
use crate::utils::error::{FetchError, Result};
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound for concurrent downloads; well below `Semaphore::MAX_PERMITS`.
pub const MAX_JOBS: usize = 256;

/// Runs a batch of accessions with at most `jobs` downloads in flight.
pub struct FetchEngine<R: CommandRunner + 'static, W: Workspace + 'static> {
    downloader: Arc<SraDownloader<R, W>>,
    log: Arc<RunLog>,
    jobs: usize,
    monitor: SystemMonitor,
}

impl<R: CommandRunner + 'static, W: Workspace + 'static> FetchEngine<R, W> {
    pub fn new(downloader: SraDownloader<R, W>, log: RunLog, jobs: usize) -> Self {
        Self {
            downloader: Arc::new(downloader),
            log: Arc::new(log),
            jobs: jobs.clamp(1, MAX_JOBS),
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(
        downloader: SraDownloader<R, W>,
        log: RunLog,
        jobs: usize,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            monitor: SystemMonitor::new(monitor_enabled),
            ..Self::new(downloader, log, jobs)
        }
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub async fn run(&self, accessions: Vec<Accession>) -> Result<RunSummary> {
        if accessions.is_empty() {
            println!("No accessions found");
            return Ok(RunSummary::default());
        }

        let mut summary = RunSummary::with_total(accessions.len());
        tracing::info!(
            "Processing {} accessions with {} concurrent jobs",
            summary.total,
            self.jobs
        );
        self.monitor.log_stats("Start");

        let permits = Arc::new(Semaphore::new(self.jobs));
        let mut tasks = JoinSet::new();

        for acc in accessions {
            let permits = permits.clone();
            let downloader = self.downloader.clone();
            let log = self.log.clone();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return AccessionReport::failed(&acc, "worker pool closed");
                };
                tracing::debug!("Starting {}", acc);
                downloader.process_one(&acc, &log).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let report = joined.map_err(|e| FetchError::TaskError {
                message: e.to_string(),
            })?;

            if report.is_success() {
                println!("{}: {}", report.accession, report.message);
            } else {
                println!("{}: FAILED - {}", report.accession, report.message);
            }
            summary.record(report);
        }

        println!("{}", summary.done_line());
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
