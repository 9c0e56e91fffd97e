use crate::adapters::{LocalWorkspace, ProcessRunner};
use crate::config::cli::{CheckArgs, ExportEnvArgs, FetchArgs};
use crate::config::toml_config::TomlConfig;
use crate::config::{FetchSettings, SettingsOverrides};
use crate::core::accession::{prepare_accessions, read_accessions};
use crate::core::downloader::SraDownloader;
use crate::core::engine::FetchEngine;
use crate::core::env_export::export_env;
use crate::core::preflight::run_preflight;
use crate::core::run_log::{latest_failures, read_entries, RunLog};
use crate::core::{ConfigProvider, RunSummary, Workspace};
use crate::utils::monitor::logical_cores;
use crate::utils::validation::Validate;
use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;

/// Process exit code for a finished command.
pub type ExitCode = i32;

fn load_settings(
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> anyhow::Result<FetchSettings> {
    let file = match config_path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };

    let settings = FetchSettings::resolve(file.as_ref(), overrides);
    settings.validate()?;
    tracing::debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

fn display_settings_summary(settings: &FetchSettings) {
    println!("📋 Configuration Summary:");
    println!("  Accessions: {}", settings.accessions.display());
    println!("  FASTQ output: {}", settings.out_dir.display());
    println!("  Temp: {}", settings.tmp_dir.display());
    println!("  SRA cache: {}", settings.sra_dir.display());
    println!("  Log: {}", settings.log_path.display());
    println!("  Jobs: {} x {} threads", settings.jobs, settings.threads);
    println!(
        "  Cleanup: tmp={}, sra={}",
        settings.cleanup.delete_tmp_after, settings.cleanup.delete_sra_after
    );
    if settings.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn failed_in_log(log_path: &Path) -> anyhow::Result<HashSet<String>> {
    if !tokio::fs::try_exists(log_path).await.unwrap_or(false) {
        tracing::warn!("No run log at {}, nothing to retry", log_path.display());
        return Ok(HashSet::new());
    }

    let entries = read_entries(log_path)
        .await
        .with_context(|| format!("reading run log {}", log_path.display()))?;
    Ok(latest_failures(&entries).into_iter().collect())
}

pub async fn fetch(args: FetchArgs) -> anyhow::Result<ExitCode> {
    let settings = load_settings(args.config.as_deref(), &SettingsOverrides::from(&args))?;
    display_settings_summary(&settings);

    if let Some(cores) = logical_cores() {
        if crate::core::preflight::core_budget_exceeded(settings.jobs, settings.threads, cores) {
            tracing::warn!(
                "⚠️ {} jobs x {} threads exceeds {} CPU cores",
                settings.jobs,
                settings.threads,
                cores
            );
        }
    }

    let tokens = read_accessions(settings.accessions_path())
        .await
        .with_context(|| format!("reading accessions from {}", settings.accessions.display()))?;
    let mut batch = prepare_accessions(tokens);

    if args.retry_failed {
        let failed = failed_in_log(settings.log_path()).await?;
        batch.accepted.retain(|acc| failed.contains(acc.as_str()));
        tracing::info!("Retrying {} previously failed accessions", batch.accepted.len());
    }

    let workspace = LocalWorkspace::new();
    let downloader = SraDownloader::from_config(&settings, ProcessRunner::new(settings.dry_run), workspace);
    let engine = FetchEngine::new_with_monitoring(
        downloader,
        RunLog::new(settings.log_path()),
        settings.jobs,
        settings.monitor,
    );

    let summary = engine.run(batch.accepted).await?;

    if let Some(path) = &args.summary_json {
        write_summary(&workspace, path, &summary).await?;
    }

    Ok(if summary.has_failures() { 1 } else { 0 })
}

async fn write_summary<W: Workspace>(
    workspace: &W,
    path: &Path,
    summary: &RunSummary,
) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(summary)?;
    workspace
        .write_file(path, &json)
        .await
        .with_context(|| format!("writing summary to {}", path.display()))?;
    tracing::info!("📁 Summary saved to: {}", path.display());
    Ok(())
}

pub async fn check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let settings = load_settings(args.config.as_deref(), &SettingsOverrides::from(&args))?;
    let report = run_preflight(
        &ProcessRunner::new(false),
        settings.jobs,
        settings.threads,
        logical_cores(),
    )
    .await;

    println!("🔍 Tool check:");
    for tool in &report.tools {
        println!("  {}", tool.describe());
    }

    match report.cores {
        Some(cores) if report.core_budget_exceeded() => println!(
            "⚠️ {} jobs x {} threads exceeds {} CPU cores; lower --jobs or --threads",
            report.jobs, report.threads, cores
        ),
        Some(cores) => println!(
            "✅ {} jobs x {} threads fits in {} CPU cores",
            report.jobs, report.threads, cores
        ),
        None => println!("CPU core count unavailable"),
    }

    if report.is_ready() {
        println!("✅ Ready to fetch");
        Ok(0)
    } else {
        eprintln!("❌ Required tools are missing; activate the conda environment with sra-tools");
        Ok(3)
    }
}

pub async fn export_environment(args: ExportEnvArgs) -> anyhow::Result<ExitCode> {
    let path = export_env(
        &ProcessRunner::new(args.dry_run),
        &LocalWorkspace::new(),
        &args.envs_dir,
        &args.name,
        args.dry_run,
    )
    .await?;

    if !args.dry_run {
        println!("📁 Environment exported to: {}", path.display());
    }
    Ok(0)
}
