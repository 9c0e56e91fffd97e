use crate::config::SettingsOverrides;
use crate::core::env_export::DEFAULT_ENVS_DIR;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sra-fetch")]
#[command(about = "Download FASTQ files for SRA/ENA/DDBJ run accessions", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download every accession in a list with prefetch + fasterq-dump
    Fetch(FetchArgs),
    /// Check that sra-tools are installed and the job sizing fits this machine
    Check(CheckArgs),
    /// Export a conda environment to envs/<name>.from_history.yml
    ExportEnv(ExportEnvArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File with accessions (whitespace separated, `#` starts a comment)
    #[arg(short, long)]
    pub accessions: Option<PathBuf>,

    /// Directory for FASTQ output (one subdirectory per accession)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Scratch directory for fasterq-dump
    #[arg(long)]
    pub tmp_dir: Option<PathBuf>,

    /// Directory prefetch downloads .sra files into
    #[arg(long)]
    pub sra_dir: Option<PathBuf>,

    /// Tab separated run log, appended to on every run
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Accessions processed at the same time
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Threads given to each fasterq-dump
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Run the commands even if the config file sets `dry_run = true`
    #[arg(long, conflicts_with = "dry_run")]
    pub no_dry_run: bool,

    /// Keep fasterq-dump scratch directories after success
    #[arg(long)]
    pub keep_tmp: bool,

    /// Keep downloaded .sra files after success
    #[arg(long)]
    pub keep_sra: bool,

    /// Log process CPU and memory usage
    #[arg(long)]
    pub monitor: bool,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Only retry accessions whose last run log entry is FAIL
    #[arg(long)]
    pub retry_failed: bool,
}

impl From<&FetchArgs> for SettingsOverrides {
    fn from(args: &FetchArgs) -> Self {
        Self {
            accessions: args.accessions.clone(),
            out_dir: args.out_dir.clone(),
            tmp_dir: args.tmp_dir.clone(),
            sra_dir: args.sra_dir.clone(),
            log_path: args.log_path.clone(),
            jobs: args.jobs,
            threads: args.threads,
            dry_run: match (args.dry_run, args.no_dry_run) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            delete_tmp_after: args.keep_tmp.then_some(false),
            delete_sra_after: args.keep_sra.then_some(false),
            monitor: args.monitor.then_some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Accessions processed at the same time
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Threads given to each fasterq-dump
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl From<&CheckArgs> for SettingsOverrides {
    fn from(args: &CheckArgs) -> Self {
        Self {
            jobs: args.jobs,
            threads: args.threads,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportEnvArgs {
    /// Name of the conda environment
    pub name: String,

    /// Directory the export is written to
    #[arg(long, default_value = DEFAULT_ENVS_DIR)]
    pub envs_dir: PathBuf,

    /// Print the conda command without running it
    #[arg(long)]
    pub dry_run: bool,
}
