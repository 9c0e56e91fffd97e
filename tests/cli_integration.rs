use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_sra_fetch(args: &[&str], cwd: &Path) -> (i32, String, String) {
    run_sra_fetch_with_env(args, cwd, &[])
}

fn run_sra_fetch_with_env(
    args: &[&str],
    cwd: &Path,
    envs: &[(&str, OsString)],
) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_sra-fetch"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "sra_fetch=warn")
        .envs(envs.iter().map(|(key, value)| (*key, value)))
        .output()
        .expect("run sra-fetch");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn dry_run_prints_commands_and_logs_every_accession() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "SRR1 err2 # two runs\nnot_an_accession\n").unwrap();
    std::fs::write(
        root.join("job.toml"),
        r#"
[paths]
accessions = "acc.txt"
out_dir = "out"
tmp_dir = "tmp"
sra_dir = "sra"
log_path = "logs/run.log"

[download]
jobs = 1
threads = 3
"#,
    )
    .unwrap();

    let (code, stdout, stderr) = run_sra_fetch(
        &["fetch", "--config", "job.toml", "--dry-run", "--summary-json", "summary.json"],
        root,
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    assert!(stdout.contains("SRR1 validated"));
    assert!(stdout.contains("ERR2 validated"));
    assert!(stdout.contains("NOT_AN_ACCESSION is not a valid accession, removed from list"));
    assert!(stdout.contains("Running: prefetch SRR1 --output-directory sra"));
    assert!(stdout.contains("Running: fasterq-dump sra/SRR1/SRR1.sra --outdir out/SRR1 --temp tmp/SRR1 --threads 3 --split-files"));
    assert!(stdout.contains("Cleaning: tmp/SRR1"));
    assert!(stdout.contains("Done. Successful: 2, Failed: 0, Total: 2"));

    // dry run creates the per-accession directories but keeps them
    assert!(root.join("out/SRR1").is_dir());
    assert!(root.join("tmp/ERR2").is_dir());

    let log = std::fs::read_to_string(root.join("logs/run.log")).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(log.lines().all(|line| line.split('\t').nth(2) == Some("OK")));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["reports"].as_array().unwrap().len(), 2);
}

#[test]
fn empty_list_reports_no_accessions() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "# nothing yet\n").unwrap();

    let (code, stdout, _) = run_sra_fetch(&["fetch", "-a", "acc.txt", "--dry-run"], root);

    assert_eq!(code, 0);
    assert!(stdout.contains("No accessions found"));
    assert!(!root.join("logs").exists());
}

#[test]
fn invalid_job_count_exits_with_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "SRR1\n").unwrap();

    let (code, _, stderr) = run_sra_fetch(&["fetch", "-a", "acc.txt", "--jobs", "0"], root);

    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid configuration"));
}

#[test]
fn huge_job_count_exits_with_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "SRR1\n").unwrap();

    let max = usize::MAX.to_string();
    let (code, _, stderr) = run_sra_fetch(&["fetch", "-a", "acc.txt", "--jobs", &max, "--dry-run"], root);

    assert_eq!(code, 2, "stderr: {}", stderr);
    assert!(stderr.contains("Invalid configuration"));
    assert!(!root.join("logs").exists());
}

#[test]
fn retry_failed_only_reruns_accessions_whose_last_entry_failed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "SRR1 SRR2\n").unwrap();
    std::fs::create_dir_all(root.join("logs")).unwrap();
    std::fs::write(
        root.join("logs/run.log"),
        "2025-01-01 00:00:00\tSRR1\tFAIL\tCommand failed: prefetch SRR1\n\
         2025-01-01 00:00:01\tSRR2\tOK\tprefetch + fasterq-dump completed\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run_sra_fetch(
        &["fetch", "-a", "acc.txt", "--log-path", "logs/run.log", "--retry-failed", "--dry-run"],
        root,
    );

    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Running: prefetch SRR1"));
    assert!(!stdout.contains("Running: prefetch SRR2"));
    assert!(stdout.contains("Done. Successful: 1, Failed: 0, Total: 1"));

    let log = std::fs::read_to_string(root.join("logs/run.log")).unwrap();
    let last = log.lines().last().unwrap();
    assert_eq!(last.split('\t').nth(1), Some("SRR1"));
    assert_eq!(last.split('\t').nth(2), Some("OK"));
}

#[cfg(unix)]
#[test]
fn failed_accession_exits_with_code_one() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("acc.txt"), "SRR1\n").unwrap();

    // prefetch that always fails to resolve the accession
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let prefetch = bin.join("prefetch");
    std::fs::write(
        &prefetch,
        "#!/bin/sh\necho \"err: failed to resolve accession '$1'\" >&2\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&prefetch, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut paths = vec![bin];
    paths.extend(std::env::split_paths(&std::env::var_os("PATH").unwrap_or_default()));
    let path = std::env::join_paths(paths).unwrap();

    let (code, stdout, stderr) = run_sra_fetch_with_env(
        &["fetch", "-a", "acc.txt", "--log-path", "logs/run.log"],
        root,
        &[("PATH", path)],
    );

    assert_eq!(code, 1, "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stdout.contains("SRR1: FAILED -"));
    assert!(stdout.contains("Done. Successful: 0, Failed: 1, Total: 1"));

    let log = std::fs::read_to_string(root.join("logs/run.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert_eq!(log.split('\t').nth(2), Some("FAIL"));
}

#[test]
fn no_dry_run_flag_conflicts_with_dry_run() {
    let temp_dir = TempDir::new().unwrap();

    let (code, _, _) = run_sra_fetch(&["fetch", "--dry-run", "--no-dry-run"], temp_dir.path());

    assert_eq!(code, 2);
}

#[test]
fn missing_accession_file_is_a_system_error() {
    let temp_dir = TempDir::new().unwrap();

    let (code, _, stderr) = run_sra_fetch(&["fetch", "-a", "missing.txt", "--dry-run"], temp_dir.path());

    assert_eq!(code, 3);
    assert!(stderr.contains("File system problem"));
}

#[test]
fn export_env_dry_run_prints_conda_command() {
    let temp_dir = TempDir::new().unwrap();

    let (code, stdout, stderr) =
        run_sra_fetch(&["export-env", "rnaseq", "--dry-run"], temp_dir.path());

    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Running: conda env export --from-history --name rnaseq"));
    assert!(!temp_dir.path().join("envs").exists());
}
