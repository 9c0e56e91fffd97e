use crate::utils::error::{FetchError, Result};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Ok,
    Skip,
    Fail,
}

impl LogStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LogStatus::Ok => "OK",
            LogStatus::Skip => "SKIP",
            LogStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OK" => Ok(LogStatus::Ok),
            "SKIP" => Ok(LogStatus::Skip),
            "FAIL" => Ok(LogStatus::Fail),
            other => Err(FetchError::config(format!("unknown run log status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub accession: String,
    pub status: LogStatus,
    pub message: String,
}

/// Append-only, tab separated record of every accession outcome.
///
/// One line per event: `timestamp<TAB>accession<TAB>STATUS<TAB>message`.
/// Appends from concurrent workers are serialized so lines never interleave.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, accession: &str, status: LogStatus, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&timestamp, accession, status, message)?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }
}

fn format_line(timestamp: &str, accession: &str, status: LogStatus, message: &str) -> Result<Vec<u8>> {
    // every line holds exactly four raw fields
    let message = message.replace(['\r', '\n', '\t'], " ");

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record([timestamp, accession, status.as_str(), message.as_str()])?;

    writer.into_inner().map_err(|e| FetchError::IoError(e.into_error()))
}

/// Parses a run log. Unreadable lines, lines without four fields and lines with an
/// unknown status are skipped.
pub async fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    let data = tokio::fs::read(path).await?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(data.as_slice());

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable run log line: {}", e);
                continue;
            }
        };
        if record.len() < 4 {
            tracing::warn!("Skipping malformed run log line: {:?}", record);
            continue;
        }

        let status = match record[2].parse::<LogStatus>() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Skipping run log line: {}", e);
                continue;
            }
        };

        entries.push(LogEntry {
            timestamp: record[0].to_string(),
            accession: record[1].to_string(),
            status,
            message: record[3].to_string(),
        });
    }

    Ok(entries)
}

/// Accessions whose most recent entry is a failure, in order of first appearance.
pub fn latest_failures(entries: &[LogEntry]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: std::collections::HashMap<&str, LogStatus> = std::collections::HashMap::new();

    for entry in entries {
        if latest.insert(&entry.accession, entry.status).is_none() {
            order.push(&entry.accession);
        }
    }

    order
        .into_iter()
        .filter(|acc| latest.get(acc) == Some(&LogStatus::Fail))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_format_line_is_tab_separated() {
        let line = format_line("2025-01-02 03:04:05", "SRR1", LogStatus::Ok, "prefetch + fasterq-dump completed")
            .unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "2025-01-02 03:04:05\tSRR1\tOK\tprefetch + fasterq-dump completed\n"
        );
    }

    #[test]
    fn test_format_line_flattens_newlines() {
        let line = format_line(
            "2025-01-02 03:04:05",
            "SRR1",
            LogStatus::Fail,
            "Command failed: prefetch SRR1\nerr: timeout",
        )
        .unwrap();
        let text = String::from_utf8(line).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.contains("Command failed: prefetch SRR1 err: timeout"));
    }

    #[test]
    fn test_format_line_writes_quotes_and_tabs_raw() {
        let line = format_line(
            "2025-01-02 03:04:05",
            "SRR1",
            LogStatus::Fail,
            "Command failed: fasterq-dump\tcannot open \"SRR1\"",
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "2025-01-02 03:04:05\tSRR1\tFAIL\tCommand failed: fasterq-dump cannot open \"SRR1\"\n"
        );
    }

    #[tokio::test]
    async fn test_read_entries_skips_invalid_utf8_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.log");
        let mut data = b"2025-01-01 00:00:00\tSRR1\tFAIL\t\"unbalanced quote\n".to_vec();
        data.extend_from_slice(b"2025-01-01 00:00:01\tSRR2\tFAIL\tbad \xff\xfe bytes\n");
        data.extend_from_slice(b"2025-01-01 00:00:02\tSRR3\tOK\tdone\n");
        tokio::fs::write(&path, data).await.unwrap();

        let entries = read_entries(&path).await.unwrap();
        let accessions: Vec<&str> = entries.iter().map(|e| e.accession.as_str()).collect();
        assert_eq!(accessions, vec!["SRR1", "SRR3"]);
        assert_eq!(entries[0].message, "\"unbalanced quote");
    }

    #[tokio::test]
    async fn test_append_creates_parent_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let log = RunLog::new(temp_dir.path().join("logs/sra_fetch.log"));

        log.append("SRR1", LogStatus::Skip, "fastq already downloaded").await.unwrap();
        log.append("SRR2", LogStatus::Fail, "Missing SRA file: x\ty").await.unwrap();
        log.append("SRR3", LogStatus::Fail, "cannot open \"SRR3\"").await.unwrap();

        let entries = read_entries(log.path()).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].accession, "SRR1");
        assert_eq!(entries[0].status, LogStatus::Skip);
        assert_eq!(entries[0].timestamp.len(), 19);
        assert_eq!(entries[1].status, LogStatus::Fail);
        assert_eq!(entries[1].message, "Missing SRA file: x y");
        assert_eq!(entries[2].message, "cannot open \"SRR3\"");
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let temp_dir = TempDir::new().unwrap();
        let log = Arc::new(RunLog::new(temp_dir.path().join("run.log")));

        let mut handles = Vec::new();
        for i in 0..32 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(&format!("SRR{}", i), LogStatus::Ok, "prefetch + fasterq-dump completed")
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entries = read_entries(log.path()).await.unwrap();
        assert_eq!(entries.len(), 32);
        assert!(entries.iter().all(|e| e.status == LogStatus::Ok));
    }

    #[test]
    fn test_latest_failures_uses_most_recent_status() {
        let entry = |acc: &str, status| LogEntry {
            timestamp: "2025-01-01 00:00:00".to_string(),
            accession: acc.to_string(),
            status,
            message: String::new(),
        };
        let entries = vec![
            entry("SRR1", LogStatus::Fail),
            entry("SRR2", LogStatus::Fail),
            entry("SRR1", LogStatus::Ok),
            entry("SRR3", LogStatus::Skip),
            entry("SRR4", LogStatus::Ok),
            entry("SRR4", LogStatus::Fail),
        ];

        assert_eq!(latest_failures(&entries), vec!["SRR2", "SRR4"]);
    }

    #[tokio::test]
    async fn test_read_entries_skips_unknown_status() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.log");
        tokio::fs::write(
            &path,
            "2025-01-01 00:00:00\tSRR1\tOK\tdone\n2025-01-01 00:00:01\tSRR2\tMAYBE\t?\nshort line\n",
        )
        .await
        .unwrap();

        let entries = read_entries(&path).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].accession, "SRR1");
    }
}
