use crate::utils::error::{FetchError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn accession_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(SRR|ERR|DRR)\d+$").expect("accession pattern is valid"))
}

/// A run accession from SRA, ENA or DDBJ (`SRR`, `ERR`, `DRR` followed by digits).
///
/// Only constructed through [`Accession::parse`], so holding one means the value
/// is safe to use as a path component and as a tool argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Accession(String);

impl Accession {
    /// Accepts the value exactly as given; callers normalize case first.
    pub fn parse(raw: &str) -> Result<Self> {
        if Self::is_valid(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(FetchError::InvalidAccession {
                value: raw.to_string(),
            })
        }
    }

    pub fn is_valid(raw: &str) -> bool {
        accession_pattern().is_match(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Accession {
    type Error = FetchError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Accession> for String {
    fn from(value: Accession) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Ok,
    Skipped,
    Failed,
}

/// Outcome of processing one accession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessionReport {
    pub accession: String,
    pub status: FetchStatus,
    pub message: String,
}

impl AccessionReport {
    pub fn ok(accession: &Accession) -> Self {
        Self {
            accession: accession.to_string(),
            status: FetchStatus::Ok,
            message: "OK".to_string(),
        }
    }

    pub fn skipped(accession: &Accession) -> Self {
        Self {
            accession: accession.to_string(),
            status: FetchStatus::Skipped,
            message: "SKIP (fastq already downloaded)".to_string(),
        }
    }

    pub fn failed(accession: &Accession, message: impl Into<String>) -> Self {
        Self {
            accession: accession.to_string(),
            status: FetchStatus::Failed,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != FetchStatus::Failed
    }
}

/// Totals for one batch. `ok` counts skipped accessions as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ok: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
    pub reports: Vec<AccessionReport>,
}

impl RunSummary {
    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, report: AccessionReport) {
        match report.status {
            FetchStatus::Ok => self.ok += 1,
            FetchStatus::Skipped => {
                self.ok += 1;
                self.skipped += 1;
            }
            FetchStatus::Failed => self.failed += 1,
        }
        self.reports.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn done_line(&self) -> String {
        format!(
            "Done. Successful: {}, Failed: {}, Total: {}",
            self.ok, self.failed, self.total
        )
    }
}

/// Which per-accession scratch directories to remove after a successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPolicy {
    pub delete_tmp_after: bool,
    pub delete_sra_after: bool,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            delete_tmp_after: true,
            delete_sra_after: true,
        }
    }
}

/// An external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program and arguments joined by single spaces, as printed before running.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accession_parse() {
        assert!(Accession::parse("SRR123").is_ok());
        assert!(Accession::parse("ERR0").is_ok());
        assert!(Accession::parse("DRR999999").is_ok());
        assert!(Accession::parse("srr123").is_err());
        assert!(Accession::parse("SRR").is_err());
        assert!(Accession::parse("SRX123").is_err());
        assert!(Accession::parse("SRR123a").is_err());
        assert!(Accession::parse(" SRR123").is_err());
    }

    #[test]
    fn test_accession_deserialize_rejects_invalid() {
        let ok: Accession = serde_json::from_str("\"SRR42\"").unwrap();
        assert_eq!(ok.as_str(), "SRR42");
        assert!(serde_json::from_str::<Accession>("\"GSM42\"").is_err());
    }

    #[test]
    fn test_summary_counts_skipped_as_successful() {
        let a = Accession::parse("SRR1").unwrap();
        let b = Accession::parse("SRR2").unwrap();
        let c = Accession::parse("SRR3").unwrap();

        let mut summary = RunSummary::with_total(3);
        summary.record(AccessionReport::ok(&a));
        summary.record(AccessionReport::skipped(&b));
        summary.record(AccessionReport::failed(&c, "boom"));

        assert_eq!(summary.ok, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.done_line(), "Done. Successful: 2, Failed: 1, Total: 3");
    }

    #[test]
    fn test_command_display() {
        let spec = CommandSpec::new("prefetch", ["SRR1", "--output-directory", "/data/sra"]);
        assert_eq!(spec.display(), "prefetch SRR1 --output-directory /data/sra");
    }
}
