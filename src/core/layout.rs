use crate::domain::model::Accession;
use std::path::{Path, PathBuf};

/// Where each accession's files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLayout {
    pub out_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub sra_dir: PathBuf,
}

impl DownloadLayout {
    pub fn new(
        out_dir: impl Into<PathBuf>,
        tmp_dir: impl Into<PathBuf>,
        sra_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            out_dir: out_dir.into(),
            tmp_dir: tmp_dir.into(),
            sra_dir: sra_dir.into(),
        }
    }

    pub fn sra_root(&self) -> &Path {
        &self.sra_dir
    }

    pub fn out_dir_for(&self, acc: &Accession) -> PathBuf {
        self.out_dir.join(acc.as_str())
    }

    pub fn tmp_dir_for(&self, acc: &Accession) -> PathBuf {
        self.tmp_dir.join(acc.as_str())
    }

    pub fn sra_dir_for(&self, acc: &Accession) -> PathBuf {
        self.sra_dir.join(acc.as_str())
    }

    pub fn sra_file(&self, acc: &Accession) -> PathBuf {
        self.sra_dir_for(acc).join(format!("{}.sra", acc))
    }

    pub fn single_end_fastq(&self, acc: &Accession) -> PathBuf {
        self.out_dir_for(acc).join(format!("{}.fastq", acc))
    }

    /// First mate of a paired-end run; `--split-files` also writes `_2`.
    pub fn paired_end_fastq(&self, acc: &Accession) -> PathBuf {
        self.out_dir_for(acc).join(format!("{}_1.fastq", acc))
    }
}
