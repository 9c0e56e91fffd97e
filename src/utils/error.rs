use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Run log error: {0}")]
    RunLogError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{value} is not a valid accession")]
    InvalidAccession { value: String },

    #[error("Command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Executable not found on PATH: {program}")]
    ToolNotFound { program: String },

    #[error("Missing SRA file: {path}")]
    MissingSraFile { path: String },

    #[error("Worker task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Validation,
    ExternalTool,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the CLI for an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl FetchError {
    pub fn config(message: impl Into<String>) -> Self {
        FetchError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchError::IoError(_) => ErrorCategory::Io,
            FetchError::TomlError(_)
            | FetchError::ConfigError { .. }
            | FetchError::MissingConfigError { .. }
            | FetchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FetchError::InvalidAccession { .. } => ErrorCategory::Validation,
            FetchError::CommandFailed { .. }
            | FetchError::ToolNotFound { .. }
            | FetchError::MissingSraFile { .. } => ErrorCategory::ExternalTool,
            FetchError::SerializationError(_)
            | FetchError::RunLogError(_)
            | FetchError::TaskError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FetchError::InvalidAccession { .. } => ErrorSeverity::Low,
            FetchError::TomlError(_)
            | FetchError::ConfigError { .. }
            | FetchError::MissingConfigError { .. }
            | FetchError::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
            FetchError::CommandFailed { .. }
            | FetchError::MissingSraFile { .. }
            | FetchError::SerializationError(_)
            | FetchError::RunLogError(_)
            | FetchError::TaskError { .. } => ErrorSeverity::High,
            FetchError::IoError(_) | FetchError::ToolNotFound { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FetchError::IoError(_) => {
                "Check that the paths exist and that you have permission to write to them".to_string()
            }
            FetchError::TomlError(_) => {
                "Check the config file for TOML syntax errors and unknown keys".to_string()
            }
            FetchError::ConfigError { .. }
            | FetchError::MissingConfigError { .. }
            | FetchError::InvalidConfigValueError { .. } => {
                "Fix the value in the config file or override it on the command line".to_string()
            }
            FetchError::InvalidAccession { .. } => {
                "Accessions must look like SRR123456, ERR123456 or DRR123456".to_string()
            }
            FetchError::CommandFailed { .. } => {
                "Re-run the printed command by hand to inspect its output; failed accessions can be retried with --retry-failed".to_string()
            }
            FetchError::ToolNotFound { program } => format!(
                "Activate the conda environment that provides {} (sra-tools) and run `sra-fetch check`",
                program
            ),
            FetchError::MissingSraFile { .. } => {
                "prefetch did not produce the expected .sra file; check the SRA cache directory".to_string()
            }
            FetchError::SerializationError(_) | FetchError::RunLogError(_) => {
                "Check that the output file is writable and not corrupted".to_string()
            }
            FetchError::TaskError { .. } => "Re-run the batch; completed accessions are skipped".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::ExternalTool => format!("External tool problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
