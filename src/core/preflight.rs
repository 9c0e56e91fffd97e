use crate::domain::model::CommandSpec;
use crate::domain::ports::CommandRunner;
use serde::Serialize;

/// Tools a download cannot run without.
pub const REQUIRED_TOOLS: [&str; 2] = ["prefetch", "fasterq-dump"];
/// Only needed for `export-env`.
pub const OPTIONAL_TOOLS: [&str; 1] = ["conda"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    pub name: String,
    pub required: bool,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl ToolCheck {
    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }

    pub fn describe(&self) -> String {
        match (&self.version, &self.error) {
            (_, Some(error)) if self.required => format!("✗ {}: {}", self.name, error),
            (_, Some(error)) => format!("- {} (optional): {}", self.name, error),
            (Some(version), None) => format!("✓ {}: {}", self.name, version),
            (None, None) => format!("✓ {}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightReport {
    pub tools: Vec<ToolCheck>,
    pub jobs: usize,
    pub threads: usize,
    pub cores: Option<usize>,
}

impl PreflightReport {
    pub fn is_ready(&self) -> bool {
        self.tools.iter().filter(|t| t.required).all(ToolCheck::is_available)
    }

    pub fn core_budget_exceeded(&self) -> bool {
        self.cores
            .map(|cores| core_budget_exceeded(self.jobs, self.threads, cores))
            .unwrap_or(false)
    }
}

/// Each job runs fasterq-dump with `threads` threads, so `jobs * threads`
/// should stay within the machine's cores.
pub fn core_budget_exceeded(jobs: usize, threads: usize, cores: usize) -> bool {
    jobs.saturating_mul(threads) > cores
}

pub async fn check_tool<R: CommandRunner>(runner: &R, name: &str, required: bool) -> ToolCheck {
    let spec = CommandSpec::new(name, ["--version"]);
    match runner.run(&spec).await {
        Ok(output) => ToolCheck {
            name: name.to_string(),
            required,
            version: first_line(&output.stdout).or_else(|| first_line(&output.stderr)),
            error: None,
        },
        Err(e) => ToolCheck {
            name: name.to_string(),
            required,
            version: None,
            error: Some(e.to_string().replace('\n', " ")),
        },
    }
}

pub async fn run_preflight<R: CommandRunner>(
    runner: &R,
    jobs: usize,
    threads: usize,
    cores: Option<usize>,
) -> PreflightReport {
    let mut tools = Vec::new();
    for name in REQUIRED_TOOLS {
        tools.push(check_tool(runner, name, true).await);
    }
    for name in OPTIONAL_TOOLS {
        tools.push(check_tool(runner, name, false).await);
    }

    PreflightReport {
        tools,
        jobs,
        threads,
        cores,
    }
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
