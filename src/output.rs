//! Progress banners and result bookkeeping.

use std::io::Write;
use std::path::PathBuf;

use failure::ResultExt;

use serde::Serialize;

use crate::sweep::{Invocation, SweepConfig, SweepParams};

const BANNER: &str =
    "########################################################################################";

/// A timestamp in the format used for results file names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timestamp(pub String);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(
            chrono::offset::Local::now()
                .format("%Y-%m-%d-%H-%M-%S")
                .to_string(),
        )
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Print the banner that precedes a simulation. stdout is flushed so that the banner shows up
/// before anything the simulator prints.
pub fn print_banner(trace: &str, temperature: &str, cycle: &str) {
    use console::style;

    println!("{}", style(BANNER).cyan());
    println!(
        "{}",
        style(format!(
            "Trace : {}, temperature : {}, PE : {}",
            trace, temperature, cycle
        ))
        .bold()
    );
    println!("{}", style(BANNER).cyan());

    let _ = std::io::stdout().flush();
}

/// Print the banner that follows a simulation.
pub fn print_banner_end() {
    println!("{}", console::style(BANNER).cyan());
    println!();
}

/// Everything needed to reproduce one simulation.
#[derive(Debug, Serialize)]
struct Record<'a> {
    trace: &'a str,
    params: &'a SweepParams,
    config: &'a SweepConfig,
    invocation: &'a Invocation,
    local_git_hash: Option<String>,
    timestamp: Timestamp,
}

/// Write `<output_dir>/<trace>-<timestamp>.params` describing the simulation about to run.
/// Returns the path of the file.
pub fn record_params(
    trace: &str,
    params: &SweepParams,
    config: &SweepConfig,
    invocation: &Invocation,
) -> Result<PathBuf, failure::Error> {
    let record = Record {
        trace,
        params,
        config,
        invocation,
        local_git_hash: local_git_hash(),
        timestamp: Timestamp::now(),
    };

    let path = invocation
        .output_dir
        .join(format!("{}-{}.params", trace, record.timestamp));

    let serialized = serde_json::to_string_pretty(&record).context("serializing parameters")?;
    std::fs::write(&path, serialized)
        .with_context(|_| format!("writing parameters to {}", path.display()))?;

    Ok(path)
}

/// The git hash of the directory the runner is run from, `"dirty"` if it has uncommitted changes,
/// or `None` if it isn't a git checkout (or git isn't installed).
pub fn local_git_hash() -> Option<String> {
    let diff = std::process::Command::new("git")
        .args(&["diff", "--quiet"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .ok()?;

    match diff.code() {
        Some(0) => {}
        Some(1) => return Some("dirty".into()),
        _ => return None,
    }

    let output = std::process::Command::new("git")
        .args(&["rev-parse", "HEAD"])
        .stderr(std::process::Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    std::str::from_utf8(&output.stdout)
        .ok()
        .map(|hash| hash.trim().to_owned())
}
