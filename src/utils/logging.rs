//! Structured logging utilities
//!
//! env_logger setup for the binary plus an append-only experiment logger that
//! mirrors every run into a text log and a JSON session document.

use anyhow::Result;
use log::info;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

/// Initialize env_logger, defaulting to `info` when RUST_LOG is unset.
pub fn setup_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn epoch_seconds() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Records experiment parameters and results for one session.
///
/// Text log is append-only; the JSON document is rewritten atomically
/// (write-then-rename) after every recorded experiment so a crash never
/// leaves a truncated file.
pub struct ExperimentLogger {
    session_id: u64,
    log_path: PathBuf,
    json_path: PathBuf,
    experiments: Vec<serde_json::Value>,
}

impl ExperimentLogger {
    /// Create a logger rooted at `log_dir`, creating the directory if needed.
    pub fn new(log_dir: impl Into<PathBuf>) -> Result<Self> {
        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir)?;
        let session_id = epoch_seconds()?;

        Ok(ExperimentLogger {
            session_id,
            log_path: log_dir.join(format!("simulation_{}.log", session_id)),
            json_path: log_dir.join(format!("simulation_{}.json", session_id)),
            experiments: Vec::new(),
        })
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Append a timestamped line to the text log and echo it at info level.
    pub fn log(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "[{}] {}", epoch_seconds()?, message)?;
        info!("{}", message);
        Ok(())
    }

    /// Record one named experiment and rewrite the session JSON document.
    pub fn record_experiment(&mut self, name: &str, mut record: serde_json::Value) -> Result<()> {
        if let Some(object) = record.as_object_mut() {
            object.insert("name".to_string(), json!(name));
            object.insert("timestamp".to_string(), json!(epoch_seconds()?));
        }
        self.experiments.push(record);

        let document = json!({
            "session_id": self.session_id,
            "experiments": self.experiments,
        });
        let tmp_path = self.json_path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&tmp_path, &self.json_path)?;

        self.log(&format!("Recorded experiment: {}", name))
    }

    /// Session overview: id, experiment count, file paths.
    pub fn summary(&self) -> String {
        format!(
            "Session ID: {}\nTotal Experiments: {}\nLog File: {}\nData File: {}",
            self.session_id,
            self.experiments.len(),
            self.log_path.display(),
            self.json_path.display()
        )
    }
}

/// Render a formatted experiment report, optionally writing it to a file.
pub fn experiment_report(
    experiment_name: &str,
    parameters: &[(&str, String)],
    results: &[(&str, String)],
    output_file: Option<&Path>,
) -> Result<String> {
    let mut lines = Vec::new();
    lines.push("=".repeat(70));
    lines.push(format!("EXPERIMENT REPORT: {}", experiment_name));
    lines.push("=".repeat(70));
    lines.push(format!("Timestamp: {}", epoch_seconds()?));
    lines.push(String::new());

    lines.push("PARAMETERS:".to_string());
    lines.push("-".repeat(70));
    for (key, value) in parameters {
        lines.push(format!("  {}: {}", key, value));
    }
    lines.push(String::new());

    lines.push("RESULTS:".to_string());
    lines.push("-".repeat(70));
    for (key, value) in results {
        lines.push(format!("  {}: {}", key, value));
    }
    lines.push(String::new());
    lines.push("=".repeat(70));

    let report = lines.join("\n");
    if let Some(path) = output_file {
        fs::write(path, &report)?;
        info!("Report saved to {}", path.display());
    }
    Ok(report)
}
