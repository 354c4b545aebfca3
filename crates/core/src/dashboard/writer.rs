//! Writes the dashboard artifacts to the site directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::model::{DashboardPayload, DashboardRun};
use crate::constants::{ALERT_FILE_NAME, DATA_FILE_NAME};
use crate::errors::Result;

/// What a write produced, for the run summary log.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteSummary {
    pub data_path: PathBuf,
    /// Set only when an alert file was written
    pub alert_path: Option<PathBuf>,
    pub record_count: usize,
    pub alert_count: usize,
}

/// Writes `data.json` and, when there are alerts, `alert_content.txt`.
#[derive(Clone, Debug)]
pub struct DashboardWriter {
    site_dir: PathBuf,
}

impl DashboardWriter {
    pub fn new(site_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_dir: site_dir.into(),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.site_dir.join(DATA_FILE_NAME)
    }

    pub fn alert_path(&self) -> PathBuf {
        self.site_dir.join(ALERT_FILE_NAME)
    }

    /// Write both artifacts for a finished run.
    pub fn write(&self, run: &DashboardRun) -> Result<WriteSummary> {
        fs::create_dir_all(&self.site_dir)?;

        let data_path = self.data_path();
        write_payload(&data_path, &run.payload)?;
        info!(
            "Wrote {} with {} stocks",
            data_path.display(),
            run.payload.stocks.len()
        );

        let messages = run.alert_messages();
        let alert_path = if messages.is_empty() {
            info!("No alerts generated");
            None
        } else {
            let path = self.alert_path();
            fs::write(&path, alert_text(&messages))?;
            info!("Alerts generated: {} -> {}", messages.len(), path.display());
            Some(path)
        };

        Ok(WriteSummary {
            data_path,
            alert_path,
            record_count: run.payload.stocks.len(),
            alert_count: messages.len(),
        })
    }
}

/// Pretty-print the payload with two-space indentation, replacing the file.
fn write_payload(path: &Path, payload: &DashboardPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    fs::write(path, json)?;
    Ok(())
}

/// One message per line, always ending with a newline.
fn alert_text(messages: &[String]) -> String {
    let mut text = messages.join("\n").trim().to_string();
    text.push('\n');
    text
}
