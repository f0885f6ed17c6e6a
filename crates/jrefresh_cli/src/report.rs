//! Report output model for headless scenario runs

use anyhow::{bail, Result};
use jrefresh_core::{PullState, Transition};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Where the run ended up, whether it passed or not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub refresh_count: u32,
    pub final_state: PullState,
    pub final_offset: f32,
    pub transitions: Vec<Transition>,
}

/// Machine-readable result of a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub summary: RunSummary,
}

impl RunReport {
    pub fn passed(summary: RunSummary) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            summary,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        summary: RunSummary,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            summary,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
