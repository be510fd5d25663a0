// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::entities::{Direction, TransferRequest};
use crate::domain::errors::Result;
use crate::domain::session_state::{Outcome, OutcomeStatus};
use log::info;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Run report written after an `ingest`, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub direction: Direction,
    pub source: String,
    pub target: String,
    pub columns: Vec<String>,
    pub status: OutcomeStatus,
    pub message: String,
    pub records: Option<u64>,
    pub elapsed_seconds: f64,
    pub timestamp: String,
}

impl TransferReport {
    /// Descriptor summaries never include the auth token.
    pub fn new(
        request: &TransferRequest,
        outcome: &Outcome,
        records: Option<u64>,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            direction: request.direction(),
            source: request.source.summary(),
            target: request.target.summary(),
            columns: request.columns.clone(),
            status: outcome.status,
            message: outcome.message.clone(),
            records,
            elapsed_seconds: (elapsed_seconds * 1000.0).round() / 1000.0,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}

/// Writes `report_<YYYYmmdd_HHMMSS>.json` into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &TransferReport) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let timestamp_str = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(format!("report_{}.json", timestamp_str));

    let mut file = File::create(&path)?;
    serde_json::to_writer_pretty(&mut file, report)?;
    info!("Report written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::{ConnectionDescriptor, DatabaseEndpoint, FlatFileEndpoint};
    use serde_json::Value;
    use tempfile::tempdir;

    fn request() -> TransferRequest {
        TransferRequest {
            source: ConnectionDescriptor::Database(
                DatabaseEndpoint::new("ch", 8123, "default", "ops", "secret-jwt", "events")
                    .unwrap(),
            ),
            target: ConnectionDescriptor::FlatFile(
                FlatFileEndpoint::new("/tmp/events.csv", ",").unwrap(),
            ),
            columns: vec!["id".into(), "amount".into()],
        }
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports");
        let report = TransferReport::new(
            &request(),
            &Outcome::success("Records processed: 2"),
            Some(2),
            1.23456,
        );

        let path = write_report(&nested, &report).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_") && name.ends_with(".json"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("secret-jwt"));

        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["direction"], "database_to_file");
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["records"], 2);
        assert_eq!(value["columns"][1], "amount");
        assert_eq!(value["elapsed_seconds"], 1.235);
    }

    #[test]
    fn test_failed_report_has_no_records() {
        let report = TransferReport::new(
            &request(),
            &Outcome::error("table not found"),
            None,
            0.5,
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "ERROR");
        assert_eq!(value["message"], "table not found");
        assert!(value["records"].is_null());
    }
}
