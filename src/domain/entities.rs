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

//! # Domain Entities
//!
//! The nouns of a transfer: the discovered `Schema`, the operator's
//! `ColumnSelection`, the `TransferRequest` handed to the gateway and the
//! `TransferSummary` it hands back.

use crate::domain::descriptor::{ConnectionDescriptor, SourceKind};
use crate::domain::errors::{BridgeError, Result};
use crate::domain::session_state::Step;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Ordered, duplicate-free list of column names returned by discovery.
///
/// The order is display order. It is also the order columns are sent in a
/// transfer, so the same selection always produces the same request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Builds a schema from a discovery response.
    ///
    /// A repeated name means the backend broke its contract, so this is
    /// reported as a backend failure of the discovery step.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(BridgeError::Backend {
                    step: Step::DiscoverSchema,
                    message: format!("duplicate column '{}' in discovered schema", col),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Checks a proposed selection against this schema.
    ///
    /// Fails with `InvalidSelection` if the set is empty or names a column
    /// the schema does not have. Unknown names are listed in sorted order.
    pub fn select<I, S>(&self, names: I) -> Result<ColumnSelection>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if selection.is_empty() {
            return Err(BridgeError::InvalidSelection(
                "select at least one column".to_string(),
            ));
        }

        let unknown: Vec<&str> = selection
            .iter()
            .filter(|name| !self.contains(name))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(BridgeError::InvalidSelection(format!(
                "unknown column(s): {}",
                unknown.join(", ")
            )));
        }

        Ok(ColumnSelection { columns: selection })
    }

    /// Members of `selection` in schema order.
    pub fn ordered(&self, selection: &ColumnSelection) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| selection.contains(c))
            .cloned()
            .collect()
    }
}

/// The set of columns the operator chose to move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSelection {
    columns: BTreeSet<String>,
}

impl ColumnSelection {
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

/// Which way the data flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    DatabaseToFile,
    FileToDatabase,
}

impl Direction {
    pub fn from_source(source: SourceKind) -> Self {
        match source {
            SourceKind::ClickHouse => Direction::DatabaseToFile,
            SourceKind::FlatFile => Direction::FileToDatabase,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::DatabaseToFile => write!(f, "ClickHouse -> FlatFile"),
            Direction::FileToDatabase => write!(f, "FlatFile -> ClickHouse"),
        }
    }
}

/// A fully specified one-shot transfer.
///
/// Only the request builder creates these, so `target` is always the
/// opposite kind of `source` and `columns` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: ConnectionDescriptor,
    pub target: ConnectionDescriptor,
    pub columns: Vec<String>,
}

impl TransferRequest {
    pub fn direction(&self) -> Direction {
        Direction::from_source(self.source.kind())
    }
}

/// Proof that the gateway accepted a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub endpoint: String,
    pub message: String,
}

/// What the gateway reports after a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub message: String,
    /// Row count, when the backend reports one.
    pub records: Option<u64>,
}

impl TransferSummary {
    /// Wraps a gateway message, picking up a trailing record count if present.
    ///
    /// The backend phrases it as `"... Records processed: 42"` or
    /// `"... Records inserted: 42"`.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let records = message
            .rsplit_once(':')
            .filter(|(head, _)| head.contains("Records"))
            .and_then(|(_, tail)| tail.trim().trim_end_matches('.').parse::<u64>().ok());
        Self { message, records }
    }
}
