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

//! # Wire Format
//!
//! JSON bodies exchanged with the ingestion service.
//!
//! The service expects one flat object per request: `sourceType`, then the
//! fields of whichever endpoint kinds are involved. Fields that do not apply
//! are left out entirely rather than sent as `null`.

use crate::domain::descriptor::{ConnectionDescriptor, DatabaseEndpoint, FlatFileEndpoint};
use crate::domain::entities::TransferRequest;
use crate::domain::errors::{BridgeError, Result};
use crate::domain::session_state::Step;
use serde::{Deserialize, Serialize};

pub const CONNECT_PATH: &str = "connect";
pub const LOAD_COLUMNS_PATH: &str = "loadColumns";
pub const INGEST_PATH: &str = "ingest";

/// Request body for `/connect`, `/loadColumns` and `/ingest`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireBody {
    pub source_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_columns: Option<String>,
}

impl WireBody {
    /// Body for `/connect` and `/loadColumns`: just the one endpoint.
    pub fn endpoint(descriptor: &ConnectionDescriptor) -> Self {
        let mut body = WireBody {
            source_type: descriptor.kind().as_str(),
            ..Default::default()
        };
        match descriptor {
            ConnectionDescriptor::Database(db) => {
                body.set_database(db);
                body.table_name = Some(db.table().to_string());
            }
            ConnectionDescriptor::FlatFile(file) => body.set_file(file),
        }
        body
    }

    /// Body for `/ingest`.
    ///
    /// The service names the table differently per direction: `tableName`
    /// when reading from ClickHouse, `targetTable` when writing to it.
    pub fn ingest(request: &TransferRequest) -> Self {
        let mut body = WireBody {
            source_type: request.source.kind().as_str(),
            target_type: Some(request.target.kind().as_str()),
            selected_columns: Some(request.columns.join(",")),
            ..Default::default()
        };

        for (descriptor, is_source) in [(&request.source, true), (&request.target, false)] {
            match descriptor {
                ConnectionDescriptor::Database(db) => {
                    body.set_database(db);
                    if is_source {
                        body.table_name = Some(db.table().to_string());
                    } else {
                        body.target_table = Some(db.table().to_string());
                    }
                }
                ConnectionDescriptor::FlatFile(file) => body.set_file(file),
            }
        }
        body
    }

    /// Copy of the body that is safe to log.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(token) = copy.jwt_token.as_mut() {
            if !token.is_empty() {
                *token = "<redacted>".to_string();
            }
        }
        copy
    }

    fn set_database(&mut self, db: &DatabaseEndpoint) {
        self.host = Some(db.host().to_string());
        self.port = Some(db.port());
        self.database = Some(db.database_name().to_string());
        self.user = Some(db.user().to_string());
        self.jwt_token = Some(db.auth_token().to_string());
    }

    fn set_file(&mut self, file: &FlatFileEndpoint) {
        self.file_path = Some(file.path().to_string());
        self.delimiter = Some(file.delimiter().to_string());
    }
}

/// The response envelope shared by all three endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<String>>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// Turns an `"error"` envelope into a backend error for `step`.
    ///
    /// The service's message is the only diagnostic, so it is passed on
    /// untouched.
    pub fn into_result(self, step: Step) -> Result<Envelope> {
        if self.is_success() {
            return Ok(self);
        }
        let message = match self.message {
            Some(m) if !m.trim().is_empty() => m,
            _ => format!("gateway reported status '{}' without a message", self.status),
        };
        Err(BridgeError::Backend { step, message })
    }
}
