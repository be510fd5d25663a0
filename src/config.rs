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

//! # Configuration
//!
//! Settings come from a YAML or JSON file, then command-line overrides are
//! applied on top, then the result is validated.
//!
//! The `clickhouse` and `flat_file` blocks play the role of the operator's
//! form. Whichever one matches `source_type` describes the source; the other
//! one describes the target of an ingest.

use crate::domain::descriptor::{
    ConnectionDescriptor, DatabaseEndpoint, FlatFileEndpoint, SourceKind,
};
use crate::domain::errors::{BridgeError, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;

/// Environment variable consulted when no JWT is configured.
pub const JWT_ENV_VAR: &str = "CLICKHOUSE_JWT";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub source_type: SourceKind,
    #[serde(default)]
    pub clickhouse: Option<ClickHouseConfig>,
    #[serde(default)]
    pub flat_file: Option<FlatFileConfig>,
    /// Directory for transfer reports. No report is written when unset.
    #[serde(default)]
    pub report_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClickHouseConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u32,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub user: String,
    pub jwt_token: Option<String>,
    #[serde(default)]
    pub table: String,
}

fn default_port() -> u32 {
    8123
}

fn default_database() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlatFileConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for FlatFileConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub gateway_url: Option<String>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// ClickHouse or FlatFile
    #[arg(long)]
    pub source_type: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u32>,
    #[arg(long)]
    pub database: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub table: Option<String>,
    #[arg(long)]
    pub file: Option<String>,
    #[arg(long)]
    pub delimiter: Option<String>,
    #[arg(long)]
    pub report_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the source endpoint is reachable
    Connect,
    /// Connect and list the source columns
    Columns,
    /// Connect, discover columns and move the selected ones to the target
    Ingest {
        /// Comma-separated column names
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Builds a config from command-line flags alone.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let source_type = match &args.source_type {
            Some(raw) => raw.parse::<SourceKind>()?,
            None if args.file.is_some() && args.table.is_none() => SourceKind::FlatFile,
            None => SourceKind::ClickHouse,
        };
        let mut config = Self {
            gateway: GatewayConfig::default(),
            source_type,
            clickhouse: None,
            flat_file: None,
            report_dir: None,
        };
        config.merge_cli(args)?;
        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(u) = &args.gateway_url { self.gateway.base_url = u.clone(); }
        if let Some(t) = args.timeout_secs { self.gateway.timeout_secs = t; }
        if let Some(s) = &args.source_type { self.source_type = s.parse::<SourceKind>()?; }
        if let Some(r) = &args.report_dir { self.report_dir = Some(r.clone()); }

        let touches_db = args.host.is_some()
            || args.port.is_some()
            || args.database.is_some()
            || args.user.is_some()
            || args.table.is_some();
        if touches_db {
            let db = self.clickhouse.get_or_insert_with(|| ClickHouseConfig {
                port: default_port(),
                database: default_database(),
                ..Default::default()
            });
            if let Some(h) = &args.host { db.host = h.clone(); }
            if let Some(p) = args.port { db.port = p; }
            if let Some(d) = &args.database { db.database = d.clone(); }
            if let Some(u) = &args.user { db.user = u.clone(); }
            if let Some(t) = &args.table { db.table = t.clone(); }
        }

        if args.file.is_some() || args.delimiter.is_some() {
            let file = self.flat_file.get_or_insert_with(FlatFileConfig::default);
            if let Some(p) = &args.file { file.path = p.clone(); }
            if let Some(d) = &args.delimiter { file.delimiter = d.clone(); }
        }
        Ok(())
    }

    /// Checks everything that can be checked without the gateway.
    pub fn validate(&self) -> Result<()> {
        let url = self.gateway.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BridgeError::ConfigError(format!(
                "gateway.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(BridgeError::ConfigError(
                "gateway.timeout_secs must be greater than zero".into(),
            ));
        }
        self.source_descriptor()?;
        Ok(())
    }

    /// The descriptor for the configured source.
    pub fn source_descriptor(&self) -> Result<ConnectionDescriptor> {
        self.descriptor_for(self.source_type)
    }

    /// The descriptor for the other side of an ingest.
    pub fn target_descriptor(&self) -> Result<ConnectionDescriptor> {
        self.descriptor_for(self.source_type.opposite())
    }

    fn descriptor_for(&self, kind: SourceKind) -> Result<ConnectionDescriptor> {
        match kind {
            SourceKind::ClickHouse => {
                let db = self.clickhouse.as_ref().ok_or_else(|| {
                    BridgeError::ConfigError("missing 'clickhouse' section".into())
                })?;
                let token = db
                    .jwt_token
                    .clone()
                    .or_else(|| std::env::var(JWT_ENV_VAR).ok())
                    .unwrap_or_default();
                Ok(ConnectionDescriptor::Database(DatabaseEndpoint::new(
                    db.host.as_str(),
                    db.port,
                    db.database.as_str(),
                    db.user.as_str(),
                    token,
                    db.table.as_str(),
                )?))
            }
            SourceKind::FlatFile => {
                let file = self.flat_file.as_ref().ok_or_else(|| {
                    BridgeError::ConfigError("missing 'flat_file' section".into())
                })?;
                Ok(ConnectionDescriptor::FlatFile(FlatFileEndpoint::new(
                    file.path.as_str(),
                    &file.delimiter,
                )?))
            }
        }
    }
}
