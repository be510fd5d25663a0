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

//! # Connection Descriptors
//!
//! A descriptor answers one question: "where does the data live?"
//!
//! It is either a ClickHouse table or a delimited flat file. Building one only
//! checks the *shape* of the input (a port in range, a non-empty path). It
//! never opens a socket or touches the disk, so an unreachable host is not a
//! construction error. That kind of failure comes back later from the gateway.

use crate::domain::errors::{BridgeError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of endpoint the bridge knows how to move data between.
///
/// The serialized names are the `sourceType` / `targetType` values on the wire.
/// Deserialization goes through `FromStr`, so config files accept the same
/// spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    ClickHouse,
    FlatFile,
}

impl SourceKind {
    /// There are exactly two directions, so the target is always the other kind.
    pub fn opposite(self) -> SourceKind {
        match self {
            SourceKind::ClickHouse => SourceKind::FlatFile,
            SourceKind::FlatFile => SourceKind::ClickHouse,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::ClickHouse => "ClickHouse",
            SourceKind::FlatFile => "FlatFile",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clickhouse" => Ok(SourceKind::ClickHouse),
            "flatfile" | "flat_file" | "file" => Ok(SourceKind::FlatFile),
            other => Err(BridgeError::ConfigError(format!(
                "Unknown source type '{}' (expected ClickHouse or FlatFile)",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for SourceKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<SourceKind>().map_err(de::Error::custom)
    }
}

/// A ClickHouse table reachable over the network.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseEndpoint {
    host: String,
    port: u16,
    database_name: String,
    user: String,
    auth_token: String,
    table: String,
}

impl DatabaseEndpoint {
    /// Validates and builds a database endpoint.
    ///
    /// `port` is taken wide so that out-of-range input is reported as a
    /// validation error rather than silently truncated. `user` and
    /// `auth_token` may be empty; the backend decides whether that is enough.
    pub fn new(
        host: impl Into<String>,
        port: u32,
        database_name: impl Into<String>,
        user: impl Into<String>,
        auth_token: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self> {
        let host = host.into().trim().to_string();
        let database_name = database_name.into().trim().to_string();
        let table = table.into().trim().to_string();

        if host.is_empty() {
            return Err(BridgeError::InvalidDescriptor("host must not be empty".into()));
        }
        let port = match u16::try_from(port) {
            Ok(p) if p > 0 => p,
            _ => {
                return Err(BridgeError::InvalidDescriptor(format!(
                    "port {} is outside 1-65535",
                    port
                )))
            }
        };
        if database_name.is_empty() {
            return Err(BridgeError::InvalidDescriptor(
                "database name must not be empty".into(),
            ));
        }
        if table.is_empty() {
            return Err(BridgeError::InvalidDescriptor("table must not be empty".into()));
        }

        Ok(Self {
            host,
            port,
            database_name,
            user: user.into(),
            auth_token: auth_token.into(),
            table,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

// The token must never end up in logs.
impl fmt::Debug for DatabaseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("user", &self.user)
            .field("auth_token", &redact(&self.auth_token))
            .field("table", &self.table)
            .finish()
    }
}

/// A delimited text file with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileEndpoint {
    path: String,
    delimiter: char,
    header: bool,
}

impl FlatFileEndpoint {
    /// Validates and builds a flat-file endpoint.
    ///
    /// The path is interpreted by the backend, not by this process, so it is
    /// only checked for being non-empty.
    pub fn new(path: impl Into<String>, delimiter: &str) -> Result<Self> {
        let path = path.into().trim().to_string();
        if path.is_empty() {
            return Err(BridgeError::InvalidDescriptor("file path must not be empty".into()));
        }
        Ok(Self {
            path,
            delimiter: parse_delimiter(delimiter)?,
            header: true,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Files always carry a header row; the schema is read from it.
    pub fn has_header(&self) -> bool {
        self.header
    }
}

/// Turns operator input into a single delimiter character.
///
/// Accepts `\t` and `tab` as spellings of the tab character, since a literal
/// tab is awkward to type into a config file or shell.
pub fn parse_delimiter(raw: &str) -> Result<char> {
    if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(BridgeError::InvalidDescriptor(format!(
            "delimiter must be exactly one character, got {:?}",
            raw
        ))),
    }
}

/// Where data lives: either a database table or a flat file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDescriptor {
    Database(DatabaseEndpoint),
    FlatFile(FlatFileEndpoint),
}

impl ConnectionDescriptor {
    pub fn kind(&self) -> SourceKind {
        match self {
            ConnectionDescriptor::Database(_) => SourceKind::ClickHouse,
            ConnectionDescriptor::FlatFile(_) => SourceKind::FlatFile,
        }
    }

    /// A one-line description that is safe to log or write to a report.
    pub fn summary(&self) -> String {
        match self {
            ConnectionDescriptor::Database(db) => {
                let user = if db.user.is_empty() {
                    String::new()
                } else {
                    format!("{}@", db.user)
                };
                format!(
                    "clickhouse://{}{}:{}/{}.{}",
                    user, db.host, db.port, db.database_name, db.table
                )
            }
            ConnectionDescriptor::FlatFile(file) => {
                format!("file:{} (delimiter {:?})", file.path, file.delimiter)
            }
        }
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn database() -> DatabaseEndpoint {
        DatabaseEndpoint::new("localhost", 8123, "default", "ops", "s3cr3t", "events").unwrap()
    }

    #[test]
    fn test_database_endpoint_validation() {
        assert!(DatabaseEndpoint::new("", 8123, "default", "", "", "events").is_err());
        assert!(DatabaseEndpoint::new("h", 0, "default", "", "", "events").is_err());
        assert!(DatabaseEndpoint::new("h", 65536, "default", "", "", "events").is_err());
        assert!(DatabaseEndpoint::new("h", 9000, " ", "", "", "events").is_err());
        assert!(DatabaseEndpoint::new("h", 9000, "default", "", "", "").is_err());

        let err = DatabaseEndpoint::new("h", 70000, "default", "", "", "t").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let db = DatabaseEndpoint::new(" h ", 65535, "default", "", "", " t ").unwrap();
        assert_eq!(db.host(), "h");
        assert_eq!(db.port(), 65535);
        assert_eq!(db.table(), "t");
    }

    #[test]
    fn test_flat_file_validation() {
        assert!(FlatFileEndpoint::new("", ",").is_err());
        assert!(FlatFileEndpoint::new("/tmp/a.csv", "").is_err());
        assert!(FlatFileEndpoint::new("/tmp/a.csv", ";;").is_err());

        let file = FlatFileEndpoint::new("/tmp/a.csv", "|").unwrap();
        assert_eq!(file.delimiter(), '|');
        assert!(file.has_header());

        assert_eq!(FlatFileEndpoint::new("a", "\\t").unwrap().delimiter(), '\t');
        assert_eq!(FlatFileEndpoint::new("a", "TAB").unwrap().delimiter(), '\t');
    }

    #[test]
    fn test_token_is_redacted() {
        let db = database();
        let debug = format!("{:?}", ConnectionDescriptor::Database(db.clone()));
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("<redacted>"));

        let summary = ConnectionDescriptor::Database(db).summary();
        assert_eq!(summary, "clickhouse://ops@localhost:8123/default.events");
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("clickhouse".parse::<SourceKind>().unwrap(), SourceKind::ClickHouse);
        assert_eq!("FlatFile".parse::<SourceKind>().unwrap(), SourceKind::FlatFile);
        assert!("postgres".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::ClickHouse.opposite(), SourceKind::FlatFile);
        assert_eq!(SourceKind::FlatFile.opposite(), SourceKind::ClickHouse);
    }
}
