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

//! Core error definitions for the ingestion bridge.
//!
//! This module provides a centralized `BridgeError` enum and a `Result` type
//! used throughout the application. Every variant belongs to exactly one
//! [`ErrorKind`], so callers can branch on the kind of failure instead of
//! matching on message text.

use crate::domain::session_state::{SessionState, Step};
use thiserror::Error;

/// The four families of failure the session can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad local input. Detected before anything is sent to the gateway.
    Validation,
    /// A transition was invoked from a state that does not declare it.
    Precondition,
    /// The gateway answered, and the answer was a failure.
    Backend,
    /// The gateway call itself could not complete.
    Transport,
}

/// Error types encountered while driving an ingestion session.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No columns selected")]
    EmptySelection,

    #[error("No target configured for the transfer")]
    MissingTarget,

    #[error("Target must be a {expected} endpoint, got {actual}")]
    TargetMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cannot {operation} while session is {state}")]
    Precondition {
        operation: &'static str,
        state: SessionState,
    },

    #[error("{step} failed: {message}")]
    Backend { step: Step, message: String },

    #[error("{step} could not reach the gateway: {message}")]
    Transport { step: Step, message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl BridgeError {
    /// Classifies the error into one of the four session failure families.
    ///
    /// Configuration and file errors count as validation problems: they are
    /// caught before a session ever talks to the gateway.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Precondition { .. } => ErrorKind::Precondition,
            BridgeError::Backend { .. } => ErrorKind::Backend,
            BridgeError::Transport { .. } => ErrorKind::Transport,
            BridgeError::InvalidDescriptor(_)
            | BridgeError::InvalidSelection(_)
            | BridgeError::EmptySelection
            | BridgeError::MissingTarget
            | BridgeError::TargetMismatch { .. }
            | BridgeError::ConfigError(_)
            | BridgeError::IoError(_)
            | BridgeError::YamlError(_)
            | BridgeError::JsonError(_) => ErrorKind::Validation,
        }
    }

    /// The message an operator should see for a gateway failure.
    ///
    /// For backend and transport errors this is the gateway's text verbatim;
    /// everything else falls back to the `Display` form.
    pub fn operator_message(&self) -> String {
        match self {
            BridgeError::Backend { message, .. } | BridgeError::Transport { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// A specialized Result type for the ingestion bridge.
pub type Result<T> = std::result::Result<T, BridgeError>;
