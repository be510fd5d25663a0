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

//! # Session Lifecycle
//!
//! The states a session moves through, and the record of how the last
//! transition ended.

use serde::Serialize;
use std::fmt;

/// A transition that talks to the gateway.
///
/// `Failed` remembers which one went wrong so the operator can retry exactly
/// that transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Connect,
    DiscoverSchema,
    Transfer,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Connect => write!(f, "connect"),
            Step::DiscoverSchema => write!(f, "schema discovery"),
            Step::Transfer => write!(f, "transfer"),
        }
    }
}

/// Lifecycle of an ingestion session.
///
/// ```text
/// Disconnected -> Connected -> SchemaLoaded -> Transferring -> Succeeded
///                                                           \-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    SchemaLoaded,
    Transferring,
    Succeeded,
    Failed { step: Step },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "Disconnected"),
            SessionState::Connected => write!(f, "Connected"),
            SessionState::SchemaLoaded => write!(f, "SchemaLoaded"),
            SessionState::Transferring => write!(f, "Transferring"),
            SessionState::Succeeded => write!(f, "Succeeded"),
            SessionState::Failed { step } => write!(f, "Failed ({})", step),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Status text of the most recent gateway exchange, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}
