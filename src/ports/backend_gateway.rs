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

//! # Backend Gateway Port
//!
//! The only way the session reaches the outside world.
//!
//! The session does not know whether the other side is the HTTP ingestion
//! service, a test double, or something else entirely. Anything that
//! implements `BackendGateway` can drive it.

use crate::domain::descriptor::ConnectionDescriptor;
use crate::domain::entities::{ConnectionHandle, Schema, TransferRequest, TransferSummary};
use crate::domain::errors::Result;
use async_trait::async_trait;

/// Three request/response exchanges, no streaming and no partial progress.
///
/// Each call is one attempt. Implementations must not retry on their own;
/// retrying is the operator re-invoking the same session transition.
/// Failures come back as `BridgeError::Backend` (the service said no) or
/// `BridgeError::Transport` (the service could not be reached).
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Checks that the endpoint is reachable and the credentials work.
    async fn connect(&self, descriptor: &ConnectionDescriptor) -> Result<ConnectionHandle>;

    /// Returns the column names of the table or file header, in order.
    async fn discover_schema(&self, descriptor: &ConnectionDescriptor) -> Result<Schema>;

    /// Moves the selected columns from `request.source` to `request.target`.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferSummary>;
}
