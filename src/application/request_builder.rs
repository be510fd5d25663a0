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

//! # Transfer Request Builder
//!
//! Turns the session's source, target, schema and selection into a
//! `TransferRequest`. Pure and deterministic: no I/O, and the same inputs
//! always yield the same request.

use crate::domain::descriptor::{ConnectionDescriptor, SourceKind};
use crate::domain::entities::{ColumnSelection, Schema, TransferRequest};
use crate::domain::errors::{BridgeError, Result};

/// Enforces the direction rule: the target is always the other kind of endpoint.
pub fn check_target(source: SourceKind, target: &ConnectionDescriptor) -> Result<()> {
    let expected = source.opposite();
    if target.kind() != expected {
        return Err(BridgeError::TargetMismatch {
            expected: expected.as_str(),
            actual: target.kind().as_str(),
        });
    }
    Ok(())
}

/// Builds the request for a transfer.
///
/// Columns are emitted in schema order, not in the order the operator picked
/// them.
pub fn build_transfer_request(
    source: &ConnectionDescriptor,
    target: Option<&ConnectionDescriptor>,
    schema: &Schema,
    selection: &ColumnSelection,
) -> Result<TransferRequest> {
    if selection.is_empty() {
        return Err(BridgeError::EmptySelection);
    }
    let target = target.ok_or(BridgeError::MissingTarget)?;
    check_target(source.kind(), target)?;

    let columns = schema.ordered(selection);
    if columns.len() != selection.len() {
        let stale: Vec<&str> = selection.iter().filter(|c| !schema.contains(c)).collect();
        return Err(BridgeError::InvalidSelection(format!(
            "column(s) no longer in schema: {}",
            stale.join(", ")
        )));
    }

    Ok(TransferRequest {
        source: source.clone(),
        target: target.clone(),
        columns,
    })
}
