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

//! # Ingestion Session
//!
//! The `Session` is the aggregate root of the application. It owns the
//! source descriptor, the target configuration, the discovered schema, the
//! operator's column selection and the last outcome, and it is the only thing
//! allowed to change them.
//!
//! Every public method is a transition. A transition first checks that the
//! current state declares it; if not, it returns `BridgeError::Precondition`
//! and nothing is touched. Local validation failures behave the same way.
//! Only an answer from the gateway (success or failure) moves the session
//! forward.
//!
//! ```text
//! Disconnected --connect--> Connected --discover_schema--> SchemaLoaded
//! SchemaLoaded --select_columns--> SchemaLoaded
//! SchemaLoaded --transfer--> Transferring --> Succeeded | Failed
//! ```

use crate::application::request_builder::{build_transfer_request, check_target};
use crate::domain::descriptor::ConnectionDescriptor;
use crate::domain::entities::{
    ColumnSelection, ConnectionHandle, Schema, TransferRequest, TransferSummary,
};
use crate::domain::errors::{BridgeError, Result};
use crate::domain::session_state::{Outcome, SessionState, Step};
use crate::ports::backend_gateway::BackendGateway;
use log::{debug, info, warn};
use std::sync::Arc;

/// A single operator session against one gateway.
pub struct Session {
    gateway: Arc<dyn BackendGateway>,
    state: SessionState,
    descriptor: Option<ConnectionDescriptor>,
    target: Option<ConnectionDescriptor>,
    schema: Option<Schema>,
    selection: ColumnSelection,
    outcome: Option<Outcome>,
    summary: Option<TransferSummary>,
}

impl Session {
    /// Creates a session in `Disconnected`.
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            state: SessionState::Disconnected,
            descriptor: None,
            target: None,
            schema: None,
            selection: ColumnSelection::default(),
            outcome: None,
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn descriptor(&self) -> Option<&ConnectionDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn target(&self) -> Option<&ConnectionDescriptor> {
        self.target.as_ref()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Summary of the last successful transfer.
    pub fn last_summary(&self) -> Option<&TransferSummary> {
        self.summary.as_ref()
    }

    /// `Disconnected | Failed --connect--> Connected | Failed`
    ///
    /// From `Failed` the descriptor may be corrected, but it must stay the
    /// same kind of endpoint; switching between database and file needs a
    /// `reset` first. Schema and selection are never touched here.
    pub async fn connect(&mut self, descriptor: ConnectionDescriptor) -> Result<ConnectionHandle> {
        match self.state {
            SessionState::Disconnected => {}
            SessionState::Failed { .. } => {
                if let Some(current) = &self.descriptor {
                    if current.kind() != descriptor.kind() {
                        return Err(BridgeError::Precondition {
                            operation: "switch source type without a reset",
                            state: self.state,
                        });
                    }
                }
            }
            _ => return Err(self.precondition("connect")),
        }
        if let Some(target) = &self.target {
            check_target(descriptor.kind(), target)?;
        }

        info!("Connecting to {}", descriptor);
        let result = self.gateway.connect(&descriptor).await;
        self.descriptor = Some(descriptor);

        match result {
            Ok(handle) => {
                info!("Connected: {}", handle.message);
                self.state = SessionState::Connected;
                self.outcome = Some(Outcome::success(handle.message.clone()));
                Ok(handle)
            }
            Err(e) => Err(self.fail(Step::Connect, e)),
        }
    }

    /// `Connected | SchemaLoaded | Succeeded | Failed --discover_schema--> SchemaLoaded | Failed`
    ///
    /// A successful discovery replaces the schema wholesale and clears the
    /// selection. A failed one keeps whatever schema was there before.
    pub async fn discover_schema(&mut self) -> Result<Schema> {
        let allowed = matches!(
            self.state,
            SessionState::Connected
                | SessionState::SchemaLoaded
                | SessionState::Succeeded
                | SessionState::Failed {
                    step: Step::DiscoverSchema | Step::Transfer
                }
        );
        if !allowed {
            return Err(self.precondition("discover schema"));
        }
        let descriptor = match &self.descriptor {
            Some(d) => d.clone(),
            None => return Err(self.precondition("discover schema")),
        };

        info!("Discovering columns for {}", descriptor);
        match self.gateway.discover_schema(&descriptor).await {
            Ok(schema) => {
                info!("Discovered {} column(s)", schema.len());
                debug!("Schema: {:?}", schema.columns());
                self.schema = Some(schema.clone());
                self.selection = ColumnSelection::default();
                self.state = SessionState::SchemaLoaded;
                self.outcome = Some(Outcome::success(format!(
                    "Columns loaded ({}).",
                    schema.len()
                )));
                Ok(schema)
            }
            Err(e) => Err(self.fail(Step::DiscoverSchema, e)),
        }
    }

    /// `SchemaLoaded | Failed(transfer) --select_columns--> SchemaLoaded`
    ///
    /// The whole selection is replaced. An empty set, or one naming a column
    /// the schema lacks, is rejected with `InvalidSelection` and the previous
    /// selection stays in place.
    pub fn select_columns<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = matches!(
            self.state,
            SessionState::SchemaLoaded
                | SessionState::Failed {
                    step: Step::Transfer
                }
        );
        let schema = match (&self.schema, allowed) {
            (Some(schema), true) => schema,
            _ => return Err(self.precondition("select columns")),
        };

        let selection = schema.select(names)?;
        debug!("Selected columns: {:?}", schema.ordered(&selection));
        self.selection = selection;
        self.state = SessionState::SchemaLoaded;
        Ok(())
    }

    /// Sets the endpoint data will be written to.
    ///
    /// Allowed in every state except `Transferring`. Once a source is known the
    /// target must be the opposite kind.
    pub fn configure_target(&mut self, target: ConnectionDescriptor) -> Result<()> {
        if self.state == SessionState::Transferring {
            return Err(self.precondition("configure target"));
        }
        if let Some(source) = &self.descriptor {
            check_target(source.kind(), &target)?;
        }
        debug!("Target configured: {}", target);
        self.target = Some(target);
        Ok(())
    }

    /// `SchemaLoaded --transfer--> Transferring --> Succeeded | Failed`
    ///
    /// Requires a non-empty selection. Everything before the gateway call is
    /// checked first, so a rejected transfer leaves the session as it was.
    pub async fn transfer(&mut self) -> Result<TransferSummary> {
        let request = self.begin_transfer()?;
        let result = self.gateway.transfer(&request).await;
        self.complete_transfer(result)
    }

    /// First half of [`Session::transfer`], for callers that run the gateway
    /// call themselves.
    ///
    /// Moves the session to `Transferring` and returns the request. Until
    /// [`Session::complete_transfer`] is called every other transition is
    /// refused.
    pub fn begin_transfer(&mut self) -> Result<TransferRequest> {
        if self.state != SessionState::SchemaLoaded || self.selection.is_empty() {
            return Err(self.precondition("transfer"));
        }
        self.enter_transfer()
    }

    /// Second half of [`Session::transfer`]: consumes the gateway's answer.
    pub fn complete_transfer(
        &mut self,
        result: Result<TransferSummary>,
    ) -> Result<TransferSummary> {
        if self.state != SessionState::Transferring {
            return Err(self.precondition("complete a transfer"));
        }
        match result {
            Ok(summary) => {
                match summary.records {
                    Some(n) => info!("Transfer succeeded, {} record(s): {}", n, summary.message),
                    None => info!("Transfer succeeded: {}", summary.message),
                }
                self.state = SessionState::Succeeded;
                self.outcome = Some(Outcome::success(summary.message.clone()));
                self.summary = Some(summary.clone());
                Ok(summary)
            }
            Err(e) => Err(self.fail(Step::Transfer, e)),
        }
    }

    /// Re-runs the transition that left the session in `Failed`, with the
    /// inputs it already holds.
    ///
    /// This is the operator pressing the same button again. Nothing retries
    /// on its own.
    pub async fn retry(&mut self) -> Result<Outcome> {
        let step = match self.state {
            SessionState::Failed { step } => step,
            _ => return Err(self.precondition("retry")),
        };
        info!("Retrying {}", step);

        match step {
            Step::Connect => {
                let descriptor = match &self.descriptor {
                    Some(d) => d.clone(),
                    None => return Err(self.precondition("retry")),
                };
                self.connect(descriptor).await?;
            }
            Step::DiscoverSchema => {
                self.discover_schema().await?;
            }
            Step::Transfer => {
                let request = self.enter_transfer()?;
                let result = self.gateway.transfer(&request).await;
                self.complete_transfer(result)?;
            }
        }

        self.outcome
            .clone()
            .ok_or_else(|| self.precondition("retry"))
    }

    /// Returns to `Disconnected`, dropping descriptor, target, schema,
    /// selection and outcome. Refused while a transfer is in flight.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == SessionState::Transferring {
            return Err(self.precondition("reset"));
        }
        info!("Session reset");
        self.state = SessionState::Disconnected;
        self.descriptor = None;
        self.target = None;
        self.schema = None;
        self.selection = ColumnSelection::default();
        self.outcome = None;
        self.summary = None;
        Ok(())
    }

    /// Builds the request and, only if that succeeds, enters `Transferring`.
    fn enter_transfer(&mut self) -> Result<TransferRequest> {
        let (source, schema) = match (&self.descriptor, &self.schema) {
            (Some(source), Some(schema)) => (source, schema),
            _ => return Err(self.precondition("transfer")),
        };
        let request =
            build_transfer_request(source, self.target.as_ref(), schema, &self.selection)?;

        info!(
            "Starting transfer {} with {} column(s)",
            request.direction(),
            request.columns.len()
        );
        self.state = SessionState::Transferring;
        Ok(request)
    }

    /// Records a gateway failure. Descriptor, target, schema and selection
    /// are kept so the same transition can be retried.
    fn fail(&mut self, step: Step, error: BridgeError) -> BridgeError {
        warn!("{} failed: {}", step, error);
        self.state = SessionState::Failed { step };
        self.outcome = Some(Outcome::error(error.operator_message()));
        error
    }

    fn precondition(&self, operation: &'static str) -> BridgeError {
        BridgeError::Precondition {
            operation,
            state: self.state,
        }
    }
}
