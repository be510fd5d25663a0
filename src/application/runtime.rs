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

//! # Runtime Context
//!
//! Sets up the resources that live for the whole run: the HTTP client and the
//! gateway adapter wired on top of it.

use crate::config::AppConfig;
use crate::domain::errors::{BridgeError, Result};
use crate::infrastructure::http::HttpGateway;
use crate::ports::backend_gateway::BackendGateway;
use log::info;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// `RuntimeContext` holds shared resources that exist for the entire life of the app.
pub struct RuntimeContext {
    /// The gateway every session in this process talks to.
    pub gateway: Arc<dyn BackendGateway>,
    pub base_url: String,
}

impl RuntimeContext {
    /// Builds the HTTP client and the gateway.
    ///
    /// The core never times out on its own; the configured timeout is applied
    /// here, and an expired request comes back as a transport error.
    pub fn init(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.gateway.timeout_secs);
        info!(
            "Initializing gateway client for {} (timeout {}s)",
            config.gateway.base_url, config.gateway.timeout_secs
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        let gateway = HttpGateway::new(client, config.gateway.base_url.as_str());
        Ok(Self {
            base_url: gateway.base_url().to_string(),
            gateway: Arc::new(gateway),
        })
    }
}
