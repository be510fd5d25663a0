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

//! Infrastructure adapter that talks to the ingestion service over HTTP.

use crate::domain::descriptor::ConnectionDescriptor;
use crate::domain::entities::{ConnectionHandle, Schema, TransferRequest, TransferSummary};
use crate::domain::errors::{BridgeError, Result};
use crate::domain::session_state::Step;
use crate::infrastructure::http::wire::{
    Envelope, WireBody, CONNECT_PATH, INGEST_PATH, LOAD_COLUMNS_PATH,
};
use crate::ports::backend_gateway::BackendGateway;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;

/// Longest slice of an unparseable response body quoted back in an error.
const MAX_BODY_IN_ERROR: usize = 200;

/// Concrete implementation of `BackendGateway` for the JSON-over-HTTP service.
///
/// Every call is a single `POST` with no retry. Request timeouts come from the
/// `reqwest::Client` handed in at construction.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `body` to `path` and decodes the response envelope.
    ///
    /// Failing to send, to read, or to parse the response is a transport
    /// error. A parsed envelope with `status: "error"` (or a non-2xx status)
    /// is a backend error carrying the service's message.
    async fn post(&self, step: Step, path: &str, body: &WireBody) -> Result<Envelope> {
        let url = format!("{}/{}", self.base_url, path);
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "POST {} {}",
                url,
                serde_json::to_string(&body.redacted()).unwrap_or_default()
            );
        }

        let transport = |e: reqwest::Error| BridgeError::Transport {
            step,
            message: e.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        debug!("{} -> HTTP {} {}", url, status.as_u16(), text);

        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            error!("Unreadable response from {}: {}", url, e);
            BridgeError::Transport {
                step,
                message: format!(
                    "HTTP {} with unreadable body: {}",
                    status.as_u16(),
                    truncate(&text, MAX_BODY_IN_ERROR)
                ),
            }
        })?;

        if !status.is_success() && envelope.is_success() {
            return Err(BridgeError::Backend {
                step,
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }
        envelope.into_result(step)
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn connect(&self, descriptor: &ConnectionDescriptor) -> Result<ConnectionHandle> {
        let envelope = self
            .post(Step::Connect, CONNECT_PATH, &WireBody::endpoint(descriptor))
            .await?;
        Ok(ConnectionHandle {
            endpoint: descriptor.summary(),
            message: envelope
                .message
                .unwrap_or_else(|| format!("{} connection successful", descriptor.kind())),
        })
    }

    async fn discover_schema(&self, descriptor: &ConnectionDescriptor) -> Result<Schema> {
        let envelope = self
            .post(
                Step::DiscoverSchema,
                LOAD_COLUMNS_PATH,
                &WireBody::endpoint(descriptor),
            )
            .await?;
        match envelope.data {
            Some(columns) => Schema::new(columns),
            None => Err(BridgeError::Backend {
                step: Step::DiscoverSchema,
                message: "response carried no column data".to_string(),
            }),
        }
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferSummary> {
        let envelope = self
            .post(Step::Transfer, INGEST_PATH, &WireBody::ingest(request))
            .await?;
        Ok(TransferSummary::from_message(
            envelope
                .message
                .unwrap_or_else(|| "Ingestion successful".to_string()),
        ))
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::{DatabaseEndpoint, FlatFileEndpoint};
    use crate::domain::errors::ErrorKind;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Captured request: the request line and the JSON body.
    struct Captured {
        request_line: String,
        body: Value,
    }

    /// Accepts one connection, records the request and answers with `body`.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            captured
        });
        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> Captured {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            buf.extend_from_slice(&chunk[..n]);

            let Some(split) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..split]).to_string();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let body_start = split + 4;
            if buf.len() >= body_start + length {
                return Captured {
                    request_line: head.lines().next().unwrap_or_default().to_string(),
                    body: serde_json::from_slice(&buf[body_start..body_start + length]).unwrap(),
                };
            }
        }
    }

    fn db() -> ConnectionDescriptor {
        ConnectionDescriptor::Database(
            DatabaseEndpoint::new("ch", 8123, "default", "ops", "jwt", "sales").unwrap(),
        )
    }

    fn file() -> ConnectionDescriptor {
        ConnectionDescriptor::FlatFile(FlatFileEndpoint::new("/srv/sales.csv", ",").unwrap())
    }

    #[tokio::test]
    async fn test_connect_posts_descriptor() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"status":"success","message":"ClickHouse connection successful"}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), format!("{}/", url));

        let handle = gateway.connect(&db()).await.unwrap();
        assert_eq!(handle.message, "ClickHouse connection successful");

        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with("POST /connect "));
        assert_eq!(captured.body["sourceType"], "ClickHouse");
        assert_eq!(captured.body["tableName"], "sales");
        assert_eq!(captured.body["port"], 8123);
    }

    #[tokio::test]
    async fn test_load_columns_returns_schema() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"status":"success","message":"","data":["id","name","amount"]}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), url);

        let schema = gateway.discover_schema(&file()).await.unwrap();
        assert_eq!(schema.columns(), &["id", "name", "amount"]);

        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with("POST /loadColumns "));
        assert_eq!(captured.body["filePath"], "/srv/sales.csv");
    }

    #[tokio::test]
    async fn test_load_columns_without_data_is_backend_error() {
        let (url, _server) = serve_once("200 OK", r#"{"status":"success"}"#).await;
        let gateway = HttpGateway::new(Client::new(), url);

        let err = gateway.discover_schema(&file()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_ingest_error_message_passed_verbatim() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"status":"error","message":"table not found"}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), url);
        let request = TransferRequest {
            source: file(),
            target: db(),
            columns: vec!["id".into(), "amount".into()],
        };

        let err = gateway.transfer(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.operator_message(), "table not found");

        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with("POST /ingest "));
        assert_eq!(captured.body["selectedColumns"], "id,amount");
        assert_eq!(captured.body["targetTable"], "sales");
        assert_eq!(captured.body["targetType"], "ClickHouse");
    }

    #[tokio::test]
    async fn test_ingest_success_reads_record_count() {
        let (url, _server) = serve_once(
            "200 OK",
            r#"{"status":"success","message":"Ingestion successful. Records processed: 12"}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), url);
        let request = TransferRequest {
            source: db(),
            target: file(),
            columns: vec!["id".into()],
        };

        let summary = gateway.transfer(&request).await.unwrap();
        assert_eq!(summary.records, Some(12));
    }

    #[tokio::test]
    async fn test_server_error_status_with_envelope() {
        let (url, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"status":"error","message":"Internal Server Error: boom"}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), url);

        let err = gateway.connect(&db()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.operator_message(), "Internal Server Error: boom");
    }

    #[tokio::test]
    async fn test_server_error_status_overrides_success_envelope() {
        let (url, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"status":"success","message":"x"}"#,
        )
        .await;
        let gateway = HttpGateway::new(Client::new(), url);

        let err = gateway.connect(&db()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.operator_message(), "x");
    }

    #[tokio::test]
    async fn test_server_error_status_without_message_reports_status_code() {
        let (url, _server) =
            serve_once("500 Internal Server Error", r#"{"status":"success"}"#).await;
        let gateway = HttpGateway::new(Client::new(), url);

        let err = gateway.discover_schema(&file()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.operator_message(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_unreadable_body_is_transport_error() {
        let (url, _server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        let gateway = HttpGateway::new(Client::new(), url);

        let err = gateway.connect(&db()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.operator_message().contains("502"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpGateway::new(Client::new(), format!("http://{}", addr));
        let err = gateway.connect(&db()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
