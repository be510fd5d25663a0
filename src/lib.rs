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

//! # Ingest Bridge
//!
//! Client-side core for moving selected columns between a ClickHouse table
//! and a delimited flat file through a remote ingestion service.
//!
//! The crate follows the **Hexagonal Architecture** (Ports and Adapters): the
//! session and its state machine live in `application`, talk to the outside
//! world only through `ports::backend_gateway`, and the HTTP adapter in
//! `infrastructure::http` is plugged in at startup.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
