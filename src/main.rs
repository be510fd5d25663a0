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

use clap::Parser;
use ingest_bridge::application::report::{write_report, TransferReport};
use ingest_bridge::application::runtime::RuntimeContext;
use ingest_bridge::application::session::Session;
use ingest_bridge::config::{AppConfig, CliArgs, Command};
use ingest_bridge::domain::errors::Result;
use ingest_bridge::domain::session_state::Outcome;
use log::{error, info, warn};
use std::path::Path;
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    // 1. Initialize Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load Config, then apply CLI overrides
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // 4. Wire the gateway
    let ctx = match RuntimeContext::init(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize runtime: {}", e);
            process::exit(1);
        }
    };
    info!("Using ingestion service at {}", ctx.base_url);
    let mut session = Session::new(ctx.gateway.clone());

    // 5. Run the command
    if let Err(e) = run(&mut session, &ctx, &config, &args.command).await {
        error!("{} ({:?} error)", e, e.kind());
        eprintln!("Error: {}", e.operator_message());
        process::exit(1);
    }
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            let mut c = AppConfig::from_file(path)?;
            c.merge_cli(args)?;
            c
        }
        None => AppConfig::from_cli(args)?,
    };
    config.gateway.base_url = config.gateway.base_url.trim().to_string();
    config.validate()?;
    Ok(config)
}

async fn run(
    session: &mut Session,
    ctx: &RuntimeContext,
    config: &AppConfig,
    command: &Command,
) -> Result<()> {
    let handle = session.connect(config.source_descriptor()?).await?;
    println!("{}", handle.message);
    if *command == Command::Connect {
        return Ok(());
    }

    let schema = session.discover_schema().await?;
    if let Command::Ingest { columns } = command {
        session.configure_target(config.target_descriptor()?)?;
        session.select_columns(columns.iter().map(|c| c.trim().to_string()))?;
        return ingest(session, ctx, config).await;
    }

    for column in schema.columns() {
        println!("{}", column);
    }
    Ok(())
}

async fn ingest(session: &mut Session, ctx: &RuntimeContext, config: &AppConfig) -> Result<()> {
    let started = Instant::now();
    let request = session.begin_transfer()?;
    let result = session.complete_transfer(ctx.gateway.transfer(&request).await);

    if let Some(dir) = &config.report_dir {
        let outcome = session
            .outcome()
            .cloned()
            .unwrap_or_else(|| Outcome::error("no outcome recorded"));
        let records = result.as_ref().ok().and_then(|s| s.records);
        let report = TransferReport::new(
            &request,
            &outcome,
            records,
            started.elapsed().as_secs_f64(),
        );
        if let Err(e) = write_report(Path::new(dir), &report) {
            warn!("Could not write transfer report: {}", e);
        }
    }

    let summary = result?;
    println!("{}", summary.message);
    Ok(())
}
