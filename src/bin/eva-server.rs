// ABOUTME: EVA server binary entry point
// ABOUTME: Loads configuration, initializes logging, builds the application context and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # EVA Server Binary
//!
//! Starts the match analysis and coaching API.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eva_server::{config::environment::ServerConfig, context::AppContext, logging, server};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "eva-server")]
#[command(about = "EVA - Rocket League match analysis and coaching API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override dataset path
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    logging::init_from_env()?;

    info!("Starting EVA server");
    info!("{}", config.summary());
    if !config.llm.credential.is_configured() {
        info!("Coach chat will refuse questions until OPENAI_API_KEY is set");
    }

    let context = AppContext::from_config(config)?;

    if let Err(e) = server::run(context).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
