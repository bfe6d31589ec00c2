// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use podresdump::cli::Args;
use podresdump::presenter::TextPresenter;
use podresdump::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level()).context("failed to initialize logger")?;

    let config = args.into_config();
    info!(
        "podresdump {} starting ({} mode, socket {})",
        env!("CARGO_PKG_VERSION"),
        config.mode,
        config.socket_path.display()
    );

    let shutdown = shutdown_signal().context("failed to install signal handlers")?;
    let mut presenter = TextPresenter::new(io::stdout());

    if let Err(e) = podresdump::run(&config, &mut presenter, shutdown).await {
        error!("{e}");
        std::process::exit(1);
    }
    Ok(())
}
