// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::future::Future;
use std::io;

use log::info;
use tokio::signal::unix::{SignalKind, signal};

/// Install the SIGTERM and SIGINT handlers and return a future that completes
/// on the first of them.
///
/// The handlers are registered before this returns, so a signal delivered
/// while the caller is still connecting is not lost.
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
    })
}
