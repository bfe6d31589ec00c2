// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Debug client for the kubelet pod resources API.
//!
//! Connects to the kubelet over its local Unix socket and either lists the
//! pods bound to node resources, reports what the node can allocate, or
//! follows the change stream until interrupted.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod connector;
pub mod errors;
pub mod presenter;
pub mod retry;
pub mod shutdown;
pub mod snapshot;
pub mod watch;


use std::future::Future;

use log::{debug, info};

use crate::config::{Config, Mode};
use crate::errors::Result;
use crate::presenter::Presenter;

/// Connect to the socket named by `config` and run the selected mode.
///
/// `shutdown` stops any mode early, including while a failed call is being
/// retried. The session is closed before this returns.
pub async fn run<P, S>(config: &Config, presenter: &mut P, shutdown: S) -> Result<()>
where
    P: Presenter,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    debug!(
        "connecting to {} (timeout {:?})",
        config.socket_path.display(),
        config.timeout
    );
    let connecting = connector::connect(
        &config.socket_path,
        config.timeout,
        config.max_message_size,
    );
    let mut session = tokio::select! {
        session = connecting => session?,
        () = &mut shutdown => {
            info!("interrupted while connecting");
            return Ok(());
        }
    };

    let retry = config.retry_policy();
    debug!("running {} mode", config.mode);
    match config.mode {
        Mode::List => {
            tokio::select! {
                rendered = snapshot::list(&mut session, retry, presenter, &config.namespace) => {
                    debug!("rendered {} pod(s)", rendered?);
                }
                () = &mut shutdown => info!("interrupted while listing"),
            }
        }
        Mode::Allocatable => {
            tokio::select! {
                done = snapshot::allocatable(&mut session, retry, presenter) => done?,
                () = &mut shutdown => info!("interrupted while reading allocatable resources"),
            }
        }
        Mode::Watch => {
            watch::watch(&mut session, retry, presenter, shutdown).await?;
        }
    }
    Ok(())
}
