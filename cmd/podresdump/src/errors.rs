// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to connect to {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("{call} request failed: {status}")]
    Request {
        call: &'static str,
        status: tonic::Status,
    },

    #[error("failed to watch: {0}")]
    Subscribe(tonic::Status),

    #[error("stream receive failed: {0}")]
    Receive(tonic::Status),

    #[error("failed to render record: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
