// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::Path;
use std::time::Duration;

use hyper_util::rt::TokioIo;
use log::debug;
use tokio::net::UnixStream;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

use crate::api::PodResourcesListerClient;
use crate::errors::{Error, Result};

/// An open gRPC channel to the pod resources service. Dropping it closes the
/// underlying socket.
pub type Session = PodResourcesListerClient<Channel>;

/// Open a session on the Unix socket at `socket_path`.
///
/// The connection is made eagerly so that a missing or dead socket is
/// reported here rather than on the first request. No retries.
pub async fn connect(
    socket_path: &Path,
    timeout: Duration,
    max_message_size: usize,
) -> Result<Session> {
    let path = socket_path.to_path_buf();

    // The URI is ignored by the connector, tonic only needs a valid authority.
    let channel = Endpoint::from_static("http://localhost")
        .connect_timeout(timeout)
        .connect_with_connector(service_fn(move |_: Uri| {
            let path = path.clone();
            async move {
                let stream = UnixStream::connect(path).await?;
                Ok::<_, std::io::Error>(TokioIo::new(stream))
            }
        }))
        .await
        .map_err(|source| Error::Connection {
            path: socket_path.to_path_buf(),
            source,
        })?;

    debug!("connected to {}", socket_path.display());

    Ok(PodResourcesListerClient::new(channel)
        .max_decoding_message_size(max_message_size)
        .max_encoding_message_size(max_message_size))
}
