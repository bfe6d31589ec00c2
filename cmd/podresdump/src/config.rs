// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_SOCKET_DIR: &str = "/var/lib/kubelet/pod-resources";
/// File name of the kubelet socket inside the pod-resources directory.
pub const SOCKET_NAME: &str = "kubelet.sock";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// 16 MiB, the limit the kubelet e2e tests use for this API.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

const UNIX_SCHEME: &str = "unix://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// One-shot listing of the pods bound to node resources.
    List,
    /// Stream pod resource changes until interrupted.
    Watch,
    /// Devices, CPUs and memory the node can hand out.
    Allocatable,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::List => write!(f, "list"),
            Mode::Watch => write!(f, "watch"),
            Mode::Allocatable => write!(f, "allocatable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub socket_path: PathBuf,
    pub timeout: Duration,
    pub max_message_size: usize,
    pub auto_reconnect: bool,
    pub namespace: String,
    pub mode: Mode,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.auto_reconnect {
            RetryPolicy::default_fixed()
        } else {
            RetryPolicy::never()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: resolve_socket_path(DEFAULT_SOCKET_DIR),
            timeout: DEFAULT_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            auto_reconnect: false,
            namespace: DEFAULT_NAMESPACE.to_string(),
            mode: Mode::List,
        }
    }
}

/// Turn the `--socket` argument into the path of the socket file.
///
/// Accepts either the pod-resources directory or the socket itself, with or
/// without a `unix://` prefix. Anything without a `.sock` extension is taken
/// as the directory holding [`SOCKET_NAME`].
pub fn resolve_socket_path(raw: &str) -> PathBuf {
    let path = Path::new(raw.strip_prefix(UNIX_SCHEME).unwrap_or(raw));
    if path.extension().is_some_and(|ext| ext == "sock") {
        path.to_path_buf()
    } else {
        path.join(SOCKET_NAME)
    }
}
