// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::time::Duration;

use clap::Parser;

use crate::config::{
    Config, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_NAMESPACE, DEFAULT_SOCKET_DIR, Mode,
    resolve_socket_path,
};

/// Dump the node resources the kubelet assigned to pods
#[derive(Parser, Debug, Clone)]
#[command(name = "podresdump")]
#[command(about = "Query the kubelet pod resources API and print what it reports")]
pub struct Args {
    /// Don't give up if the request or subscription fails
    #[arg(short = 'A', long = "autoreconnect")]
    pub auto_reconnect: bool,

    /// Pod resources socket path (directory or socket file)
    #[arg(short = 'S', long, default_value = DEFAULT_SOCKET_DIR)]
    pub socket: String,

    /// Namespace to check in list mode
    #[arg(short = 'N', long = "listnamespace", default_value = DEFAULT_NAMESPACE)]
    pub list_namespace: String,

    /// Pod resources API endpoint to query
    #[arg(short = 'E', long, value_enum, default_value_t = Mode::List)]
    pub endpoint: Mode,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum size in bytes of a single response message
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn log_level(&self) -> log::Level {
        if self.verbose {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }

    pub fn into_config(self) -> Config {
        Config {
            socket_path: resolve_socket_path(&self.socket),
            timeout: Duration::from_secs(self.timeout),
            max_message_size: self.max_message_size,
            auto_reconnect: self.auto_reconnect,
            namespace: self.list_namespace,
            mode: self.endpoint,
        }
    }
}
