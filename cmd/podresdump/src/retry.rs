// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt::Display;
use std::time::Duration;

use log::warn;

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// How a failed request or subscribe call is retried.
///
/// Either the first failure is final, or the call is repeated forever with a
/// fixed pause between attempts. There is no backoff growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Option<Duration>,
}

impl RetryPolicy {
    pub fn never() -> Self {
        Self { interval: None }
    }

    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
        }
    }

    /// Fixed one second interval, used by `--autoreconnect`.
    pub fn default_fixed() -> Self {
        Self::fixed(DEFAULT_RETRY_INTERVAL)
    }

    /// Delay before the next attempt, or `None` when failures are final.
    pub fn next_delay(&self) -> Option<Duration> {
        self.interval
    }

    /// Called after attempt number `attempt` failed with `err`.
    ///
    /// Returns `Ok(())` once the pause is over and the caller should try
    /// again, or hands `err` back when failures are final.
    pub async fn after_failure<E: Display>(&self, what: &str, attempt: u64, err: E) -> Result<(), E> {
        let Some(delay) = self.next_delay() else {
            return Err(err);
        };
        warn!(
            "{what} failed (attempt {attempt}): {err}, retrying in {}s",
            delay.as_secs_f64()
        );
        tokio::time::sleep(delay).await;
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::never()
    }
}
