// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Watch mode: follow the pod resources change stream until it ends or the
//! operator interrupts.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tonic::Status;

use crate::api::{WatchPodAction, WatchPodResourcesResponse};
use crate::client::PodResourcesSource;
use crate::errors::{Error, Result};
use crate::presenter::Presenter;
use crate::retry::RetryPolicy;

/// The receive task blocks on this one slot until the control loop has taken
/// the previous event, so events are handed over in stream order.
const EVENT_QUEUE_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Subscribing, possibly retrying.
    Connecting,
    /// Receiving and rendering events.
    Streaming,
    /// Stream ended or interrupted; tearing down the receive task.
    Draining,
    /// Summary logged.
    Terminated,
}

impl WatchState {
    pub(crate) fn can_transition_to(self, next: WatchState) -> bool {
        use WatchState::*;
        matches!(
            (self, next),
            (Connecting, Streaming)
                | (Connecting, Terminated)
                | (Streaming, Draining)
                | (Draining, Terminated)
        )
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchState::Connecting => write!(f, "connecting"),
            WatchState::Streaming => write!(f, "streaming"),
            WatchState::Draining => write!(f, "draining"),
            WatchState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Why the watch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The server closed the stream or a receive failed.
    StreamEnded,
    /// The shutdown signal fired.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub messages: u64,
    pub elapsed: Duration,
    pub termination: Termination,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} messages in {:?}", self.messages, self.elapsed)
    }
}

/// Short tag for a watch action. Values outside the known enum map to `???`.
pub fn action_tag(action: i32) -> &'static str {
    match WatchPodAction::try_from(action) {
        Ok(WatchPodAction::Added) => "ADD",
        Ok(WatchPodAction::Modified) => "MOD",
        Ok(WatchPodAction::Deleted) => "DEL",
        Err(_) => "???",
    }
}

/// Counters and state of one watch run.
struct Consumer {
    state: WatchState,
    started: Instant,
    messages: u64,
}

impl Consumer {
    fn new() -> Self {
        Self {
            state: WatchState::Connecting,
            started: Instant::now(),
            messages: 0,
        }
    }

    fn transition(&mut self, next: WatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid watch transition {} -> {next}",
            self.state
        );
        debug!("watch {} -> {next}", self.state);
        self.state = next;
    }

    fn render<P: Presenter>(&mut self, presenter: &mut P, event: &WatchPodResourcesResponse) {
        let tag = action_tag(event.action);
        match presenter.render_event(tag, &event.pod_resources) {
            Ok(()) => self.messages += 1,
            Err(e) => warn!("skipping {tag} event: {e}"),
        }
    }

    fn finish(&mut self, termination: Termination) -> Summary {
        self.transition(WatchState::Terminated);
        let summary = Summary {
            messages: self.messages,
            elapsed: self.started.elapsed(),
            termination,
        };
        info!("{summary}");
        summary
    }
}

/// Subscribe to pod resources changes and render every event until the
/// stream ends or `shutdown` completes.
///
/// Only the subscribe call is retried. Once streaming, a receive failure ends
/// the run like a normal end of stream. An event still queued when `shutdown`
/// fires may be dropped.
pub async fn watch<C, P, S>(
    client: &mut C,
    retry: RetryPolicy,
    presenter: &mut P,
    shutdown: S,
) -> Result<Summary>
where
    C: PodResourcesSource,
    P: Presenter,
    S: Future<Output = ()>,
{
    let mut consumer = Consumer::new();
    tokio::pin!(shutdown);

    let events = tokio::select! {
        subscribed = subscribe(client, retry) => subscribed?,
        () = &mut shutdown => {
            info!("interrupted before the watch was established");
            return Ok(consumer.finish(Termination::Interrupted));
        }
    };
    consumer.transition(WatchState::Streaming);

    let (mut queue, receiver) = spawn_receiver(events);

    let termination = loop {
        tokio::select! {
            () = &mut shutdown => break Termination::Interrupted,
            next = queue.recv() => match next {
                Some(event) => consumer.render(presenter, &event),
                None => break Termination::StreamEnded,
            },
        }
    };

    consumer.transition(WatchState::Draining);
    receiver.abort();
    Ok(consumer.finish(termination))
}

async fn subscribe<C: PodResourcesSource>(client: &mut C, retry: RetryPolicy) -> Result<C::Events> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match client.subscribe().await {
            Ok(events) => {
                debug!("watch established after {attempt} attempt(s)");
                return Ok(events);
            }
            Err(status) => retry
                .after_failure("watch", attempt, status)
                .await
                .map_err(Error::Subscribe)?,
        }
    }
}

/// Move the subscription into its own task. The returned queue yields the
/// events in order and closes after the last one, once the stream has ended
/// or failed.
fn spawn_receiver<E>(events: E) -> (mpsc::Receiver<WatchPodResourcesResponse>, JoinHandle<()>)
where
    E: Stream<Item = std::result::Result<WatchPodResourcesResponse, Status>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let handle = tokio::spawn(async move {
        let mut events = std::pin::pin!(events);
        loop {
            match events.next().await {
                Some(Ok(event)) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Some(Err(status)) => {
                    warn!("{}", Error::Receive(status));
                    break;
                }
                None => {
                    info!("watch stream closed by server");
                    break;
                }
            }
        }
    });
    (rx, handle)
}
