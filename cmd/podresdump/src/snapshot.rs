// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! One-shot queries: the pod listing and the allocatable resources.

use log::{debug, warn};

use crate::client::PodResourcesSource;
use crate::errors::{Error, Result};
use crate::presenter::Presenter;
use crate::retry::RetryPolicy;

/// Fetch the current pod resources and render the pods of `namespace`.
/// Returns how many pods were rendered.
pub async fn list<C, P>(
    client: &mut C,
    retry: RetryPolicy,
    presenter: &mut P,
    namespace: &str,
) -> Result<usize>
where
    C: PodResourcesSource,
    P: Presenter,
{
    let mut attempt = 0;
    let response = loop {
        attempt += 1;
        match client.list_pods().await {
            Ok(response) => break response,
            Err(status) => retry
                .after_failure("list", attempt, status)
                .await
                .map_err(|status| Error::Request {
                    call: "list",
                    status,
                })?,
        }
    };

    debug!(
        "list returned {} pod(s) after {attempt} attempt(s)",
        response.pod_resources.len()
    );
    Ok(presenter.render_snapshot(&response.pod_resources, namespace))
}

/// Fetch and render the devices, CPUs and memory the node can allocate.
pub async fn allocatable<C, P>(client: &mut C, retry: RetryPolicy, presenter: &mut P) -> Result<()>
where
    C: PodResourcesSource,
    P: Presenter,
{
    let mut attempt = 0;
    let response = loop {
        attempt += 1;
        match client.allocatable_resources().await {
            Ok(response) => break response,
            Err(status) => retry
                .after_failure("get allocatable resources", attempt, status)
                .await
                .map_err(|status| Error::Request {
                    call: "get allocatable resources",
                    status,
                })?,
        }
    };

    if let Err(e) = presenter.render_allocatable(&response) {
        warn!("skipping allocatable resources: {e}");
    }
    Ok(())
}
