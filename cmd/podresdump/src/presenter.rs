// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Text rendering of pod resources records.

use std::io::Write;

use log::{info, warn};

use crate::api::{AllocatableResourcesResponse, PodResources};
use crate::errors::Result;

/// Sink for the records read from the service.
///
/// Implementations must not block for long; a failed render is reported
/// through the returned error and the caller skips that record.
pub trait Presenter {
    /// Render one pod of a snapshot.
    fn render_pod(&mut self, pod: &PodResources) -> Result<()>;

    /// Render the resources the node can allocate.
    fn render_allocatable(&mut self, resources: &AllocatableResourcesResponse) -> Result<()>;

    /// Render one change notification, `tag` being `ADD`, `MOD`, `DEL` or `???`.
    fn render_event(&mut self, tag: &str, pods: &[PodResources]) -> Result<()>;

    /// Render the pods of `namespace` in order, skipping every other pod.
    /// Returns how many pods were rendered.
    fn render_snapshot(&mut self, pods: &[PodResources], namespace: &str) -> usize {
        let mut rendered = 0;
        for pod in pods {
            if pod.namespace != namespace {
                info!("SKIP pod {:?}", pod.name);
                continue;
            }
            match self.render_pod(pod) {
                Ok(()) => rendered += 1,
                Err(e) => warn!("skipping pod {:?}: {e}", pod.name),
            }
        }
        rendered
    }
}

/// Line oriented presenter: one record per line, payloads as JSON.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render_pod(&mut self, pod: &PodResources) -> Result<()> {
        if pod.containers.is_empty() {
            writeln!(self.out, "{}/{} []", pod.namespace, pod.name)?;
            return Ok(());
        }
        // Serialize everything first so a failure leaves no partial pod behind.
        let lines = pod
            .containers
            .iter()
            .map(|c| {
                serde_json::to_string(c)
                    .map(|json| format!("{}/{}/{} {json}", pod.namespace, pod.name, c.name))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn render_allocatable(&mut self, resources: &AllocatableResourcesResponse) -> Result<()> {
        for device in &resources.devices {
            let json = serde_json::to_string(device)?;
            writeln!(self.out, "device {} {json}", device.resource_name)?;
        }
        let cpus = resources
            .cpu_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.out, "cpus {cpus}")?;
        for block in &resources.memory {
            writeln!(self.out, "memory {} {}", block.memory_type, block.size)?;
        }
        Ok(())
    }

    fn render_event(&mut self, tag: &str, pods: &[PodResources]) -> Result<()> {
        let json = serde_json::to_string(pods)?;
        writeln!(self.out, "{tag} {json}")?;
        self.out.flush()?;
        Ok(())
    }
}
