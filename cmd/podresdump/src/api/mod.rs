// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Bindings for the kubelet pod resources API, generated from `proto/api.proto`.

#[rustfmt::skip]
#[allow(clippy::all, clippy::pedantic)]
pub mod v1;

pub use v1::pod_resources_lister_client::PodResourcesListerClient;
pub use v1::*;
