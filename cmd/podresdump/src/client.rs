// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use tokio_stream::Stream;
use tonic::Status;
use tonic::codec::Streaming;
use tonic::transport::Channel;

use crate::api::{
    AllocatableResourcesRequest, AllocatableResourcesResponse, ListPodResourcesRequest,
    ListPodResourcesResponse, PodResourcesListerClient, WatchPodResourcesRequest,
    WatchPodResourcesResponse,
};

/// The three calls of the pod resources API the readers depend on.
///
/// Implemented by the gRPC [`Session`](crate::connector::Session); tests plug
/// in scripted sources.
#[allow(async_fn_in_trait)]
pub trait PodResourcesSource {
    /// Live subscription handle returned by [`subscribe`](Self::subscribe).
    type Events: Stream<Item = Result<WatchPodResourcesResponse, Status>> + Send + 'static;

    async fn list_pods(&mut self) -> Result<ListPodResourcesResponse, Status>;

    async fn allocatable_resources(&mut self) -> Result<AllocatableResourcesResponse, Status>;

    async fn subscribe(&mut self) -> Result<Self::Events, Status>;
}

impl PodResourcesSource for PodResourcesListerClient<Channel> {
    type Events = Streaming<WatchPodResourcesResponse>;

    async fn list_pods(&mut self) -> Result<ListPodResourcesResponse, Status> {
        let response = self.list(ListPodResourcesRequest {}).await?;
        Ok(response.into_inner())
    }

    async fn allocatable_resources(&mut self) -> Result<AllocatableResourcesResponse, Status> {
        let response = self
            .get_allocatable_resources(AllocatableResourcesRequest {})
            .await?;
        Ok(response.into_inner())
    }

    async fn subscribe(&mut self) -> Result<Self::Events, Status> {
        let response = self.watch(WatchPodResourcesRequest {}).await?;
        Ok(response.into_inner())
    }
}
