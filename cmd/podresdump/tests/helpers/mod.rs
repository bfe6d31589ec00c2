// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use podresdump::api::pod_resources_lister_server::{
    PodResourcesLister, PodResourcesListerServer,
};
use podresdump::api::{
    AllocatableResourcesRequest, AllocatableResourcesResponse, ContainerResources,
    ListPodResourcesRequest, ListPodResourcesResponse, PodResources, WatchPodResourcesRequest,
    WatchPodResourcesResponse,
};
use tokio::net::UnixListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::UnixListenerStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the fake kubelet answers.
#[derive(Default, Clone)]
pub struct Script {
    pub pods: Vec<PodResources>,
    pub allocatable: AllocatableResourcesResponse,
    pub events: Vec<WatchPodResourcesResponse>,
    /// Keep the watch stream open after the last event.
    pub hold_open: bool,
    /// Refuse this many watch calls before accepting one.
    pub watch_failures: u32,
}

struct FakeLister {
    script: Script,
    watch_calls: Arc<AtomicU32>,
}

type WatchStream = Pin<Box<dyn Stream<Item = Result<WatchPodResourcesResponse, Status>> + Send>>;

#[tonic::async_trait]
impl PodResourcesLister for FakeLister {
    async fn list(
        &self,
        _request: Request<ListPodResourcesRequest>,
    ) -> Result<Response<ListPodResourcesResponse>, Status> {
        Ok(Response::new(ListPodResourcesResponse {
            pod_resources: self.script.pods.clone(),
        }))
    }

    async fn get_allocatable_resources(
        &self,
        _request: Request<AllocatableResourcesRequest>,
    ) -> Result<Response<AllocatableResourcesResponse>, Status> {
        Ok(Response::new(self.script.allocatable.clone()))
    }

    type WatchStream = WatchStream;

    async fn watch(
        &self,
        _request: Request<WatchPodResourcesRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let call = self.watch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.script.watch_failures {
            return Err(Status::unavailable("pod resources not ready"));
        }
        let events = tokio_stream::iter(self.script.events.clone().into_iter().map(Ok));
        let stream: WatchStream = if self.script.hold_open {
            Box::pin(events.chain(tokio_stream::pending()))
        } else {
            Box::pin(events)
        };
        Ok(Response::new(stream))
    }
}

/// In-process pod resources server listening on `<dir>/kubelet.sock`.
pub struct FakeKubelet {
    socket: PathBuf,
    watch_calls: Arc<AtomicU32>,
    stop: Option<oneshot::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl FakeKubelet {
    pub fn start(dir: &Path, script: Script) -> Self {
        let socket = dir.join("kubelet.sock");
        let watch_calls = Arc::new(AtomicU32::new(0));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let lister = FakeLister {
            script,
            watch_calls: Arc::clone(&watch_calls),
        };
        let path = socket.clone();
        let thread = std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            rt.block_on(async move {
                let listener = UnixListener::bind(&path).expect("failed to bind kubelet.sock");
                ready_tx.send(()).expect("test dropped before server start");
                tonic::transport::Server::builder()
                    .add_service(PodResourcesListerServer::new(lister))
                    .serve_with_incoming_shutdown(UnixListenerStream::new(listener), async {
                        let _ = stop_rx.await;
                    })
                    .await
                    .expect("fake kubelet failed");
            });
        });
        ready_rx
            .recv_timeout(DEFAULT_TIMEOUT)
            .expect("fake kubelet did not start");

        Self {
            socket,
            watch_calls,
            stop: Some(stop_tx),
            thread: Some(thread),
        }
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    pub fn watch_calls(&self) -> u32 {
        self.watch_calls.load(Ordering::SeqCst)
    }
}

impl Drop for FakeKubelet {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Handle to a running podresdump process.
pub struct ClientHandle {
    child: Child,
    stdout_lines: Arc<Mutex<Vec<String>>>,
    stderr_lines: Arc<Mutex<Vec<String>>>,
    _stdout_thread: std::thread::JoinHandle<()>,
    _stderr_thread: std::thread::JoinHandle<()>,
}

fn collect_lines<R: std::io::Read + Send + 'static>(
    source: R,
    prefix: &'static str,
    sink: Arc<Mutex<Vec<String>>>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            match line {
                Ok(l) => {
                    eprintln!("[{prefix}] {l}");
                    sink.lock().unwrap().push(l);
                }
                Err(_) => break,
            }
        }
    })
}

impl ClientHandle {
    pub fn start(args: &[&str]) -> Self {
        let bin = env!("CARGO_BIN_EXE_podresdump");
        let mut child = Command::new(bin)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start podresdump");

        let stdout = child.stdout.take().expect("failed to capture stdout");
        let stderr = child.stderr.take().expect("failed to capture stderr");
        let stdout_lines = Arc::new(Mutex::new(Vec::new()));
        let stderr_lines = Arc::new(Mutex::new(Vec::new()));

        // simple_logger writes every record to stderr, stdout only carries records.
        let stdout_thread = collect_lines(stdout, "out", Arc::clone(&stdout_lines));
        let stderr_thread = collect_lines(stderr, "log", Arc::clone(&stderr_lines));

        Self {
            child,
            stdout_lines,
            stderr_lines,
            _stdout_thread: stdout_thread,
            _stderr_thread: stderr_thread,
        }
    }

    pub fn stdout(&self) -> Vec<String> {
        self.stdout_lines.lock().unwrap().clone()
    }

    pub fn stderr(&self) -> Vec<String> {
        self.stderr_lines.lock().unwrap().clone()
    }

    /// Wait until `n` lines were printed on stdout, or timeout.
    pub fn wait_for_output(&self, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.stdout_lines.lock().unwrap().len() >= n {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    /// Wait until a log line containing `pattern` appears, or timeout.
    pub fn wait_for_log(&self, pattern: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let lines = self.stderr_lines.lock().unwrap();
                if lines.iter().any(|l| l.contains(pattern)) {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    pub fn send_signal(&self, sig: Signal) {
        let pid = self.child.id() as i32;
        signal::kill(Pid::from_raw(pid), sig).expect("failed to send signal to podresdump");
    }

    /// Wait for the process to exit within `timeout`, killing it otherwise.
    pub fn wait_with_timeout(&mut self, timeout: Duration) -> ExitStatus {
        let deadline = Instant::now() + timeout;
        loop {
            match self
                .child
                .try_wait()
                .expect("failed to check podresdump status")
            {
                Some(status) => {
                    // Let the reader threads drain the pipes.
                    std::thread::sleep(Duration::from_millis(100));
                    return status;
                }
                None => {
                    if Instant::now() >= deadline {
                        self.child.kill().ok();
                        return self.child.wait().expect("failed to wait on killed podresdump");
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn pod(namespace: &str, name: &str, containers: &[&str]) -> PodResources {
    PodResources {
        name: name.to_string(),
        namespace: namespace.to_string(),
        containers: containers
            .iter()
            .map(|c| ContainerResources {
                name: c.to_string(),
                cpu_ids: vec![1],
                ..Default::default()
            })
            .collect(),
    }
}

pub fn event(action: i32, pods: Vec<PodResources>) -> WatchPodResourcesResponse {
    WatchPodResourcesResponse {
        action,
        pod_resources: pods,
    }
}
