//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use vibe_checker::config::AppConfig;
use vibe_checker::{HttpServer, Shutdown};

/// What the mock upstream sends back for one request.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Content-Length to announce; defaults to the body length.
    pub declared_length: Option<usize>,
}

impl MockResponse {
    pub fn image(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
            declared_length: None,
        }
    }

    pub fn untyped(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: None,
            body: body.into(),
            declared_length: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            body: body.as_bytes().to_vec(),
            declared_length: None,
        }
    }

    /// Announce `declared_length` bytes but send only `body`, then hang up.
    pub fn truncated(content_type: &str, body: impl Into<Vec<u8>>, declared_length: usize) -> Self {
        Self {
            declared_length: Some(declared_length),
            ..Self::image(content_type, body)
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

async fn write_response(socket: &mut TcpStream, response: MockResponse) {
    let declared = response.declared_length.unwrap_or(response.body.len());
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        reason(response.status),
        declared
    );
    if let Some(content_type) = &response.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    head.push_str("\r\n");

    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&response.body).await;
    let _ = socket.flush().await;

    if declared > response.body.len() {
        // Let the proxy commit its response before the upstream disappears.
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    let _ = socket.shutdown().await;
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the zero-based index of the request.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let response = f(n).await;
                        write_response(&mut socket, response).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock upstream that always sends the same response.
pub async fn start_mock_upstream(response: MockResponse) -> SocketAddr {
    start_programmable_upstream(move |_| {
        let response = response.clone();
        async move { response }
    })
    .await
}

/// An address nothing is listening on.
pub fn unreachable_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running server plus a client that talks to it directly.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("server unreachable")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default test configuration relaying from `upstream_url`.
pub fn test_config(upstream_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.url = upstream_url;
    config.upstream.system_proxy = false;
    config
}

/// Spawn the server on an ephemeral port, relaying from `upstream_url`.
pub async fn spawn_app(upstream_url: String) -> TestApp {
    spawn_app_with(test_config(upstream_url)).await
}

/// Spawn the server on an ephemeral port with `config`.
pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let server = HttpServer::new(&config).expect("server should build");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        shutdown,
    }
}
