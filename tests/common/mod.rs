//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use trace_sandbox::config::ServiceConfig;
use trace_sandbox::lifecycle::Shutdown;
use trace_sandbox::HttpServer;

/// Start the demo service on an ephemeral port.
///
/// Returns the bound address and the shutdown coordinator that stops it.
pub async fn start_service() -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = shutdown.handle();
    let server = HttpServer::new(ServiceConfig::default());
    tokio::spawn(async move {
        let _ = server.run(listener, handle).await;
    });

    (addr, shutdown)
}

/// Start a mock upstream that returns a fixed 200 body with the given
/// content type.
pub async fn start_mock_upstream(body: &'static str, content_type: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
