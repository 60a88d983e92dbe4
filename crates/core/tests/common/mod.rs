//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{http::StatusCode, routing::get, Router};
use tempfile::TempDir;

use transcodegate_core::WorkspaceConfig;

/// Bytes served as the remote source file. Contains no NUL runs so it can
/// never be mistaken for the metadata delimiter.
pub fn sample_audio() -> Vec<u8> {
    let mut bytes = b"ID3\x04".to_vec();
    bytes.extend((0..50_000u32).map(|i| (i % 200) as u8 + 1));
    bytes
}

/// Starts an in-process file host and returns its address.
///
/// Routes:
/// - `/audio.mp3` serves `body`
/// - `/missing.mp3` answers 404
/// - `/unavailable.mp3` answers 503
pub async fn spawn_file_server(body: Vec<u8>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/audio.mp3",
            get(move || {
                let body = body.clone();
                async move { body }
            }),
        )
        .route("/missing.mp3", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/unavailable.mp3",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind file server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Starts a raw HTTP host that promises `Content-Length: 100000` on every
/// request but closes the connection after a handful of body bytes.
pub async fn spawn_truncating_server() -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind truncating server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Read the request head before answering.
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Content-Type: audio/mpeg\r\n\
                          Content-Length: 100000\r\n\r\n\
                          ID3truncated",
                    )
                    .await;
                let _ = socket.flush().await;
            });
        }
    });
    addr
}

/// Builds a query parameter map.
pub fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Workspace config rooted in a fresh temp directory.
pub fn workspace_root() -> (TempDir, WorkspaceConfig) {
    let root = TempDir::new().expect("Failed to create workspace root");
    let config = WorkspaceConfig {
        root: root.path().to_path_buf(),
        prefix: "lambda-".to_string(),
    };
    (root, config)
}

/// Number of entries left under a workspace root.
pub fn leftover_entries(root: &Path) -> usize {
    std::fs::read_dir(root).map(|d| d.count()).unwrap_or(0)
}

/// Writes an executable shell script standing in for ffmpeg.
///
/// Positional args follow the fixed template: `$3` is the input, `$7` the
/// bitrate and `$8` the output.
#[cfg(unix)]
pub fn fake_engine(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
