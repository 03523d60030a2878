//! End-to-end tests over real loopback sockets

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use quill::handlers::FileStore;
use quill::router::Router;
use quill::server::listener::serve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn start(workers: usize) -> (tempfile::TempDir, SocketAddr) {
    let dir = tempfile::tempdir().unwrap();
    let router = Arc::new(Router::new(FileStore::open(dir.path()).await.unwrap()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(listener, router, workers));
    (dir, addr)
}

async fn exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut buf = Vec::new();
    timeout(WAIT, stream.read_to_end(&mut buf)).await.unwrap().unwrap();
    buf
}

fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    (
        String::from_utf8(raw[..end].to_vec()).unwrap(),
        raw[end + 4..].to_vec(),
    )
}

#[tokio::test]
async fn test_unknown_route_is_literal_404() {
    let (_dir, addr) = start(4).await;

    let raw = exchange(addr, b"GET /banana HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    assert_eq!(raw, b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_echo_gzip_matches_plain() {
    let (_dir, addr) = start(4).await;
    let message = "grüße-from-the-echo";
    let path = format!("/echo/{message}");

    let plain = exchange(
        addr,
        format!("GET {path} HTTP/1.1\r\nConnection: close\r\n\r\n").as_bytes(),
    )
    .await;
    let (_, plain_body) = split_response(&plain);
    assert_eq!(plain_body, message.as_bytes());

    let encoded = exchange(
        addr,
        format!("GET {path} HTTP/1.1\r\nAccept-Encoding: gzip\r\nConnection: close\r\n\r\n").as_bytes(),
    )
    .await;
    let (head, gz_body) = split_response(&encoded);
    assert!(head.contains("Content-Encoding: gzip"));
    assert!(head.contains(&format!("Content-Length: {}", gz_body.len())));

    let mut decoded = Vec::new();
    GzDecoder::new(&gz_body[..]).read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, plain_body);
}

#[tokio::test]
async fn test_upload_and_download() {
    let (_dir, addr) = start(4).await;
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let mut upload = format!(
        "POST /files/blob.bin HTTP/1.1\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len()
    )
    .into_bytes();
    upload.extend_from_slice(&payload);

    let created = exchange(addr, &upload).await;
    assert_eq!(created, b"HTTP/1.1 201 Created\r\nConnection: close\r\n\r\n".to_vec());

    let fetched = exchange(addr, b"GET /files/blob.bin HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    let (head, body) = split_response(&fetched);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Type: application/octet-stream"));
    assert!(head.contains("Content-Length: 10000"));
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_traversal_is_404() {
    let (_dir, addr) = start(4).await;

    let raw = exchange(
        addr,
        b"GET /files/../../../../../../etc/passwd HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert_eq!(raw, b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_concurrent_connections_are_independent() {
    let (_dir, addr) = start(8).await;

    // An idle connection must not block others
    let _idle = TcpStream::connect(addr).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..5 {
        tasks.push(tokio::spawn(async move {
            let req = format!("GET /echo/{i} HTTP/1.1\r\nConnection: close\r\n\r\n");
            exchange(addr, req.as_bytes()).await
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let raw = task.await.unwrap();
        let (_, body) = split_response(&raw);
        assert_eq!(body, i.to_string().into_bytes());
    }
}

#[tokio::test]
async fn test_worker_limit_applies_backpressure() {
    let (_dir, addr) = start(1).await;

    let first = TcpStream::connect(addr).await.unwrap();
    // Give the listener time to hand the only permit to `first`
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut second = TcpStream::connect(addr).await.unwrap();
    second
        .write_all(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut byte = [0u8; 1];
    let early = timeout(Duration::from_millis(300), second.read(&mut byte)).await;
    assert!(early.is_err(), "second connection was served while the pool was full");

    drop(first);

    let mut rest = Vec::new();
    timeout(WAIT, second.read_to_end(&mut rest)).await.unwrap().unwrap();
    assert_eq!(rest, b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_vec());
}
