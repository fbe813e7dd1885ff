// src/testing.rs
//! Loopback fakes for miners and collectors used by the unit tests.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::net::SocketAddr;
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Request seen by a fake HTTP server
pub(crate) struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Serves exactly one HTTP exchange and hands back what the client sent.
pub(crate) async fn serve_http_once(
    status: &str,
    body: &str,
) -> (SocketAddr, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            head,
            body: String::from_utf8_lossy(&buf[head_end..]).to_string(),
        }
    });

    (addr, handle)
}

/// Serves one newline-framed exchange: reads a request line, writes `response`
/// verbatim and closes. Returns the request line without its terminator.
pub(crate) async fn serve_line_once(response: &str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = response.to_string();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(socket);
        let mut request = String::new();
        reader.read_line(&mut request).await.unwrap();

        let mut socket = reader.into_inner();
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        request.trim_end().to_string()
    });

    (addr, handle)
}

/// An address nothing is listening on.
pub(crate) async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Records every log line together with the thread that emitted it.
struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

/// Runs `f` and returns what it logged on the calling thread.
///
/// Tests run in parallel on their own threads, so records are keyed by
/// thread id to keep them apart.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });

    let me = thread::current().id();
    let out = f();

    let mut records = LOGGER.records.lock().unwrap();
    let mut mine = Vec::new();
    records.retain(|(id, level, msg)| {
        if *id == me {
            mine.push((*level, msg.clone()));
            false
        } else {
            true
        }
    });
    (out, mine)
}
