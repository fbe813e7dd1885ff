// src/miner/connection.rs
//! Newline-framed request/response exchange with a miner's TCP API
//!
//! Both TCP protocols are one request per connection: connect, write a JSON
//! line, read a JSON line, close. There is no other framing.

use crate::utils::error::MonitorError;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Runs `fut`, bounded by `limit` when one is configured.
///
/// Without a limit the call waits as long as the peer does.
pub async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T, MonitorError>
where
    F: Future<Output = Result<T, MonitorError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| MonitorError::Timeout(limit.as_secs()))?,
        None => fut.await,
    }
}

/// Sends one request line and reads one response line
///
/// # Arguments
/// * `addr` - Miner API address (`host:port`)
/// * `request` - JSON request, without the trailing newline
/// * `timeout` - Optional limit applied to connect and to the exchange
///
/// # Returns
/// The response line without its terminator
///
/// # Errors
/// - `ConnectionError` if the miner cannot be reached
/// - `ReadError` if the exchange fails or the reply is not a complete line
pub async fn exchange_line(
    addr: &str,
    request: &str,
    timeout: Option<Duration>,
) -> Result<String, MonitorError> {
    let stream = with_timeout(timeout, async {
        TcpStream::connect(addr)
            .await
            .map_err(|e| MonitorError::ConnectionError(format!("{}: {}", addr, e)))
    })
    .await?;

    log::debug!("send {}", request);
    let line = with_timeout(timeout, request_line(stream, request)).await?;
    log::debug!("recv {}", line);
    Ok(line)
}

async fn request_line(stream: TcpStream, request: &str) -> Result<String, MonitorError> {
    let mut reader = BufReader::new(stream);

    let mut message = String::with_capacity(request.len() + 1);
    message.push_str(request);
    message.push('\n');
    reader
        .get_mut()
        .write_all(message.as_bytes())
        .await
        .map_err(|e| MonitorError::ReadError(format!("write failed: {}", e)))?;

    let mut line = String::new();
    reader
        .read_line(&mut line)
        .await
        .map_err(|e| MonitorError::ReadError(e.to_string()))?;

    // Only a newline-terminated reply counts; EOF mid-line is a failed read
    match line.strip_suffix('\n') {
        Some(body) => Ok(body.trim_end_matches('\r').to_string()),
        None if line.is_empty() => Err(MonitorError::ReadError(
            "connection closed without a response".into(),
        )),
        None => Err(MonitorError::ReadError(format!(
            "truncated response: {}",
            line
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{closed_port, serve_line_once};

    #[tokio::test]
    async fn exchanges_one_line() {
        let (addr, request) = serve_line_once("{\"ok\":true}\r\n").await;
        let reply = exchange_line(&addr.to_string(), r#"{"id":1}"#, None)
            .await
            .unwrap();
        assert_eq!(reply, r#"{"ok":true}"#);
        assert_eq!(request.await.unwrap(), r#"{"id":1}"#);
    }

    #[tokio::test]
    async fn refused_connection() {
        let addr = closed_port().await;
        let err = exchange_line(&addr.to_string(), "{}", None)
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::ConnectionError(_)));
        assert_eq!(err.sentinel(), "err");
    }

    #[tokio::test]
    async fn closed_without_reply() {
        let (addr, _) = serve_line_once("").await;
        let err = exchange_line(&addr.to_string(), "{}", None)
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::ReadError(_)));
    }

    #[tokio::test]
    async fn truncated_reply() {
        let (addr, _) = serve_line_once("{\"partial\":").await;
        let err = exchange_line(&addr.to_string(), "{}", None)
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::ReadError(_)));
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let err = exchange_line(&addr.to_string(), "{}", Some(Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Timeout(_)));
    }
}
