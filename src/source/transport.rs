//! Transports that open a byte stream to the telemetry agent.
//!
//! A [`Connector`] knows how to open one connection; the reconnect policy lives
//! in [`FeedConnection`](super::FeedConnection), which calls `connect` again
//! after every close.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use super::frame::Framing;
use crate::error::Error;

/// Chunks of bytes read from an open connection.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, Error>>;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_BUFFER: usize = 4096;

/// Opens connections to the feed.
#[async_trait]
pub trait Connector: Send + Sync + Debug {
    /// Open a new connection and return its byte stream.
    async fn connect(&self) -> Result<ByteStream, Error>;

    /// Framing used on this transport.
    fn framing(&self) -> Framing;

    /// Address shown in logs and the status bar.
    fn address(&self) -> &str;
}

/// Pick a transport from the address scheme.
///
/// `http://` and `https://` use Server-Sent Events, `tcp://host:port` uses
/// newline-delimited JSON over a raw socket.
pub fn connector_for(address: &str) -> Result<Arc<dyn Connector>, Error> {
    if address.starts_with("http://") || address.starts_with("https://") {
        Ok(Arc::new(SseConnector::new(address)?))
    } else if let Some(addr) = address.strip_prefix("tcp://") {
        Ok(Arc::new(TcpConnector::new(addr)))
    } else {
        Err(Error::Unsupported(address.to_string()))
    }
}

/// Server-Sent Events over HTTP.
#[derive(Debug, Clone)]
pub struct SseConnector {
    client: reqwest::Client,
    url: String,
}

impl SseConnector {
    pub fn new(url: &str) -> Result<Self, Error> {
        // No overall timeout: the response body is the long-lived stream.
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Connector for SseConnector {
    async fn connect(&self) -> Result<ByteStream, Error> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "feed returned status {}",
                response.status()
            )));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(Error::from))
            .boxed())
    }

    fn framing(&self) -> Framing {
        Framing::Sse
    }

    fn address(&self) -> &str {
        &self.url
    }
}

/// Newline-delimited JSON over a plain TCP socket.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
}

impl TcpConnector {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self) -> Result<ByteStream, Error> {
        let socket = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| Error::Connection(format!("timed out connecting to {}", self.addr)))?
            .map_err(|e| Error::Connection(format!("{}: {}", self.addr, e)))?;

        let chunks = stream::unfold(Some(socket), |socket| async move {
            let Some(mut socket) = socket else {
                return None;
            };
            let mut buf = vec![0u8; READ_BUFFER];
            match socket.read(&mut buf).await {
                // EOF ends the stream
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), Some(socket)))
                }
                Err(e) => Some((Err(Error::from(e)), None)),
            }
        });

        Ok(chunks.boxed())
    }

    fn framing(&self) -> Framing {
        Framing::Lines
    }

    fn address(&self) -> &str {
        &self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Answer one HTTP request with `status` and `body`, handing back the
    /// request head that was received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let _ = request_tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        (format!("http://{}/sse", addr), request_rx)
    }

    #[test]
    fn test_connector_for_schemes() {
        let sse = connector_for("http://127.0.0.1:8080/sse").unwrap();
        assert_eq!(sse.framing(), Framing::Sse);
        assert_eq!(sse.address(), "http://127.0.0.1:8080/sse");

        let tcp = connector_for("tcp://127.0.0.1:9090").unwrap();
        assert_eq!(tcp.framing(), Framing::Lines);
        assert_eq!(tcp.address(), "127.0.0.1:9090");

        assert!(matches!(
            connector_for("ws://127.0.0.1:8080"),
            Err(Error::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_sse_connector_streams_body() {
        let body = "event: update\ndata: {\"cpu_usage\":45}\n\n";
        let (url, request) = serve_once("200 OK", body).await;

        let connector = SseConnector::new(&url).unwrap();
        let mut chunks = connector.connect().await.unwrap();

        let mut received = Vec::new();
        while let Some(chunk) = chunks.next().await {
            received.extend(chunk.unwrap());
        }
        assert_eq!(received, body.as_bytes());

        let request = request.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /sse "));
        assert!(request.contains("accept: text/event-stream"));
    }

    #[tokio::test]
    async fn test_sse_connector_error_status() {
        let (url, _request) = serve_once("500 Internal Server Error", "").await;
        let connector = SseConnector::new(&url).unwrap();
        assert!(matches!(connector.connect().await, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn test_tcp_connector_reads_until_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"{\"cpu_usage\":45}\n").await.unwrap();
        });

        let connector = TcpConnector::new(&addr.to_string());
        let mut chunks = connector.connect().await.unwrap();

        let mut received = Vec::new();
        while let Some(chunk) = chunks.next().await {
            received.extend(chunk.unwrap());
        }
        assert_eq!(received, b"{\"cpu_usage\":45}\n");
    }

    #[tokio::test]
    async fn test_tcp_connector_refused() {
        // Bind then drop to get a port with nothing listening.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let connector = TcpConnector::new(&addr.to_string());
        assert!(matches!(
            connector.connect().await,
            Err(Error::Connection(_))
        ));
    }
}
