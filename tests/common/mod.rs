#![allow(dead_code)]

//! Scripted in-process MOSS server and in-memory transport for tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use moss::config::{ClientConfig, ServerConfig, TimeoutConfig};
use moss::{MossError, Transport};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream,
};

pub const RESULT_URL: &str = "http://moss.stanford.edu/results/5/123456789";

/// One `file` record as received by the server.
#[derive(Debug, Clone)]
pub struct Record {
    pub header: String,
    pub body: Vec<u8>,
}

/// Everything the server saw from the client.
#[derive(Debug, Default)]
pub struct Transcript {
    pub preamble: Vec<String>,
    pub files: Vec<Record>,
    pub query: Option<String>,
    /// Bytes received after the query (or after the handshake reply when
    /// the submission was declined)
    pub trailer: Vec<u8>,
}

impl Transcript {
    pub fn headers(&self) -> Vec<&str> {
        self.files.iter().map(|r| r.header.as_str()).collect()
    }
}

/// What the mock server sends back.
#[derive(Debug, Clone)]
pub struct Script {
    /// Chunks written after the preamble has been read
    pub greeting: Vec<&'static str>,
    /// Whether the greeting accepts the submission
    pub accepted: bool,
    /// Chunks written after the query; empty closes the connection instead
    pub result: Vec<&'static str>,
}

impl Script {
    pub fn accept() -> Self {
        Self {
            greeting: vec!["yes\n"],
            accepted: true,
            result: vec!["http://moss.stanford.edu/results/5/123456789\n"],
        }
    }

    pub fn reject() -> Self {
        Self {
            greeting: vec!["no\n"],
            accepted: false,
            result: Vec::new(),
        }
    }
}

async fn read_line<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).await.expect("read line");
    line.trim_end_matches('\n').to_string()
}

async fn write_chunks<W: AsyncWrite + Unpin>(writer: &mut W, chunks: &[&str]) {
    for chunk in chunks {
        writer.write_all(chunk.as_bytes()).await.expect("write");
        writer.flush().await.expect("flush");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Play `script` against one client connection.
pub async fn serve<S>(stream: S, script: Script) -> Transcript
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut transcript = Transcript::default();

    for _ in 0..6 {
        transcript.preamble.push(read_line(&mut reader).await);
    }
    write_chunks(&mut writer, &script.greeting).await;

    if script.accepted {
        loop {
            let line = read_line(&mut reader).await;
            if line.starts_with("file ") {
                let len: usize = line
                    .split(' ')
                    .nth(3)
                    .and_then(|n| n.parse().ok())
                    .expect("file header length");
                let mut body = vec![0u8; len];
                reader.read_exact(&mut body).await.expect("file body");
                transcript.files.push(Record { header: line, body });
            } else if line.starts_with("query ") {
                transcript.query = Some(line);
                break;
            } else {
                panic!("unexpected line from client: {line:?}");
            }
        }

        if script.result.is_empty() {
            return transcript;
        }
        write_chunks(&mut writer, &script.result).await;
    }

    reader
        .read_to_end(&mut transcript.trailer)
        .await
        .expect("read trailer");
    transcript
}

/// Client config pointing at a local mock server.
pub fn local_config(port: u16) -> ClientConfig {
    ClientConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..Default::default()
        },
        timeouts: TimeoutConfig {
            connect_secs: 5,
            response_secs: 10,
        },
        user_id: None,
    }
}

/// Transport handing out one end of an in-memory pipe, counting connects.
pub struct DuplexTransport {
    client: Mutex<Option<DuplexStream>>,
    connects: AtomicUsize,
}

impl DuplexTransport {
    /// Transport plus the server end of the pipe.
    pub fn pair() -> (Self, DuplexStream) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let transport = Self {
            client: Mutex::new(Some(client)),
            connects: AtomicUsize::new(0),
        };
        (transport, server)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Transport for DuplexTransport {
    type Stream = DuplexStream;

    fn connect(&self) -> Pin<Box<dyn Future<Output = moss::Result<DuplexStream>> + Send + '_>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let stream = self.client.lock().unwrap().take();
        Box::pin(async move {
            stream.ok_or_else(|| MossError::Network("pipe already used".to_string()))
        })
    }

    fn name(&self) -> &'static str {
        "duplex"
    }

    fn remote_addr(&self) -> String {
        "memory".to_string()
    }
}
