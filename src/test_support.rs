//! Fakes for the network-facing traits, shared by unit tests.

use crate::api::{ApiError, ChatClient, ChatMessage, ChatRequest, ChatResponse, Choice, Usage};
use crate::fetch::{FetchError, Page, PageFetcher};
use std::cell::RefCell;
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves canned pages by URL. Unknown URLs fail as unreachable.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<Page, FetchError>>,
    requested: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(Page {
                status: 200,
                text: html.to_string(),
            }),
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
        );
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("connection refused: {url}"))))
    }
}

/// Chat client that answers every request with the same completion.
#[derive(Debug, Default)]
pub struct FakeChat {
    reply: Option<(String, u64)>,
    requests: RefCell<Vec<ChatRequest>>,
}

impl FakeChat {
    pub fn replying(text: &str, total_tokens: u64) -> Self {
        Self {
            reply: Some((text.to_string(), total_tokens)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// A client whose every request fails with HTTP 401.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.borrow().clone()
    }
}

impl ChatClient for FakeChat {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        let Some((text, total_tokens)) = &self.reply else {
            return Err(ApiError::Status {
                status: 401,
                body: "invalid api key".to_string(),
            });
        };
        Ok(ChatResponse {
            choices: vec![Choice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: text.clone(),
                },
            }],
            usage: Some(Usage {
                prompt_tokens: total_tokens / 2,
                completion_tokens: total_tokens - total_tokens / 2,
                total_tokens: *total_tokens,
            }),
        })
    }
}

/// Raw HTTP/1.1 response with a `Content-Length` header and a closed connection.
pub fn http_response(status_line: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

/// Answer exactly one request on a local port with `response`.
///
/// Returns the `http://127.0.0.1:<port>` base URL. The request, body
/// included, is read in full before the response is written.
pub async fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

/// URL of a local port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
