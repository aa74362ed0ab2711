//! HTTP client for LibreTranslate-compatible translation servers

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::TranslateError;

/// Language entry reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerLanguage {
    pub code: String,
    pub name: String,
    /// Codes this language can be translated into; empty when unreported
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl TranslationClient {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// Languages the server can translate between
    pub async fn languages(&self) -> Result<Vec<ServerLanguage>, TranslateError> {
        let response = self.http.get(self.url("languages")).send().await?;
        let response = check_status(response).await?;
        let languages: Vec<ServerLanguage> = response.json().await?;
        debug!("Server reports {} languages", languages.len());
        Ok(languages)
    }

    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response = self.http.post(self.url("translate")).json(&request).send().await?;
        let response = check_status(response).await?;
        let body: TranslateResponse = response.json().await?;
        Ok(body.translated_text)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TranslateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => Err(TranslateError::RateLimitExceeded),
        401 | 403 => Err(TranslateError::AuthenticationError),
        _ => {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("server returned {}", status),
            };
            Err(TranslateError::ApiError(message))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP responder for client tests

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve `count` requests with the given status and body; the handle yields the raw requests
    pub async fn serve(status: u16, body: &'static str, count: usize) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for _ in 0..count {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        (endpoint, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }
}
