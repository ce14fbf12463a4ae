//! Ollama transport trait and reqwest-based NDJSON implementation.

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::adapters::{LineBuffer, map_send_error};
use crate::{ProviderError, ProviderFuture};

use super::serde_api::{OllamaChatRequest, OllamaChunk};

pub type OllamaChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<OllamaChunk, ProviderError>> + Send + 'a>>;

pub trait OllamaTransport: Send + Sync + std::fmt::Debug {
    fn stream<'a>(
        &'a self,
        request: OllamaChatRequest,
    ) -> ProviderFuture<'a, Result<OllamaChunkStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OllamaHttpTransport {
    client: Client,
    endpoint: String,
}

impl OllamaHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: super::OLLAMA_DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<OllamaErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or_else(|_| format!("ollama chat request failed with status {status}"));

        ProviderError::from_http_status(status.as_u16(), message)
    }
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

impl OllamaTransport for OllamaHttpTransport {
    fn stream<'a>(
        &'a self,
        mut request: OllamaChatRequest,
    ) -> ProviderFuture<'a, Result<OllamaChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.stream = true;
            let response = self
                .client
                .post(self.chat_url())
                .json(&request)
                .send()
                .await
                .map_err(map_send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let stream = try_stream! {
                let mut bytes = response.bytes_stream();
                let mut lines = LineBuffer::new();

                'lines: while let Some(item) = bytes.next().await {
                    let chunk = item.map_err(map_send_error)?;
                    lines.push(&chunk);

                    while let Some(line) = lines.next_line() {
                        let line = line?;
                        if line.trim().is_empty() {
                            continue;
                        }

                        let chunk = OllamaChunk::parse(&line)?;
                        if let Some(error) = chunk.error.clone() {
                            Err::<(), _>(ProviderError::unavailable(error))?;
                        }

                        let done = chunk.done;
                        yield chunk;
                        if done {
                            break 'lines;
                        }
                    }
                }

                if let Some(line) = lines.finish() {
                    yield OllamaChunk::parse(&line?)?;
                }
            };

            Ok(Box::pin(stream) as OllamaChunkStream<'a>)
        })
    }
}
