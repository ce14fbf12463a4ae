//! OpenAI-compatible transport trait and reqwest-based SSE implementation.

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Response};

use crate::adapters::{LineBuffer, map_send_error};
use crate::{ProviderError, ProviderFuture, SecretString};

use super::serde_api::{SseFrame, build_api_request, extract_error_message, parse_sse_line};
use super::types::{OpenAiRequest, OpenAiStreamChunk};

pub type OpenAiChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<OpenAiStreamChunk, ProviderError>> + Send + 'a>>;

pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn stream<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: Option<SecretString>,
    ) -> ProviderFuture<'a, Result<OpenAiChunkStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("chat completion request failed with status {status}"));

        ProviderError::from_http_status(status.as_u16(), message)
    }
}

impl OpenAiTransport for OpenAiHttpTransport {
    fn stream<'a>(
        &'a self,
        mut request: OpenAiRequest,
        api_key: Option<SecretString>,
    ) -> ProviderFuture<'a, Result<OpenAiChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.stream = true;
            let api_request = build_api_request(request)?;
            let mut builder = self
                .client
                .post(self.endpoint("chat/completions"))
                .json(&api_request);
            if let Some(key) = api_key.as_ref().filter(|key| !key.is_empty()) {
                builder = builder.bearer_auth(key.expose());
            }

            let response = builder.send().await.map_err(map_send_error)?;
            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let bytes = response
                .bytes_stream()
                .map(|item| item.map_err(map_send_error));
            Ok(decode_sse_stream(bytes))
        })
    }
}

/// Turns a raw SSE byte stream into chunks, stopping at `[DONE]`.
///
/// An unterminated final `data:` line is still decoded.
pub(crate) fn decode_sse_stream<'a, S, B>(bytes: S) -> OpenAiChunkStream<'a>
where
    S: Stream<Item = Result<B, ProviderError>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
{
    let stream = try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut lines = LineBuffer::new();

        'frames: while let Some(item) = bytes.next().await {
            let chunk = item?;
            lines.push(chunk.as_ref());

            while let Some(line) = lines.next_line() {
                match parse_sse_line(&line?) {
                    Some(frame) => match frame? {
                        SseFrame::Chunk(chunk) => yield chunk,
                        SseFrame::Done => break 'frames,
                    },
                    None => continue,
                }
            }
        }

        if let Some(line) = lines.finish() {
            if let Some(SseFrame::Chunk(chunk)) = parse_sse_line(&line?).transpose()? {
                yield chunk;
            }
        }
    };

    Box::pin(stream)
}
