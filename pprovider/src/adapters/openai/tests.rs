//! Focused unit tests for OpenAI-compatible adapter internals.

#![cfg(test)]

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use serde_json::json;

use crate::{
    Message, ModelProvider, ModelRequest, ProviderError, ProviderFuture, ProviderId,
    SecretString, ToolCall, ToolCallFragment, ToolDefinition,
};

use super::provider::OpenAiProvider;
use super::serde_api::{SseFrame, build_api_request, parse_sse_line};
use super::transport::{OpenAiChunkStream, OpenAiTransport, decode_sse_stream};
use super::types::{OpenAiRequest, OpenAiStreamChunk, OpenAiToolCallDelta};

#[derive(Debug)]
struct NoopTransport;

impl OpenAiTransport for NoopTransport {
    fn stream<'a>(
        &'a self,
        _request: OpenAiRequest,
        _api_key: Option<SecretString>,
    ) -> ProviderFuture<'a, Result<OpenAiChunkStream<'a>, ProviderError>> {
        Box::pin(async {
            let output = stream::iter(vec![Err(ProviderError::other("not used"))]);
            Ok(Box::pin(output) as OpenAiChunkStream<'a>)
        })
    }
}

fn weather_tool() -> ToolDefinition {
    ToolDefinition {
        name: "getWeather".to_string(),
        description: "Current weather for a city".to_string(),
        input_schema: "{\"type\":\"object\"}".to_string(),
    }
}

#[test]
fn sse_tool_call_slices_map_to_positional_fragments() {
    let line = r#"data: {"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_1","function":{"name":"getWeather","arguments":"{\"ci"}}]}}]}"#;

    let frame = parse_sse_line(line)
        .expect("data line")
        .expect("valid frame");
    let SseFrame::Chunk(chunk) = frame else {
        panic!("expected chunk");
    };

    assert_eq!(
        chunk.tool_calls,
        vec![OpenAiToolCallDelta {
            index: 0,
            id: Some("call_1".to_string()),
            name: Some("getWeather".to_string()),
            arguments: Some("{\"ci".to_string()),
        }]
    );
}

#[test]
fn sse_reasoning_content_and_done_marker_are_recognized() {
    let frame = parse_sse_line(r#"data: {"choices":[{"delta":{"reasoning_content":"hmm"}}]}"#)
        .expect("data line")
        .expect("valid frame");
    assert_eq!(
        frame,
        SseFrame::Chunk(OpenAiStreamChunk {
            reasoning: Some("hmm".to_string()),
            ..OpenAiStreamChunk::default()
        })
    );

    assert_eq!(
        parse_sse_line("data: [DONE]").expect("done").expect("ok"),
        SseFrame::Done
    );
    assert!(parse_sse_line(": keep-alive").is_none());
    assert!(parse_sse_line("").is_none());
}

#[test]
fn sse_frame_without_choices_is_an_empty_chunk() {
    let frame = parse_sse_line(r#"data: {"choices":[],"usage":{"total_tokens":3}}"#)
        .expect("data line")
        .expect("valid frame");

    assert_eq!(frame, SseFrame::Chunk(OpenAiStreamChunk::default()));
}

#[test]
fn sse_error_frame_with_status_code_is_surfaced() {
    let error = parse_sse_line(r#"data: {"error":{"message":"model overloaded","code":503}}"#)
        .expect("data line")
        .expect_err("error frame must not look like an empty chunk");

    assert_eq!(error.kind, crate::ProviderErrorKind::Unavailable);
    assert!(error.message.contains("model overloaded"));
}

#[test]
fn sse_error_frame_without_numeric_code_is_still_an_error() {
    let error = parse_sse_line(
        r#"data: {"error":{"message":"context length exceeded","code":"context_length_exceeded"}}"#,
    )
    .expect("data line")
    .expect_err("error frame");

    assert!(error.message.contains("context length exceeded"));
}

#[test]
fn malformed_sse_payload_is_a_protocol_error() {
    let error = parse_sse_line("data: {not json")
        .expect("data line")
        .expect_err("should fail");

    assert_eq!(error.kind, crate::ProviderErrorKind::Protocol);
}

#[test]
fn delta_fragment_drops_empty_id_and_name() {
    let fragment = ToolCallFragment::from(OpenAiToolCallDelta {
        index: 1,
        id: Some(String::new()),
        name: Some(String::new()),
        arguments: None,
    });

    assert_eq!(fragment, ToolCallFragment::new(1));
}

#[test]
fn api_request_replays_assistant_tool_calls_and_tool_results() {
    let provider = OpenAiProvider::new(ProviderId::OpenAi, Arc::new(NoopTransport));
    let request = ModelRequest::new(
        "gpt-4o-mini",
        vec![
            Message::user("What's the weather in Paris?"),
            Message::assistant(
                "",
                vec![ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}").with_id("call_1")],
            ),
            Message::tool(Some("call_1".to_string()), "18C, cloudy"),
        ],
    )
    .with_tools(vec![weather_tool()]);

    let built = provider.build_openai_request(request);
    let api = build_api_request(built).expect("request should convert");
    let body = serde_json::to_value(&api).expect("serializable");

    assert_eq!(body["stream"], json!(true));
    assert_eq!(body["messages"][1]["tool_calls"][0]["type"], json!("function"));
    assert_eq!(
        body["messages"][1]["tool_calls"][0]["function"]["arguments"],
        json!("{\"city\":\"Paris\"}")
    );
    assert_eq!(body["messages"][2]["tool_call_id"], json!("call_1"));
    assert_eq!(body["tools"][0]["function"]["name"], json!("getWeather"));
}

#[test]
fn empty_user_content_is_forwarded_to_the_backend() {
    let provider = OpenAiProvider::new(ProviderId::OpenAi, Arc::new(NoopTransport));
    let built = provider.build_openai_request(ModelRequest::new(
        "m",
        vec![Message::system("seed"), Message::user("")],
    ));

    let api = build_api_request(built).expect("empty content still converts");
    let body = serde_json::to_value(&api).expect("serializable");

    assert_eq!(body["messages"][1]["role"], json!("user"));
    assert_eq!(body["messages"][1]["content"], json!(""));
}

#[test]
fn m5stack_backend_does_not_forward_tools() {
    let provider = OpenAiProvider::new(ProviderId::M5Stack, Arc::new(NoopTransport));
    assert!(!provider.supports_tools());

    let built = provider.build_openai_request(
        ModelRequest::new("", vec![Message::user("hi")]).with_tools(vec![weather_tool()]),
    );
    assert!(built.tools.is_empty());
    assert_eq!(built.model, "qwen3-1.7B-Int8-ctx-axcl");
}

fn byte_chunks(parts: &[&str]) -> Vec<Result<Vec<u8>, ProviderError>> {
    parts.iter().map(|part| Ok(part.as_bytes().to_vec())).collect()
}

#[tokio::test]
async fn unterminated_final_data_line_is_still_decoded() {
    let bytes = stream::iter(byte_chunks(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"It is \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"18°C\"}}]}",
    ]));

    let chunks = decode_sse_stream(bytes)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("stream should decode");

    let text = chunks
        .into_iter()
        .filter_map(|chunk| chunk.content)
        .collect::<String>();
    assert_eq!(text, "It is 18°C");
}

#[tokio::test]
async fn done_marker_stops_decoding_and_error_frames_end_the_stream() {
    let bytes = stream::iter(byte_chunks(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n",
        "data: [DONE]\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
    ]));
    let items = decode_sse_stream(bytes).collect::<Vec<_>>().await;
    assert_eq!(items.len(), 1);

    let bytes = stream::iter(byte_chunks(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n",
        "data: {\"error\":{\"message\":\"model overloaded\",\"code\":503}}\n",
    ]));
    let items = decode_sse_stream(bytes).collect::<Vec<_>>().await;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    let error = items[1].as_ref().expect_err("error frame");
    assert_eq!(error.kind, crate::ProviderErrorKind::Unavailable);
}
