use std::sync::Arc;

use pchat::{ChatPolicy, ChatService, SessionId, TranscriptStore, TurnCallbacks};
use pmemory::{FilesystemTranscriptStore, load_transcript};
use pprovider::{
    BoxedEventStream, DeltaEvent, Message, ModelProvider, ModelRequest, ProviderError,
    ProviderFuture, ProviderId, ToolCall, VecEventStream,
};

fn sample_transcript() -> Vec<Message> {
    vec![
        Message::system("be brief"),
        Message::user("What's the weather in Paris?"),
        Message::assistant(
            "",
            vec![ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}").with_id("call_1")],
        ),
        Message::tool(Some("call_1".to_string()), "18C, cloudy"),
        Message::assistant("It's 18°C and cloudy in Paris.", Vec::new()),
    ]
}

#[tokio::test]
async fn saved_transcript_reloads_identically() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FilesystemTranscriptStore::new(dir.path(), "openai").expect("store");
    let session = SessionId::from("kitchen");
    let transcript = sample_transcript();

    store.save(&session, &transcript).await.expect("save");

    let file_name = store
        .path()
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name");
    assert!(file_name.starts_with("openai_chat_history_"));
    assert!(file_name.ends_with(".json"));
    assert_eq!(load_transcript(store.path()).expect("reload"), transcript);
    assert_eq!(
        store.load(&session).await.expect("load"),
        Some(transcript)
    );
}

#[tokio::test]
async fn later_saves_rewrite_the_same_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store =
        FilesystemTranscriptStore::with_file_name(dir.path(), "fixed.json").expect("store");
    let session = SessionId::from("kitchen");

    store
        .save(&session, &[Message::system("seed")])
        .await
        .expect("first save");
    store
        .save(&session, &sample_transcript())
        .await
        .expect("second save");

    let files = std::fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(files, 1);
    assert_eq!(load_transcript(store.path()).expect("reload").len(), 5);
}

#[tokio::test]
async fn fresh_store_loads_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FilesystemTranscriptStore::new(dir.path(), "ollama").expect("store");

    assert_eq!(
        store.load(&SessionId::from("kitchen")).await.expect("load"),
        None
    );
}

struct OneLineProvider;

impl ModelProvider for OneLineProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn stream_completion<'a>(
        &'a self,
        _request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            let stream: BoxedEventStream<'a> =
                Box::pin(VecEventStream::new(vec![Ok(DeltaEvent::text("Hi there."))]));
            Ok(stream)
        })
    }
}

#[tokio::test]
async fn chat_service_persists_through_the_filesystem_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FilesystemTranscriptStore::new(dir.path(), "ollama").expect("store"));
    let service = ChatService::builder(Arc::new(OneLineProvider))
        .store(store.clone())
        .policy(ChatPolicy::new("qwen3:1.7b").with_system_prompt("seed"))
        .build();

    service
        .run_turn(vec![Message::user("hello")], &TurnCallbacks::silent())
        .await
        .expect("turn should succeed");

    assert_eq!(
        load_transcript(store.path()).expect("reload"),
        vec![
            Message::system("seed"),
            Message::user("hello"),
            Message::assistant("Hi there.", Vec::new()),
        ]
    );
}
