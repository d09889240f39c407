//! End-to-end generation flow against a mock transport.

use async_trait::async_trait;
use genbridge_model::{
    FinishReason, GenerateRequest, Message, OutputFormat, OutputSpec, Part, Role,
};
use genbridge_openai::wire::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChatResponseMessage,
    ChatUsage, FunctionCall, ToolCall,
};
use genbridge_openai::{ChatTransport, OpenAi, OpenAiError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport that records requests and replays a canned response.
struct MockTransport {
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatCompletionRequest>>,
    response: ChatCompletionResponse,
}

impl MockTransport {
    fn new(response: ChatCompletionResponse) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            response,
        })
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        Ok(self.response.clone())
    }
}

fn text_response(content: &str, finish: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        choices: vec![ChatCompletionChoice {
            index: 0,
            message: ChatResponseMessage {
                content: Some(content.to_string()),
                tool_calls: vec![],
            },
            finish_reason: Some(finish.to_string()),
        }],
        usage: ChatUsage {
            prompt_tokens: 12,
            completion_tokens: 3,
            total_tokens: 15,
        },
    }
}

#[tokio::test]
async fn test_generate_round_trip() {
    let transport = MockTransport::new(text_response("Hello back", "stop"));
    let registry = OpenAi::with_transport(transport.clone());
    let model = registry.model("gpt-4o").expect("known model");

    let request = GenerateRequest::new(vec![
        Message::system_text("You are helpful."),
        Message::user_text("Hello"),
    ]);
    let response = model.generate(&request, None).await.unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.text(), "Hello back");
    assert_eq!(response.candidates[0].finish_reason, FinishReason::Stop);
    assert_eq!(response.candidates[0].message.role, Role::Model);
    assert_eq!(response.usage.total_tokens, 15);
    // The originating request rides along on the response.
    assert_eq!(response.request, request);

    let sent = transport.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent.model, "gpt-4o");
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.messages[0].role, "system");
    assert_eq!(sent.messages[1].role, "user");
}

#[tokio::test]
async fn test_generate_translates_tool_calls() {
    let transport = MockTransport::new(ChatCompletionResponse {
        choices: vec![ChatCompletionChoice {
            index: 0,
            message: ChatResponseMessage {
                content: None,
                tool_calls: vec![ToolCall {
                    id: "lookup".to_string(),
                    kind: "function".to_string(),
                    function: FunctionCall {
                        name: "lookup".to_string(),
                        arguments: "{\"x\":1}".to_string(),
                    },
                }],
            },
            finish_reason: Some("tool_calls".to_string()),
        }],
        usage: ChatUsage::default(),
    });
    let registry = OpenAi::with_transport(transport);
    let model = registry.model("gpt-4o").unwrap();

    let request = GenerateRequest::new(vec![Message::user_text("look up x")]);
    let response = model.generate(&request, None).await.unwrap();

    let parts = &response.candidates[0].message.content;
    assert_eq!(parts.len(), 1);
    match &parts[0] {
        Part::ToolRequest { name, input } => {
            assert_eq!(name, "lookup");
            assert_eq!(input["x"], 1);
        }
        other => panic!("expected tool request, got {other:?}"),
    }
    assert_eq!(response.candidates[0].finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn test_generate_json_mode_sets_format_and_data_part() {
    let transport = MockTransport::new(text_response("{\"answer\":42}", "stop"));
    let registry = OpenAi::with_transport(transport.clone());
    let model = registry.model("gpt-4o").unwrap();

    let request = GenerateRequest::new(vec![Message::user_text("answer as json")]).with_output(
        OutputSpec {
            format: OutputFormat::Json,
            schema: serde_json::Map::new(),
        },
    );
    let response = model.generate(&request, None).await.unwrap();

    let sent = transport.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(
        sent.response_format.as_ref().map(|f| f.kind.as_str()),
        Some("json_object")
    );
    assert!(matches!(
        response.candidates[0].message.content[0],
        Part::Data { .. }
    ));
}

#[tokio::test]
async fn test_generate_json_mode_dropped_without_capability() {
    let transport = MockTransport::new(text_response("plain", "stop"));
    let registry = OpenAi::with_transport(transport.clone());
    // gpt-4 does not declare the response_format capability.
    let model = registry.model("gpt-4").unwrap();

    let request = GenerateRequest::new(vec![Message::user_text("answer as json")]).with_output(
        OutputSpec {
            format: OutputFormat::Json,
            schema: serde_json::Map::new(),
        },
    );
    model.generate(&request, None).await.unwrap();

    let sent = transport.last_request.lock().unwrap().clone().unwrap();
    assert!(sent.response_format.is_none());
}

#[tokio::test]
async fn test_chunk_callback_never_invoked() {
    let transport = MockTransport::new(text_response("no streaming", "stop"));
    let registry = OpenAi::with_transport(transport);
    let model = registry.model("gpt-4o").unwrap();

    let invoked = Arc::new(AtomicBool::new(false));
    let seen = invoked.clone();
    let callback: genbridge_openai::ChunkCallback =
        Box::new(move |_chunk| seen.store(true, Ordering::SeqCst));

    let request = GenerateRequest::new(vec![Message::user_text("stream?")]);
    let response = model.generate(&request, Some(callback)).await.unwrap();

    assert!(!invoked.load(Ordering::SeqCst));
    assert_eq!(response.text(), "no streaming");
}

#[tokio::test]
async fn test_concurrent_generation_shares_one_transport() {
    let transport = MockTransport::new(text_response("ok", "stop"));
    let registry = Arc::new(OpenAi::with_transport(transport.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let model = registry.model("gpt-4o-mini").unwrap();
            let request = GenerateRequest::new(vec![Message::user_text("hi")]);
            model.generate(&request, None).await.unwrap()
        }));
    }
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.text(), "ok");
    }
    assert_eq!(transport.calls.load(Ordering::SeqCst), 8);
}
