//! Response translation: OpenAI chat-completion response → generic response.

use crate::convert::json_string_to_map;
use crate::error::OpenAiError;
use crate::wire::{ChatCompletionChoice, ChatCompletionResponse};
use genbridge_model::{
    Candidate, FinishReason, GenerateRequest, GenerateResponse, Message, Part, Role, Usage,
};

/// Build a generic response from a vendor response.
///
/// `json_mode` reflects whether the originating request asked for JSON
/// output; it decides whether plain content surfaces as a data part or
/// a text part. The full originating request is attached to the
/// response, unconditionally.
pub fn translate_response(
    response: ChatCompletionResponse,
    json_mode: bool,
    request: &GenerateRequest,
) -> Result<GenerateResponse, OpenAiError> {
    let mut candidates = Vec::with_capacity(response.choices.len());
    for choice in response.choices {
        candidates.push(translate_candidate(choice, json_mode)?);
    }

    Ok(GenerateResponse {
        candidates,
        usage: Usage {
            input_tokens: response.usage.prompt_tokens,
            output_tokens: response.usage.completion_tokens,
            total_tokens: response.usage.total_tokens,
        },
        request: request.clone(),
    })
}

/// Map a vendor finish reason to the generic one. Total: absent and
/// unrecognized values map to Unknown, never an error.
fn translate_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") | Some("tool_calls") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::Blocked,
        Some("function_call") => FinishReason::Other,
        _ => FinishReason::Unknown,
    }
}

fn translate_candidate(
    choice: ChatCompletionChoice,
    json_mode: bool,
) -> Result<Candidate, OpenAiError> {
    let finish_reason = translate_finish_reason(choice.finish_reason.as_deref());

    // Tool calls take precedence; any accompanying text is discarded.
    if !choice.message.tool_calls.is_empty() {
        let parts = choice
            .message
            .tool_calls
            .iter()
            .map(|call| {
                Ok(Part::tool_request(
                    call.function.name.clone(),
                    json_string_to_map(&call.function.arguments)?,
                ))
            })
            .collect::<Result<Vec<_>, OpenAiError>>()?;
        return Ok(Candidate {
            index: choice.index,
            finish_reason,
            message: Message::new(Role::Model, parts),
        });
    }

    let content = choice.message.content.unwrap_or_default();
    let part = if json_mode {
        Part::data(serde_json::Value::String(content))
    } else {
        Part::text(content)
    };

    Ok(Candidate {
        index: choice.index,
        finish_reason,
        message: Message::new(Role::Model, vec![part]),
    })
}
