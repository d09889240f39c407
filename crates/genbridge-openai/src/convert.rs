//! Request translation: generic request → OpenAI chat-completion request.
//!
//! Also home of the role/part mapping rules and the JSON-string helpers
//! shared with the response translator.

use crate::error::OpenAiError;
use crate::wire::{
    ChatCompletionMessage, ChatCompletionRequest, ChatMessagePart, FunctionCall,
    FunctionDefinition, ImageUrl, MessageContent, ResponseFormat, ResponseFormatJsonSchema, Tool,
    ToolCall, IMAGE_DETAIL_AUTO, RESPONSE_FORMAT_JSON_OBJECT, RESPONSE_FORMAT_TEXT, ROLE_ASSISTANT,
    ROLE_SYSTEM, ROLE_TOOL, ROLE_USER, TOOL_TYPE_FUNCTION,
};
use genbridge_model::{
    GenerateRequest, Message, ModelCapabilities, OutputFormat, Part, Role, ToolDefinition,
};

/// Map a generic role to the vendor role string. Total over the closed
/// `Role` enum.
pub fn to_openai_role(role: Role) -> &'static str {
    match role {
        Role::User => ROLE_USER,
        Role::System => ROLE_SYSTEM,
        Role::Model => ROLE_ASSISTANT,
        Role::Tool => ROLE_TOOL,
    }
}

/// Map a vendor role string back to the generic role. Exactly four
/// values are defined; anything else is an error, never dropped.
pub fn from_openai_role(role: &str) -> Result<Role, OpenAiError> {
    match role {
        ROLE_USER => Ok(Role::User),
        ROLE_SYSTEM => Ok(Role::System),
        ROLE_ASSISTANT => Ok(Role::Model),
        ROLE_TOOL => Ok(Role::Tool),
        other => Err(OpenAiError::UnknownRole(other.to_string())),
    }
}

/// Encode a string-keyed mapping as a JSON string (tool arguments and
/// tool outputs travel as raw JSON text on the wire).
pub fn map_to_json_string(
    map: &serde_json::Map<String, serde_json::Value>,
) -> Result<String, OpenAiError> {
    Ok(serde_json::to_string(map)?)
}

/// Decode a JSON string into a string-keyed mapping. Malformed input
/// here means the vendor broke its contract.
pub fn json_string_to_map(
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, OpenAiError> {
    serde_json::from_str(raw)
        .map_err(|e| OpenAiError::VendorContract(format!("malformed tool-call arguments {raw:?}: {e}")))
}

/// Build a vendor chat-completion request from a generic request.
///
/// Unset config fields are never forwarded, so vendor-side defaults are
/// preserved. The output format is honored only when the target model
/// declares the `response_format` capability; otherwise it is silently
/// dropped.
pub fn convert_request(
    model: &str,
    caps: ModelCapabilities,
    request: &GenerateRequest,
) -> Result<ChatCompletionRequest, OpenAiError> {
    let messages = convert_messages(&request.messages)?;
    let tools = convert_tools(&request.tools)?;

    let mut out = ChatCompletionRequest {
        model: model.to_string(),
        messages,
        tools,
        n: (request.candidates > 0).then_some(request.candidates),
        max_tokens: request.config.max_output_tokens,
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        stop: request.config.stop_sequences.clone(),
        response_format: None,
    };

    if let Some(output) = &request.output {
        if caps.response_format {
            out.response_format = Some(match output.format {
                OutputFormat::Json => ResponseFormat {
                    kind: RESPONSE_FORMAT_JSON_OBJECT.to_string(),
                    json_schema: Some(ResponseFormatJsonSchema {
                        schema: serde_json::Value::Object(output.schema.clone()),
                        strict: true,
                    }),
                },
                OutputFormat::Text => ResponseFormat {
                    kind: RESPONSE_FORMAT_TEXT.to_string(),
                    json_schema: None,
                },
            });
        }
    }

    Ok(out)
}

fn convert_messages(messages: &[Message]) -> Result<Vec<ChatCompletionMessage>, OpenAiError> {
    let mut out = Vec::new();
    for m in messages {
        let role = to_openai_role(m.role);
        match m.role {
            Role::User => {
                let parts = m
                    .content
                    .iter()
                    .map(convert_part)
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(ChatCompletionMessage {
                    role: role.to_string(),
                    content: Some(MessageContent::Parts(parts)),
                    ..Default::default()
                });
            }
            Role::System => {
                out.push(ChatCompletionMessage {
                    role: role.to_string(),
                    content: Some(MessageContent::Text(first_text(m))),
                    ..Default::default()
                });
            }
            Role::Model => {
                let mut tool_calls = Vec::new();
                for part in &m.content {
                    if let Part::ToolRequest { name, input } = part {
                        // call id = tool name, per the vendor contract
                        // this plugin upholds in both directions
                        tool_calls.push(ToolCall {
                            id: name.clone(),
                            kind: TOOL_TYPE_FUNCTION.to_string(),
                            function: FunctionCall {
                                name: name.clone(),
                                arguments: map_to_json_string(input)?,
                            },
                        });
                    }
                }
                if tool_calls.is_empty() {
                    out.push(ChatCompletionMessage {
                        role: role.to_string(),
                        content: Some(MessageContent::Text(first_text(m))),
                        ..Default::default()
                    });
                } else {
                    out.push(ChatCompletionMessage {
                        role: role.to_string(),
                        tool_calls,
                        ..Default::default()
                    });
                }
            }
            Role::Tool => {
                for part in &m.content {
                    let Part::ToolResponse { name, output } = part else {
                        return Err(OpenAiError::UnknownPart);
                    };
                    out.push(ChatCompletionMessage {
                        role: role.to_string(),
                        content: Some(MessageContent::Text(map_to_json_string(output)?)),
                        tool_call_id: Some(name.clone()),
                        name: Some(name.clone()),
                        ..Default::default()
                    });
                }
            }
        }
    }
    Ok(out)
}

/// Text of the first part, for single-content roles.
fn first_text(message: &Message) -> String {
    message
        .content
        .first()
        .and_then(Part::as_text)
        .unwrap_or_default()
        .to_string()
}

/// Map a user-message part to a vendor content part. Only text and
/// media are expressible here.
fn convert_part(part: &Part) -> Result<ChatMessagePart, OpenAiError> {
    match part {
        Part::Text { text } => Ok(ChatMessagePart::Text { text: text.clone() }),
        Part::Media { url, .. } => Ok(ChatMessagePart::ImageUrl {
            image_url: ImageUrl {
                url: url.clone(),
                detail: IMAGE_DETAIL_AUTO.to_string(),
            },
        }),
        _ => Err(OpenAiError::UnknownPart),
    }
}

fn convert_tools(tools: &[ToolDefinition]) -> Result<Vec<Tool>, OpenAiError> {
    tools
        .iter()
        .map(|t| {
            Ok(Tool {
                kind: TOOL_TYPE_FUNCTION.to_string(),
                function: FunctionDefinition {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: serde_json::Value::Object(t.input_schema.clone()),
                },
            })
        })
        .collect()
}
