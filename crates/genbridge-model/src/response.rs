//! Generation response types.

use crate::message::{Message, Part};
use crate::request::GenerateRequest;
use serde::{Deserialize, Serialize};

/// Why a candidate stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// Normal completion, including a pause to call tools.
    Stop,
    /// Token limit reached.
    Length,
    /// Output blocked by a content filter.
    Blocked,
    /// Some other vendor-specific cause.
    Other,
    /// The vendor reported nothing recognizable.
    Unknown,
}

/// Token accounting for one generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// One generated alternative within a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position within the response, as reported by the vendor.
    pub index: usize,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// The generated message; role is always `Model`.
    pub message: Message,
}

/// The result of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated candidates, in vendor order.
    pub candidates: Vec<Candidate>,
    /// Token accounting.
    pub usage: Usage,
    /// The request that produced this response.
    pub request: GenerateRequest,
}

impl GenerateResponse {
    /// Text of the first candidate, concatenated over its text parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.message.text())
            .unwrap_or_default()
    }
}

/// A partial result delivered during streaming.
///
/// Defined for the streaming callback signature; the OpenAI plugin
/// never produces one today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Candidate index the chunk belongs to.
    pub index: usize,
    /// Content parts generated so far.
    pub content: Vec<Part>,
}
