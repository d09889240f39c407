//! Model capability descriptors.

use serde::{Deserialize, Serialize};

/// Static declaration of what a model supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Multi-turn conversations.
    pub multiturn: bool,
    /// Tool calling.
    pub tools: bool,
    /// A dedicated system role.
    pub system_role: bool,
    /// Media (image) input.
    pub media: bool,
    /// Vendor-enforced response formats (JSON mode).
    pub response_format: bool,
}

/// Descriptive metadata attached to a registered model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Human-readable label, e.g. "OpenAI - gpt-4o".
    pub label: String,
    /// What the model supports.
    pub supports: ModelCapabilities,
}
