//! genbridge-model: provider-agnostic generative-AI data model.
//!
//! Plugins translate these types to and from vendor wire formats so
//! callers can target a uniform "model" capability without knowing
//! vendor-specific message shapes.

mod capability;
mod message;
mod request;
mod response;

pub use capability::{ModelCapabilities, ModelMetadata};
pub use message::{Message, Part, Role};
pub use request::{
    GenerateRequest, GenerationConfig, OutputFormat, OutputSpec, ToolDefinition,
};
pub use response::{Candidate, FinishReason, GenerateResponse, ResponseChunk, Usage};
