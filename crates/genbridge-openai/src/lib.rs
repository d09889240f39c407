//! genbridge-openai: OpenAI plugin for the genbridge data model.
//!
//! Translates between the provider-agnostic request/response model and
//! the OpenAI chat-completion wire contract, and maintains a registry
//! of model capabilities bound to one shared vendor client.

mod client;
mod convert;
mod error;
mod registry;
mod translate;
pub mod wire;

pub use client::{ChatTransport, OpenAiClient, DEFAULT_BASE_URL};
pub use convert::{
    convert_request, from_openai_role, json_string_to_map, map_to_json_string, to_openai_role,
};
pub use error::OpenAiError;
pub use registry::{
    ChunkCallback, Config, Model, OpenAi, API_KEY_ENV, BASIC_TEXT, MULTIMODAL, PROVIDER,
};
pub use translate::translate_response;
