//! Model registry binding translated generation calls to a shared
//! vendor transport.

use crate::client::{ChatTransport, OpenAiClient};
use crate::convert::convert_request;
use crate::error::OpenAiError;
use crate::translate::translate_response;
use genbridge_model::{
    GenerateRequest, GenerateResponse, ModelCapabilities, ModelMetadata, OutputFormat,
    ResponseChunk,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub const PROVIDER: &str = "openai";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
const LABEL_PREFIX: &str = "OpenAI";

/// Capabilities of the multimodal GPT-4-class models.
pub const MULTIMODAL: ModelCapabilities = ModelCapabilities {
    multiturn: true,
    tools: true,
    system_role: true,
    media: true,
    response_format: true,
};

/// Capabilities of the text-only models.
pub const BASIC_TEXT: ModelCapabilities = ModelCapabilities {
    multiturn: true,
    tools: true,
    system_role: true,
    media: false,
    response_format: false,
};

const KNOWN_MODELS: &[(&str, ModelCapabilities)] = &[
    ("gpt-4o", MULTIMODAL),
    ("gpt-4o-mini", MULTIMODAL),
    ("gpt-4-turbo", MULTIMODAL),
    ("gpt-4", BASIC_TEXT),
];

fn known_capabilities(name: &str) -> Option<ModelCapabilities> {
    KNOWN_MODELS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, caps)| *caps)
}

/// Plugin configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for the service. When unset, the `OPENAI_API_KEY`
    /// environment variable is consulted.
    pub api_key: Option<String>,
}

/// Callback for streamed partial results.
///
/// Accepted by [`Model::generate`] for forward compatibility; the
/// OpenAI plugin never invokes it today, so callers must not rely on
/// partial delivery.
pub type ChunkCallback = Box<dyn Fn(ResponseChunk) + Send + Sync>;

struct ModelEntry {
    name: String,
    metadata: ModelMetadata,
    transport: Arc<dyn ChatTransport>,
}

/// Handle to a registered model.
#[derive(Clone)]
pub struct Model {
    entry: Arc<ModelEntry>,
}

// The transport handle is opaque, so derive(Debug) is unavailable;
// print the descriptive fields instead.
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.entry.name)
            .field("metadata", &self.entry.metadata)
            .finish()
    }
}

impl Model {
    /// The model's wire name, e.g. "gpt-4o".
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Label and capability descriptor.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.entry.metadata
    }

    /// Run one generation call: translate the request, issue the
    /// chat-completion RPC, translate the response.
    ///
    /// Vendor call errors pass through unchanged; no retry or backoff
    /// happens here.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        chunk_callback: Option<ChunkCallback>,
    ) -> Result<GenerateResponse, OpenAiError> {
        // Streaming is not delivered through this path yet.
        let _ = chunk_callback;

        let vendor_request =
            convert_request(&self.entry.name, self.entry.metadata.supports, request)?;
        tracing::debug!(provider = PROVIDER, model = %self.entry.name, "chat completion call");
        let vendor_response = self
            .entry
            .transport
            .create_chat_completion(vendor_request)
            .await?;

        let json_mode = matches!(
            &request.output,
            Some(output) if output.format == OutputFormat::Json
        );
        translate_response(vendor_response, json_mode, request)
    }
}

/// The OpenAI plugin: a registry of model name → capability descriptor
/// → generation entry, all sharing one vendor transport.
///
/// The transport is created once at init and is immutable afterwards;
/// the lock guards registration bookkeeping only. Generation calls
/// clone the entry `Arc` out of the table and run outside any lock.
pub struct OpenAi {
    transport: Arc<dyn ChatTransport>,
    models: RwLock<HashMap<String, Arc<ModelEntry>>>,
}

impl OpenAi {
    /// Initialize the plugin and register all known models.
    ///
    /// The credential comes from `config.api_key`, falling back to the
    /// `OPENAI_API_KEY` environment variable; with neither set this
    /// fails with [`OpenAiError::MissingApiKey`].
    pub fn init(config: Config) -> Result<Self, OpenAiError> {
        let api_key = resolve_api_key(config.api_key, std::env::var(API_KEY_ENV).ok())?;
        let transport: Arc<dyn ChatTransport> = Arc::new(OpenAiClient::new(api_key));
        Ok(Self::with_transport(transport))
    }

    /// Build a registry over an existing transport and register the
    /// known models. This is the seam tests use to substitute a mock.
    pub fn with_transport(transport: Arc<dyn ChatTransport>) -> Self {
        let registry = Self {
            transport,
            models: RwLock::new(HashMap::new()),
        };
        for (name, caps) in KNOWN_MODELS {
            registry.insert(name, *caps);
        }
        registry
    }

    /// Register an additional model. When `caps` is `None` the
    /// known-capability table is consulted; an unknown name with no
    /// capabilities is an error.
    pub fn define_model(
        &self,
        name: &str,
        caps: Option<ModelCapabilities>,
    ) -> Result<Model, OpenAiError> {
        let caps = match caps {
            Some(caps) => caps,
            None => known_capabilities(name)
                .ok_or_else(|| OpenAiError::UnknownModel(name.to_string()))?,
        };
        Ok(self.insert(name, caps))
    }

    /// Look up a registered model.
    pub fn model(&self, name: &str) -> Option<Model> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|entry| Model {
                entry: Arc::clone(entry),
            })
    }

    /// Whether the named model is registered.
    pub fn is_defined_model(&self, name: &str) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn insert(&self, name: &str, caps: ModelCapabilities) -> Model {
        let entry = Arc::new(ModelEntry {
            name: name.to_string(),
            metadata: ModelMetadata {
                label: format!("{LABEL_PREFIX} - {name}"),
                supports: caps,
            },
            transport: Arc::clone(&self.transport),
        });
        tracing::debug!(provider = PROVIDER, model = name, "registering model");
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&entry));
        Model { entry }
    }
}

fn resolve_api_key(
    explicit: Option<String>,
    env: Option<String>,
) -> Result<String, OpenAiError> {
    explicit
        .filter(|key| !key.is_empty())
        .or_else(|| env.filter(|key| !key.is_empty()))
        .ok_or(OpenAiError::MissingApiKey(API_KEY_ENV))
}
