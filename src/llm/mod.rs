//! LLM domain: the seam between providers and the parsers.
//!
//! No HTTP lives here. A host implements `ChatCompletion`; everything
//! around the call is provided:
//!   - provider.rs: provider metadata + configuration checks
//!   - prompts.rs : enhanced system prompt and response contract
//!   - payload.rs : image validation and base64 encoding
//!   - client.rs  : the `ChatCompletion` trait and provider wire shapes
//!   - usage.rs   : token usage normalization
//!   - pipeline.rs: prompt → completion → split → decode

pub mod client;
pub mod payload;
pub mod pipeline;
pub mod prompts;
pub mod provider;
mod usage;

pub use client::{ChatCompletion, CompletionRequest, CompletionResponse};
pub use payload::{image_dimensions, ImagePayload};
pub use pipeline::{analyze_image, process_response, run_analyses, run_analysis};
pub use prompts::{build_enhanced_prompt, completion_heading, AnalysisTypeConfig};
pub use provider::{all_providers, is_provider_configured, Provider, ProviderInfo};
