//! LLM module for minutesmaster
//!
//! Builds prompt context, composes prompts, sends them to an OpenAI-compatible
//! chat-completions endpoint and normalizes the replies.

pub mod client;
pub mod normalize;
pub mod openai;
pub mod profiler;
pub mod prompts;
pub mod provider;
mod service;

pub use client::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use openai::{clamp_tokens, ChatClient};
pub use prompts::{build_context, OutputContract, PromptContext};
pub use provider::{chat_completions_url, resolve_base_url};
pub use service::{ConnectionStatus, GenerationRequest, MinutesService, ProgressReporter};
