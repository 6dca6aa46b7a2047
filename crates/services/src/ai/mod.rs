mod client;
mod config;
mod scripted;

pub use client::{GeminiClient, TextCapability, TextGenerator};
pub use config::{
    API_KEY_VAR, AiConfig, BASE_URL_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL, GenerationParams,
    MODEL_VAR, TIMEOUT_VAR,
};
pub use scripted::ScriptedGenerator;
