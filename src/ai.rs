//! Free-form questions answered by a hosted text-generation model.

pub mod config;
pub mod gateway;
pub mod prompts;

pub use config::AiConfig;
pub use gateway::{AiAnswer, AiGateway};
