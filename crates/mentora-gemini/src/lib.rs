//! Gemini provider for Mentora
//!
//! Implements `mentora_core::Generator` on top of the `generateContent` REST
//! endpoint. Wire types stay private to this crate.

pub mod error;
mod generator;
mod wire;

pub use error::GeminiError;
pub use generator::GeminiGenerator;
