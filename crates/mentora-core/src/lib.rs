//! # Mentora Core
//!
//! Provider-neutral request/response types and the `Generator` abstraction
//! shared by the Mentora service layer and its model providers.

pub mod error;
pub mod generator;
pub mod request;

pub use error::{CoreError, Result};
pub use generator::{Generator, GeneratorExt, GeneratorMetadata, SharedGenerator};
pub use request::{
    ContentPart, GenerationOutput, GenerationRequest, GenerationResponse, RequestId,
};
