pub mod engine;
pub mod prompt;

pub use crate::domain::model::{CompletionParams, GenerationRequest, GenerationResponse};
pub use crate::domain::ports::CompletionProvider;
pub use crate::utils::error::Result;
pub use engine::ExcuseEngine;
