//! Application layer: synthesis orchestration and stock components.

pub mod components;
pub mod error;
pub mod synthesizer;

pub use error::{SynthResult, SynthesisError};
pub use synthesizer::Synthesizer;
