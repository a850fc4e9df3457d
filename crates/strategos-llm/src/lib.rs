//! Generation backend adapters.
//!
//! Each adapter implements [`strategos_core::GenerationBackend`] for one vendor.
//! [`factory`] picks one at startup from settings; there is no runtime probing.

pub mod factory;
pub mod gemini;
pub mod mock;
pub mod openai;

mod http;

pub use factory::{build_backend, Sampling};
pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockResponse};
pub use openai::OpenAiBackend;
