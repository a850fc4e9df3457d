//! # strategos-engine
//!
//! The directive pipeline. For each of the eleven sections, strictly in order:
//! build a prompt, invoke the generation backend once, parse the three output
//! regions, run the section's searches, and emit everything as
//! [`StreamToken`](strategos_core::StreamToken)s.
//!
//! Failures never end a stream early. Backend and search errors surface as
//! inline tagged text; unparseable output surfaces as the deliverable.

#![deny(unsafe_code)]

pub mod chat;
pub mod invoker;
pub mod orchestrator;
pub mod pacing;
pub mod parser;
pub mod prompt;
pub mod session;

pub use chat::ChatResponder;
pub use invoker::{BackendInvoker, Invocation};
pub use orchestrator::{DirectiveRequest, Orchestrator, SectionResult};
pub use pacing::{Pacer, Pause};
pub use parser::{parse_output, parse_queries, ParsedOutput};
pub use session::{InMemorySessionStore, SessionStore};
