//! Shared vocabulary for the directive pipeline: identifiers, the fixed section
//! list, the wire token format, error taxonomy and collaborator traits.

pub mod backend;
pub mod conversation;
pub mod errors;
pub mod ids;
pub mod section;
pub mod token;

pub use backend::{GenerationBackend, SearchBackend, SearchResponse};
pub use conversation::ConversationContext;
pub use errors::{BackendError, SearchError};
pub use ids::{ConversationId, RunId};
pub use section::Section;
pub use token::StreamToken;
