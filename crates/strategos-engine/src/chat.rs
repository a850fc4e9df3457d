//! Single-shot follow-up answers grounded in a stored conversation.

use std::sync::Arc;

use futures::Stream;
use tracing::{info, warn};

use strategos_core::token::ERROR_TAG;
use strategos_core::{ConversationId, StreamToken};

use crate::invoker::{BackendInvoker, Invocation};
use crate::prompt::build_chat_prompt;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct ChatResponder {
    invoker: BackendInvoker,
    sessions: Arc<dyn SessionStore>,
}

impl ChatResponder {
    pub fn new(invoker: BackendInvoker, sessions: Arc<dyn SessionStore>) -> Self {
        Self { invoker, sessions }
    }

    /// Answer `query` in one backend call. The stream yields exactly one token:
    /// the response text, or an inline error. Only successful responses are
    /// appended to the conversation history.
    pub fn respond(
        &self,
        conversation_id: ConversationId,
        query: String,
    ) -> impl Stream<Item = StreamToken> + Send + 'static {
        let this = self.clone();
        async_stream::stream! {
            let mut context = this.sessions.get(&conversation_id);
            let prompt = build_chat_prompt(&query, &context.render());

            let invocation = this
                .invoker
                .invoke(&prompt, || format!("(placeholder response) {query}"))
                .await;

            match invocation {
                Invocation::Failed(e) => {
                    warn!(conversation_id = %conversation_id, error_kind = e.error_kind(), "chat turn failed");
                    let token = StreamToken::error(ERROR_TAG, format!("chat backend call failed: {e}"));
                    yield token;
                }
                Invocation::Generated(text) | Invocation::Placeholder(text) => {
                    let response = text.trim().to_string();
                    context.history.push(response.clone());
                    this.sessions.set(&conversation_id, context);
                    info!(conversation_id = %conversation_id, chars = response.len(), "chat turn answered");
                    yield StreamToken::Text(response);
                }
            }
        }
    }
}
