//! Server-sent-event framing of token streams.
//!
//! One token becomes one event. The line terminator that [`StreamToken::render`]
//! appends for piped output is dropped, since the event boundary already ends
//! the line. Interior newlines become multi-line `data:` fields. Carriage
//! returns are not representable in SSE data and are dropped.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use strategos_core::StreamToken;

pub fn token_event(token: &StreamToken) -> Event {
    let rendered = token.render();
    let text = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if text.contains('\r') {
        Event::default().data(text.replace('\r', ""))
    } else {
        Event::default().data(text)
    }
}

pub fn event_stream<S>(
    tokens: S,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = StreamToken> + Send + 'static,
{
    let events = tokens.map(|token| Ok(token_event(&token)));
    Sse::new(events).keep_alive(KeepAlive::new().interval(keep_alive))
}
