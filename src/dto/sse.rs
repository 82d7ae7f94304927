use axum::response::sse::Event;
use serde::Serialize;

#[derive(Clone, Debug)]
/// Named payload pushed to an SSE client.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Serialise `payload` into the data field of an event called `event`.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

impl From<ServerEvent> for Event {
    fn from(payload: ServerEvent) -> Self {
        let event = Event::default().data(payload.data);
        match payload.event {
            Some(name) => event.event(name),
            None => event,
        }
    }
}
