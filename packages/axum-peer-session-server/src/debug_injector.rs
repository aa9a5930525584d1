//! A process-wide registry letting test code push a synthetic inbound frame
//! into a live session as though it had arrived over the websocket, without
//! the test having to speak the wire protocol itself (spec §9 "debug
//! injector").
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use tokio::sync::mpsc;

/// Identifies one registered session's inbound channel. Allocated by
/// [`allocate_session_id`] when a websocket connection is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);
static REGISTRY: OnceLock<Mutex<HashMap<SessionId, mpsc::Sender<String>>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<SessionId, mpsc::Sender<String>>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Allocates a fresh id for a new connection.
#[must_use]
pub fn allocate_session_id() -> SessionId {
    SessionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Registers `sender` as `id`'s injection channel for the lifetime of the
/// connection. Call [`unregister`] when the connection closes.
pub fn register(id: SessionId, sender: mpsc::Sender<String>) {
    registry().lock().expect("debug injector lock poisoned").insert(id, sender);
}

/// Removes `id`'s entry. Safe to call even if it was never registered.
pub fn unregister(id: SessionId) {
    registry().lock().expect("debug injector lock poisoned").remove(&id);
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    #[error("no session registered with this id")]
    NoSuchSession,
    #[error("session's inbound channel is closed")]
    SessionClosed,
}

/// Schedules `frame` to be processed by `id`'s connection loop on its next
/// turn through `tokio::select!`, exactly like a frame read off the socket.
///
/// # Errors
///
/// Returns [`InjectError::NoSuchSession`] if `id` is not registered, or
/// [`InjectError::SessionClosed`] if its connection has already ended.
pub async fn inject(id: SessionId, frame: String) -> Result<(), InjectError> {
    let sender = {
        let guard = registry().lock().expect("debug injector lock poisoned");
        guard.get(&id).cloned()
    };

    let sender = sender.ok_or(InjectError::NoSuchSession)?;
    sender.send(frame).await.map_err(|_err| InjectError::SessionClosed)
}
