//! The live websocket connection: reads/writes real frames and drives a
//! [`PeerSession`] with them (spec §4.4, §9 heartbeat/receive-timeout).
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use swarmcast_peer_protocol::ProtocolVersion;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::debug_injector::{self, SessionId};
use crate::session::PeerSession;
use crate::state::AppState;

/// Upgrades `GET /join` to a websocket and hands it off to the connection
/// loop.
pub async fn join(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run(socket, state))
}

async fn run(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let (outbound_tx, mut outbound_rx) = mpsc::channel(state.core.outbound_queue_capacity);

    let our_version = ProtocolVersion::parse(&state.core.protocol_version)
        .expect("configured protocol_version must be a well-formed MAJOR.MINOR.PATCH string");
    let mut session = PeerSession::new(our_version, outbound_tx);

    let session_id = debug_injector::allocate_session_id();
    let (inject_tx, mut inject_rx) = mpsc::channel::<String>(8);
    debug_injector::register(session_id, inject_tx);

    if !send_initial_batch(&state, &mut sender).await {
        finish(&state, &mut session, session_id).await;
        return;
    }

    let mut heartbeat = tokio::time::interval(Duration::from_secs(state.core.heartbeat_interval_secs.max(1)));
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let receive_timeout = Duration::from_secs(state.core.receive_timeout_secs.max(1));

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
            outbound = outbound_rx.recv() => {
                let Some(frame) = outbound else { break };
                let fatal = frame.is_fatal();
                if sender.send(Message::Text(frame.to_json())).await.is_err() || fatal {
                    break;
                }
            }
            injected = inject_rx.recv() => {
                let Some(text) = injected else { continue };
                if !process_text(&state, &mut session, &mut sender, &text).await {
                    break;
                }
            }
            incoming = tokio::time::timeout(receive_timeout, receiver.next()) => {
                match incoming {
                    Ok(Some(Ok(Message::Text(text)))) => {
                        if !process_text(&state, &mut session, &mut sender, &text).await {
                            break;
                        }
                    }
                    Ok(Some(Ok(Message::Close(_)))) | Ok(None) => break,
                    Ok(Some(Ok(_))) => {} // ping/pong/binary frames carry no protocol meaning here.
                    Ok(Some(Err(_))) => break,
                    Err(_elapsed) => {
                        tracing::info!(target: "PEER_SESSION", "closing session after {}s without a message", receive_timeout.as_secs());
                        break;
                    }
                }
            }
        }
    }

    finish(&state, &mut session, session_id).await;
}

async fn send_initial_batch(state: &AppState, sender: &mut SplitSink<WebSocket, Message>) -> bool {
    let batch = state.batch.lock().await;
    let frame = PeerSession::initial_frame(&batch).to_json();
    sender.send(Message::Text(frame)).await.is_ok()
}

async fn process_text(state: &AppState, session: &mut PeerSession, sender: &mut SplitSink<WebSocket, Message>, text: &str) -> bool {
    let outcome = {
        let mut swarm = state.swarm.lock().await;
        let batch = state.batch.lock().await;
        session.handle(&mut swarm, &state.replan, &batch, text)
    };

    for reply in &outcome.replies {
        if sender.send(Message::Text(reply.to_json())).await.is_err() {
            return false;
        }
    }

    !outcome.close
}

async fn finish(state: &AppState, session: &mut PeerSession, session_id: SessionId) {
    {
        let mut swarm = state.swarm.lock().await;
        session.on_disconnect(&mut swarm);
    }
    debug_injector::unregister(session_id);
    state.replan.fire();
}
