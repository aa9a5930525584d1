//! C5 Peer Session: the per-peer message loop (spec §4.4), as a
//! synchronous state machine over a locked [`Swarm`]. Kept free of any
//! websocket/axum types so the state-machine correctness can be unit
//! tested without a real socket; `crate::socket` drives it from a real
//! connection.
use std::collections::{HashMap, HashSet};

use swarmcast_peer_protocol::{parse_inbound, Inbound, Outbound, ParseError, ProtocolVersion, ReportedDownload};
use swarmcast_primitives::{Batch, ChunkHash};
use swarmcast_swarm_core::{Client, NodeId, ReplanTrigger, Swarm};
use tokio::sync::mpsc;

/// Where a session is in the handshake (spec §4.4 state diagram). There is
/// no separate `Rejoining` variant: a second `join_swarm` while `Joined` is
/// handled as one atomic destroy-then-create within [`PeerSession::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Versioned,
    Joined,
    Closed,
}

/// The result of handling one inbound frame: zero or more frames to send
/// back, and whether the session must now close.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub replies: Vec<Outbound>,
    pub close: bool,
}

impl Outcome {
    fn reply(frame: Outbound) -> Self {
        let close = frame.is_fatal();
        Self { replies: vec![frame], close }
    }

    fn none() -> Self {
        Self::default()
    }
}

/// Per-session state: handshake progress and, once joined, the node this
/// session speaks for.
#[derive(Debug)]
pub struct PeerSession {
    state: SessionState,
    node_id: Option<NodeId>,
    our_version: ProtocolVersion,
    outbound: mpsc::Sender<Outbound>,
}

impl PeerSession {
    #[must_use]
    pub fn new(our_version: ProtocolVersion, outbound: mpsc::Sender<Outbound>) -> Self {
        Self {
            state: SessionState::Connected,
            node_id: None,
            our_version,
            outbound,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    /// The frame(s) a brand-new connection should be sent before it reads
    /// anything else (spec §5 "ordering guarantees": `initial_batch` is
    /// always first).
    #[must_use]
    pub fn initial_frame(batch: &Batch) -> Outbound {
        Outbound::InitialBatch {
            message: "initial batch".to_string(),
            data: batch.clone(),
        }
    }

    /// Cleans up swarm state when the underlying connection drops, however
    /// that happens (heartbeat loss, read error, graceful close).
    pub fn on_disconnect(&mut self, swarm: &mut Swarm) {
        if let Some(id) = self.node_id.take() {
            swarm.destroy_node(id);
        }
        self.state = SessionState::Closed;
    }

    /// Handles one inbound websocket text frame.
    pub fn handle(&mut self, swarm: &mut Swarm, replan: &ReplanTrigger, current_batch: &Batch, raw: &str) -> Outcome {
        match parse_inbound(raw) {
            Err(ParseError::NotAnObject(_) | ParseError::MissingAction) => {
                self.state = SessionState::Closed;
                Outcome::reply(Outbound::fatal("frame must be a JSON object with an `action` field"))
            }
            Err(ParseError::UnknownAction(action)) => {
                if self.state == SessionState::Connected {
                    self.state = SessionState::Closed;
                    Outcome::reply(Outbound::fatal(format!("unknown action `{action}` before version handshake")))
                } else {
                    Outcome::reply(Outbound::error(format!("unknown action `{action}`")))
                }
            }
            Err(ParseError::InvalidArgs { action, source }) => {
                if self.state == SessionState::Connected {
                    self.state = SessionState::Closed;
                    Outcome::reply(Outbound::fatal(format!("malformed `{action}` frame: {source}")))
                } else {
                    Outcome::reply(Outbound::error(format!("invalid arguments for `{action}`: {source}")))
                }
            }
            Ok(message) => self.handle_message(swarm, replan, current_batch, message),
        }
    }

    fn handle_message(&mut self, swarm: &mut Swarm, replan: &ReplanTrigger, current_batch: &Batch, message: Inbound) -> Outcome {
        match message {
            Inbound::Version { protocol, .. } => self.handle_version(&protocol),
            Inbound::JoinSwarm {
                hashes,
                dl_url,
                concurrent_transfers,
                nick,
            } => self.handle_join_swarm(swarm, replan, current_batch, hashes, &dl_url, concurrent_transfers, nick),
            Inbound::SetHashes { hashes } => self.handle_hashes(swarm, replan, hashes, true),
            Inbound::AddHashes { hashes } => self.handle_hashes(swarm, replan, hashes, false),
            Inbound::ReportTransfers { dls, ul_count, ul_times } => {
                self.handle_report_transfers(swarm, replan, &dls, ul_count, &ul_times)
            }
            Inbound::Error { message } => {
                tracing::warn!(target: "PEER_SESSION", peer_message = ?message, "peer reported a client-side error");
                Outcome::none()
            }
        }
    }

    fn handle_version(&mut self, protocol: &str) -> Outcome {
        if self.state != SessionState::Connected {
            return Outcome::reply(Outbound::error("already versioned"));
        }

        let Ok(theirs) = ProtocolVersion::parse(protocol) else {
            self.state = SessionState::Closed;
            return Outcome::reply(Outbound::fatal(format!("malformed protocol version `{protocol}`")));
        };

        if !theirs.major_matches(&self.our_version) {
            self.state = SessionState::Closed;
            return Outcome::reply(Outbound::fatal(format!(
                "protocol version mismatch: peer is {theirs}, master is {}",
                self.our_version
            )));
        }

        self.state = SessionState::Versioned;
        Outcome::none()
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_join_swarm(
        &mut self,
        swarm: &mut Swarm,
        replan: &ReplanTrigger,
        current_batch: &Batch,
        hashes: Vec<ChunkHash>,
        dl_url: &str,
        concurrent_transfers: i64,
        nick: String,
    ) -> Outcome {
        if self.state == SessionState::Connected {
            self.state = SessionState::Closed;
            return Outcome::reply(Outbound::fatal("must send version before join_swarm"));
        }

        if concurrent_transfers < 1 {
            return Outcome::reply(Outbound::error("concurrent_transfers must be >= 1"));
        }

        if !swarmcast_peer_protocol::is_valid_dl_url_template(dl_url) {
            return Outcome::reply(Outbound::error("dl_url must contain the `{hash}` placeholder"));
        }

        // A second join_swarm replaces the previous Node (spec §4.4
        // JOINED -> REJOINING -> JOINED).
        if let Some(old_id) = self.node_id.take() {
            swarm.destroy_node(old_id);
        }

        #[allow(clippy::cast_sign_loss)]
        let caps = concurrent_transfers as usize;
        let client = Client::new(dl_url.to_string(), self.outbound.clone());
        let hash_set: HashSet<ChunkHash> = hashes.into_iter().collect();

        let (node_id, unknown) = swarm
            .node_join(nick, &hash_set, caps, caps, false, Some(client))
            .expect("a peer session never joins as master");

        self.node_id = Some(node_id);
        self.state = SessionState::Joined;
        replan.fire();

        let mut replies = vec![Outbound::NewBatch { data: current_batch.clone() }];
        if !unknown.is_empty() {
            replies.push(Outbound::Rehash {
                message: "some reported hashes are outside the current batch".to_string(),
                unknown_hashes: unknown.into_iter().collect(),
            });
        }

        Outcome { replies, close: false }
    }

    fn handle_hashes(&mut self, swarm: &mut Swarm, replan: &ReplanTrigger, hashes: Vec<ChunkHash>, clear_first: bool) -> Outcome {
        let Some(id) = self.joined_node_id() else {
            return Outcome::reply(Outbound::error("must join_swarm before reporting hashes"));
        };

        let universe: HashSet<ChunkHash> = swarm.all_hashes().iter().cloned().collect();
        let hash_set: HashSet<ChunkHash> = hashes.into_iter().collect();

        let unknown = swarm
            .node_mut(id)
            .expect("joined session always references a live node")
            .add_hashes(&hash_set, clear_first, &universe);

        replan.fire();

        if unknown.is_empty() {
            Outcome::none()
        } else {
            Outcome::reply(Outbound::Rehash {
                message: "some reported hashes are outside the current batch".to_string(),
                unknown_hashes: unknown.into_iter().collect(),
            })
        }
    }

    fn handle_report_transfers(&mut self, swarm: &mut Swarm, replan: &ReplanTrigger, dls: &[ReportedDownload], ul_count: usize, ul_times: &[f64]) -> Outcome {
        let Some(id) = self.joined_node_id() else {
            return Outcome::reply(Outbound::error("must join_swarm before reporting transfers"));
        };

        let resolved = resolve_senders(swarm, dls);
        let alive = swarm.alive_node_ids();

        let node = swarm.node_mut(id).expect("joined session always references a live node");

        if let Err(err) = node.set_active_transfers(resolved, ul_count, &alive) {
            return Outcome::reply(Outbound::error(format!("rejected report_transfers: {err}")));
        }

        node.update_transfer_speed(ul_times);
        replan.fire();

        Outcome::none()
    }

    fn joined_node_id(&self) -> Option<NodeId> {
        if self.state == SessionState::Joined {
            self.node_id
        } else {
            None
        }
    }
}

/// Resolves each reported download's `url` back to the [`NodeId`] of the
/// node currently advertising a matching `dl_url_template` (spec §4.4,
/// DESIGN.md Open Question 1): the first node in swarm order whose
/// template, with `{hash}` stripped, prefixes the reported `url` wins. An
/// unresolvable URL is dropped rather than rejecting the whole report.
fn resolve_senders(swarm: &Swarm, dls: &[ReportedDownload]) -> HashMap<(ChunkHash, NodeId), f64> {
    let mut resolved = HashMap::with_capacity(dls.len());

    for dl in dls {
        let sender = swarm.nodes().find(|n| {
            n.client()
                .is_some_and(|c| url_prefix(&c.dl_url_template).is_some_and(|prefix| dl.url.starts_with(prefix)))
        });

        match sender {
            Some(sender) => {
                resolved.insert((dl.hash.clone(), sender.id()), dl.mbps_limit.unwrap_or(0.0));
            }
            None => tracing::warn!(target: "PEER_SESSION", url = %dl.url, "report_transfers referenced an unresolvable sender url"),
        }
    }

    resolved
}

fn url_prefix(dl_url_template: &str) -> Option<&str> {
    dl_url_template.split("{hash}").next()
}
