//! Per-peer swarm state (spec §4.1).
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use derive_more::{Constructor, Display, From};
use swarmcast_peer_protocol::Outbound;
use swarmcast_primitives::ChunkHash;
use tokio::sync::mpsc;

/// A stable identifier for a [`Node`], allocated by the owning
/// [`crate::swarm::Swarm`] on join. Never reused within one master process
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

/// The out-edge back to a peer's session: where to ask it to fetch a chunk
/// from, and the outbound frame queue for the session to drain.
///
/// Absent for the master node — it is never dispatched a `download` order
/// and has no session to speak to.
#[derive(Constructor, Clone)]
pub struct Client {
    /// A URL template containing the literal `{hash}` placeholder, e.g.
    /// `http://peer.lan:7373/blob/{hash}`.
    pub dl_url_template: String,

    /// The peer session's inbound-to-outbound bridge. Bounded so a slow
    /// consumer can be detected and dropped (spec §9 "per-peer outbound
    /// queue").
    pub outbound: mpsc::Sender<Outbound>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("dl_url_template", &self.dl_url_template).finish()
    }
}

/// One swarm participant: the master itself, or a connected peer.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    is_master: bool,
    hashes: HashSet<ChunkHash>,
    max_concurrent_dls: usize,
    max_concurrent_uls: usize,
    active_downloads: HashMap<(ChunkHash, NodeId), f64>,
    active_uploads_count: usize,
    recent_upload_durations: VecDeque<f64>,
    avg_window_size: usize,
    client: Option<Client>,
    alive: bool,
}

/// A mutation rejected because it would violate one of the node invariants
/// (spec §3 "Invariants").
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("cannot download hash {0} that this node already possesses")]
    AlreadyOwned(ChunkHash),

    #[error("hash {0} would be downloaded from more than one sender at once")]
    DuplicateActiveDownload(ChunkHash),

    #[error("{0} active downloads exceeds max_concurrent_dls ({1})")]
    TooManyDownloads(usize, usize),

    #[error("active download references sender {0} which is not an alive node")]
    UnknownSender(NodeId),

    #[error("max_bandwidth must be non-negative, got {0}")]
    NegativeBandwidth(f64),
}

impl Node {
    #[must_use]
    pub(crate) fn new(
        id: NodeId,
        name: String,
        is_master: bool,
        max_concurrent_dls: usize,
        max_concurrent_uls: usize,
        avg_window_size: usize,
        client: Option<Client>,
    ) -> Self {
        Self {
            id,
            name,
            is_master,
            hashes: HashSet::new(),
            max_concurrent_dls,
            max_concurrent_uls,
            active_downloads: HashMap::new(),
            active_uploads_count: 0,
            recent_upload_durations: VecDeque::with_capacity(avg_window_size),
            avg_window_size: avg_window_size.max(1),
            client,
            alive: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.is_master
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn hashes(&self) -> &HashSet<ChunkHash> {
        &self.hashes
    }

    #[must_use]
    pub fn max_concurrent_dls(&self) -> usize {
        self.max_concurrent_dls
    }

    #[must_use]
    pub fn max_concurrent_uls(&self) -> usize {
        self.max_concurrent_uls
    }

    #[must_use]
    pub fn active_downloads(&self) -> &HashMap<(ChunkHash, NodeId), f64> {
        &self.active_downloads
    }

    #[must_use]
    pub fn active_uploads_count(&self) -> usize {
        self.active_uploads_count
    }

    #[must_use]
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Free download slots, i.e. how many more chunks this node could be
    /// asked to fetch right now.
    #[must_use]
    pub fn free_dl(&self) -> usize {
        self.max_concurrent_dls.saturating_sub(self.active_downloads.len())
    }

    /// Free upload slots, i.e. how many more peers this node could serve a
    /// chunk to right now.
    #[must_use]
    pub fn free_ul(&self) -> usize {
        self.max_concurrent_uls.saturating_sub(self.active_uploads_count)
    }

    /// Hashes in the universe this node neither owns nor is already
    /// downloading.
    #[must_use]
    pub fn needed(&self, universe: &[ChunkHash]) -> Vec<ChunkHash> {
        universe
            .iter()
            .filter(|hash| !self.hashes.contains(*hash) && !self.is_downloading(hash))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_downloading(&self, hash: &ChunkHash) -> bool {
        self.active_downloads.keys().any(|(h, _from)| h == hash)
    }

    /// Restricts `hashes` to the swarm universe and either replaces or
    /// unions them into this node's claimed possession set.
    ///
    /// Returns the subset of `hashes` that falls outside `universe`
    /// (spec: "unknown_hashes"); the caller reports these back via
    /// `rehash`.
    #[must_use]
    pub fn add_hashes(&mut self, hashes: &HashSet<ChunkHash>, clear_first: bool, universe: &HashSet<ChunkHash>) -> HashSet<ChunkHash> {
        let unknown: HashSet<ChunkHash> = hashes.difference(universe).cloned().collect();

        if clear_first {
            self.hashes = hashes.intersection(universe).cloned().collect();
        } else {
            self.hashes.extend(hashes.intersection(universe).cloned());
        }

        unknown
    }

    /// Replaces the active-download set and upload count reported by a
    /// peer, rejecting anything that would violate invariants 3 or 5.
    ///
    /// # Errors
    ///
    /// See [`NodeError`].
    pub fn set_active_transfers(
        &mut self,
        downloads: HashMap<(ChunkHash, NodeId), f64>,
        n_uploads: usize,
        alive_nodes: &HashSet<NodeId>,
    ) -> Result<(), NodeError> {
        if downloads.len() > self.max_concurrent_dls {
            return Err(NodeError::TooManyDownloads(downloads.len(), self.max_concurrent_dls));
        }

        let mut seen_hashes = HashSet::with_capacity(downloads.len());

        for ((hash, from), max_bandwidth) in &downloads {
            if self.hashes.contains(hash) {
                return Err(NodeError::AlreadyOwned(hash.clone()));
            }

            if !seen_hashes.insert(hash.clone()) {
                return Err(NodeError::DuplicateActiveDownload(hash.clone()));
            }

            if !alive_nodes.contains(from) {
                return Err(NodeError::UnknownSender(*from));
            }

            if *max_bandwidth < 0.0 {
                return Err(NodeError::NegativeBandwidth(*max_bandwidth));
            }
        }

        self.active_downloads = downloads;
        self.active_uploads_count = n_uploads;

        Ok(())
    }

    /// Appends recent per-chunk upload durations (seconds) to the bounded
    /// window, dropping non-positive samples.
    pub fn update_transfer_speed(&mut self, durations: &[f64]) {
        for duration in durations {
            if *duration <= 0.0 {
                continue;
            }

            if self.recent_upload_durations.len() >= self.avg_window_size {
                self.recent_upload_durations.pop_front();
            }

            self.recent_upload_durations.push_back(*duration);
        }
    }

    /// The mean of the recent-upload-duration window, or `None` when no
    /// sample has ever been recorded (wire layer renders this as `-1`).
    #[must_use]
    pub fn avg_ul_time(&self) -> Option<f64> {
        if self.recent_upload_durations.is_empty() {
            return None;
        }

        Some(self.recent_upload_durations.iter().sum::<f64>() / self.recent_upload_durations.len() as f64)
    }

    /// Marks the node as no longer participating. Idempotent: calling twice
    /// leaves the node in the same state as calling once.
    pub fn destroy(&mut self) {
        self.alive = false;
        self.hashes.clear();
        self.active_downloads.clear();
        self.active_uploads_count = 0;
        self.client = None;
    }
}
