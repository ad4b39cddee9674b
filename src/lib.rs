//! # graph-explorer — Graph Snapshot Client
//!
//! A small client for graph visualization: run the fixed traversal
//! `(a)-[r]->(b)` against a graph source, de-duplicate the result into a
//! renderer-agnostic snapshot, and publish it for a rendering layer to pick up.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphSource` is the contract between explorer and database
//! 2. **Clean DTOs**: `Entity`, `Relationship`, `Value` cross all boundaries
//! 3. **Builder owns nothing**: triples → `Snapshot` is a pure function
//! 4. **Renderer-agnostic output**: snapshots are plain data, styling and layout
//!    belong to the widget
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_explorer::{Explorer, MemorySource, property_map};
//!
//! # async fn example() -> graph_explorer::Result<()> {
//! let source = MemorySource::new();
//! source.add_node("1", "Person", property_map([("name", "Alice")]));
//! source.add_node("2", "Person", property_map([("name", "Bob")]));
//! source.add_edge("1", "KNOWS", "2");
//!
//! let explorer = Explorer::new(source);
//! let snapshot = explorer.snapshot(50).await?;
//!
//! for entity in &snapshot.entities {
//!     println!("{} ({})", entity.id, entity.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sources
//!
//! | Source | Feature | Description |
//! |--------|---------|-------------|
//! | Memory | (default) | In-memory graph for testing/embedding |
//! | Neo4j | `neo4j` | Connect to external Neo4j via Bolt |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod snapshot;
pub mod source;
pub mod export;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{ElementId, Entity, PropertyMap, Relationship, Value, property_map};

// ============================================================================
// Re-exports: Snapshot building
// ============================================================================

pub use snapshot::{
    MalformedPolicy, RawEntity, RawRelationship, RawTriple, Snapshot, build_snapshot,
};

// ============================================================================
// Re-exports: Sources
// ============================================================================

pub use source::{GraphSource, MemorySource, SourceConfig};
#[cfg(feature = "neo4j")]
pub use source::Neo4jSource;

// ============================================================================
// Top-level Explorer handle
// ============================================================================

/// The primary entry point. An `Explorer` wraps a graph source and turns
/// fetches into published snapshots.
///
/// Fetches may overlap (a user re-triggering with a new limit while an
/// older request is in flight); each fetch carries a sequence number and
/// only the newest completed fetch may publish to [`Explorer::current`].
/// Stale completions are discarded from the published view but still
/// returned to their own caller.
pub struct Explorer<S: GraphSource> {
    source: S,
    on_malformed: MalformedPolicy,
    fetch_seq: AtomicU64,
    published: RwLock<Published>,
}

#[derive(Default)]
struct Published {
    seq: u64,
    snapshot: Option<Arc<Snapshot>>,
}

impl<S: GraphSource> Explorer<S> {
    /// Create an Explorer over the given source. Malformed triples abort
    /// the batch unless [`Explorer::with_malformed_policy`] says otherwise.
    pub fn new(source: S) -> Self {
        Self {
            source,
            on_malformed: MalformedPolicy::Abort,
            fetch_seq: AtomicU64::new(0),
            published: RwLock::new(Published::default()),
        }
    }

    /// Set the skip/abort policy for malformed triples.
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Fetch up to `limit` triples and build a snapshot.
    ///
    /// One session is opened for the fetch and closed again on every exit
    /// path before this returns. On success the snapshot is offered for
    /// publication under this fetch's sequence number.
    pub async fn snapshot(&self, limit: usize) -> Result<Arc<Snapshot>> {
        let seq = self.begin_fetch();
        info!(seq, limit, "fetching graph snapshot");

        let mut session = self.source.open_session().await?;
        let fetched = self.source.fetch_triples(&mut session, limit).await;
        self.source.close_session(session).await?;
        let triples = fetched?;

        debug!(seq, triples = triples.len(), "building snapshot");
        let snapshot = Arc::new(build_snapshot(&triples, self.on_malformed)?);

        self.complete_fetch(seq, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The latest published snapshot — what a rendering layer observes.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.published.read().snapshot.clone()
    }

    /// Access the underlying source (for seeding, advanced use).
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take a sequence number for a new fetch.
    fn begin_fetch(&self) -> u64 {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish if this fetch is still the newest completed one.
    /// Returns false when a newer fetch already published.
    fn complete_fetch(&self, seq: u64, snapshot: Arc<Snapshot>) -> bool {
        let mut published = self.published.write();
        if seq < published.seq {
            warn!(seq, newest = published.seq, "discarding stale fetch result");
            return false;
        }
        info!(
            seq,
            entities = snapshot.entities.len(),
            relationships = snapshot.relationships.len(),
            "publishing snapshot"
        );
        published.seq = seq;
        published.snapshot = Some(snapshot);
        true
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be reached or authenticated. Never retried
    /// by the explorer; retry policy belongs to the caller.
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// A triple came back without a required field.
    #[error("Malformed record at triple {index}: missing {field}")]
    MalformedRecord { index: usize, field: &'static str },

    /// The source reached the server but the query itself failed.
    #[error("Source error: {0}")]
    SourceError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Tests
// ============================================================================
