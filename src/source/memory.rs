//! In-memory graph source.
//!
//! This is the reference implementation of `GraphSource`. It holds a
//! small property graph behind an RwLock and answers the fixed traversal
//! by walking its relationship list in insertion order.
//!
//! Use this source for:
//! - Testing the snapshot builder and explorer without a database
//! - Embedding the explorer in applications that ship their own data

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::{ElementId, PropertyMap};
use crate::snapshot::{RawEntity, RawRelationship, RawTriple};
use crate::source::GraphSource;
use crate::Result;

// ============================================================================
// MemorySource
// ============================================================================

/// In-memory property graph source.
#[derive(Clone, Default)]
pub struct MemorySource {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    nodes: RwLock<HashMap<ElementId, StoredNode>>,
    /// (rel id, source, type, target) in insertion order.
    edges: RwLock<Vec<StoredEdge>>,
    next_id: AtomicU64,
    open_sessions: AtomicU64,
}

struct StoredNode {
    label: String,
    properties: PropertyMap,
}

struct StoredEdge {
    id: ElementId,
    from: ElementId,
    rel_type: String,
    to: ElementId,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node.
    pub fn add_node(
        &self,
        id: impl Into<ElementId>,
        label: impl Into<String>,
        properties: PropertyMap,
    ) {
        self.inner.nodes.write().insert(
            id.into(),
            StoredNode { label: label.into(), properties },
        );
    }

    /// Insert a directed edge with a generated identity.
    pub fn add_edge(
        &self,
        from: impl Into<ElementId>,
        rel_type: impl Into<String>,
        to: impl Into<ElementId>,
    ) -> ElementId {
        let id = ElementId::from(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.inner.edges.write().push(StoredEdge {
            id: id.clone(),
            from: from.into(),
            rel_type: rel_type.into(),
            to: to.into(),
        });
        id
    }

    /// Number of sessions currently open (used to verify cleanup).
    pub fn open_sessions(&self) -> u64 {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    fn endpoint(&self, id: &ElementId) -> RawEntity {
        match self.inner.nodes.read().get(id) {
            Some(node) => RawEntity {
                id: Some(id.clone()),
                label: Some(node.label.clone()),
                properties: node.properties.clone(),
            },
            // Dangling edge endpoint: identity is known, the rest is not.
            None => RawEntity {
                id: Some(id.clone()),
                label: None,
                properties: PropertyMap::new(),
            },
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Marker session. Closing consumes it, so a closed session cannot be
/// fetched from again; the open count exists so tests can assert that
/// every session opened by a fetch was closed.
pub struct MemorySession(());

#[async_trait]
impl GraphSource for MemorySource {
    type Session = MemorySession;

    async fn open_session(&self) -> Result<MemorySession> {
        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(MemorySession(()))
    }

    async fn fetch_triples(
        &self,
        _session: &mut MemorySession,
        limit: usize,
    ) -> Result<Vec<RawTriple>> {
        let edges = self.inner.edges.read();
        Ok(edges
            .iter()
            .take(limit)
            .map(|edge| RawTriple {
                source: self.endpoint(&edge.from),
                relationship: RawRelationship::new(edge.id.clone(), edge.rel_type.clone()),
                target: self.endpoint(&edge.to),
            })
            .collect())
    }

    async fn close_session(&self, session: MemorySession) -> Result<()> {
        drop(session);
        self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
