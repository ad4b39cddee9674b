//! End-to-end tests for the full fetch pipeline.
//!
//! Each test exercises: open session -> fetch triples -> close session ->
//! build snapshot -> publish, against MemorySource via `Explorer::snapshot()`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use graph_explorer::{
    ElementId, Entity, Error, Explorer, GraphSource, MalformedPolicy, MemorySource, RawEntity,
    RawRelationship, RawTriple, Relationship, Result, property_map,
};

fn seeded_source() -> MemorySource {
    let source = MemorySource::new();
    source.add_node("1", "Person", property_map([("name", "Alice")]));
    source.add_node("2", "Person", property_map([("name", "Bob")]));
    source.add_node("3", "Movie", property_map([("title", "Heat")]));
    source.add_edge("1", "KNOWS", "2");
    source.add_edge("1", "LIKES", "3");
    source.add_edge("2", "LIKES", "3");
    source
}

// ============================================================================
// 1. Fetch, de-duplicate, publish
// ============================================================================

#[tokio::test]
async fn test_fetch_and_build() {
    let explorer = Explorer::new(seeded_source());

    let snapshot = explorer.snapshot(50).await.unwrap();

    // Entity "1" and "3" each appear in two triples but are recorded once,
    // in first-seen order.
    let ids: Vec<_> = snapshot.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(snapshot.relationships.len(), 3);
    assert_eq!(
        snapshot.relationships[0],
        Relationship::new("1", "1", "2", "KNOWS")
    );

    // The fetch published what it returned.
    assert_eq!(explorer.current().unwrap(), snapshot);
}

// ============================================================================
// 2. Limit flows through to the source
// ============================================================================

#[tokio::test]
async fn test_dynamic_limit() {
    let explorer = Explorer::new(seeded_source());

    let small = explorer.snapshot(1).await.unwrap();
    assert_eq!(small.relationships.len(), 1);
    assert_eq!(small.entities.len(), 2);

    let full = explorer.snapshot(50).await.unwrap();
    assert_eq!(full.relationships.len(), 3);

    // The larger (newer) fetch replaced the published snapshot wholesale.
    assert_eq!(explorer.current().unwrap(), full);
}

// ============================================================================
// 3. Empty graph is a valid empty snapshot, not an error
// ============================================================================

#[tokio::test]
async fn test_empty_result() {
    let explorer = Explorer::new(MemorySource::new());
    let snapshot = explorer.snapshot(50).await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(explorer.source().open_sessions(), 0);
}

// ============================================================================
// 4. Session cleanup on every exit path
// ============================================================================

/// A source whose fetch always fails, to prove the session still closes.
struct FailingSource {
    inner: MemorySource,
    closes: AtomicU64,
}

#[async_trait]
impl GraphSource for FailingSource {
    type Session = <MemorySource as GraphSource>::Session;

    async fn open_session(&self) -> Result<Self::Session> {
        self.inner.open_session().await
    }

    async fn fetch_triples(
        &self,
        _session: &mut Self::Session,
        _limit: usize,
    ) -> Result<Vec<RawTriple>> {
        Err(Error::SourceError("query failed".into()))
    }

    async fn close_session(&self, session: Self::Session) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close_session(session).await
    }
}

#[tokio::test]
async fn test_session_closed_when_fetch_fails() {
    let source = FailingSource { inner: MemorySource::new(), closes: AtomicU64::new(0) };
    let explorer = Explorer::new(source);

    let err = explorer.snapshot(50).await.unwrap_err();
    assert!(matches!(err, Error::SourceError(_)));

    assert_eq!(explorer.source().closes.load(Ordering::SeqCst), 1);
    assert_eq!(explorer.source().inner.open_sessions(), 0);
    assert!(explorer.current().is_none());
}

// ============================================================================
// 5. Malformed triples: abort by default, skip when configured
// ============================================================================

/// A source that returns a canned batch with one malformed triple.
struct CannedSource(Vec<RawTriple>);

#[async_trait]
impl GraphSource for CannedSource {
    type Session = ();

    async fn open_session(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch_triples(&self, _session: &mut (), limit: usize) -> Result<Vec<RawTriple>> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }

    async fn close_session(&self, _session: ()) -> Result<()> {
        Ok(())
    }
}

fn batch_with_malformed_second_triple() -> Vec<RawTriple> {
    vec![
        RawTriple::new(
            RawEntity::new("1", "Person").with_property("name", "Alice"),
            RawRelationship::new("10", "KNOWS"),
            RawEntity::new("2", "Person").with_property("name", "Bob"),
        ),
        RawTriple::new(
            RawEntity::new("2", "Person"),
            RawRelationship::new("11", "KNOWS"),
            RawEntity { id: None, label: Some("Person".into()), ..Default::default() },
        ),
    ]
}

#[tokio::test]
async fn test_malformed_aborts_by_default() {
    let explorer = Explorer::new(CannedSource(batch_with_malformed_second_triple()));

    let err = explorer.snapshot(50).await.unwrap_err();
    match err {
        Error::MalformedRecord { index, field } => {
            assert_eq!(index, 1);
            assert_eq!(field, "target.id");
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
    // No partial snapshot is published on abort.
    assert!(explorer.current().is_none());
}

#[tokio::test]
async fn test_malformed_skipped_when_configured() {
    let explorer = Explorer::new(CannedSource(batch_with_malformed_second_triple()))
        .with_malformed_policy(MalformedPolicy::Skip);

    let snapshot = explorer.snapshot(50).await.unwrap();

    assert_eq!(snapshot.relationships.len(), 1);
    assert_eq!(snapshot.relationships[0].id, ElementId::from("10"));
    let ids: Vec<_> = snapshot.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

// ============================================================================
// 6. Last-write-wins across triples within one fetch
// ============================================================================

#[tokio::test]
async fn test_last_write_wins_within_batch() {
    let batch = vec![
        RawTriple::new(
            RawEntity::new("1", "Person").with_property("name", "Alice"),
            RawRelationship::new("10", "KNOWS"),
            RawEntity::new("2", "Person"),
        ),
        RawTriple::new(
            RawEntity::new("1", "Person").with_property("name", "Alice Updated"),
            RawRelationship::new("11", "KNOWS"),
            RawEntity::new("2", "Person"),
        ),
    ];
    let explorer = Explorer::new(CannedSource(batch));

    let snapshot = explorer.snapshot(50).await.unwrap();

    let alice: Vec<&Entity> = snapshot
        .entities
        .iter()
        .filter(|e| e.id == ElementId::from("1"))
        .collect();
    assert_eq!(alice.len(), 1);
    assert_eq!(
        alice[0].properties,
        property_map([("name", "Alice Updated")])
    );
}

// ============================================================================
// 7. Renderer payload round trip through the public surface
// ============================================================================

#[tokio::test]
async fn test_render_payload_from_fetch() {
    let explorer = Explorer::new(seeded_source());
    let snapshot = explorer.snapshot(50).await.unwrap();

    let payload = graph_explorer::export::render_payload(&snapshot);
    assert_eq!(payload["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(payload["rels"].as_array().unwrap().len(), 3);
    assert_eq!(payload["rels"][0]["type"], "KNOWS");
}
