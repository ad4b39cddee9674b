//! # Graph Source Trait
//!
//! The contract between the explorer and whatever executes the traversal
//! query. A source knows exactly one shape:
//!
//! ```text
//! MATCH (a)-[r]->(b) RETURN a, r, b LIMIT n
//! ```
//!
//! and hands back raw triples for the snapshot builder to validate.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemorySource` | `memory` | In-memory graph for testing/embedding |
//! | `Neo4jSource` | `neo4j` | Live Neo4j over Bolt (feature `neo4j`) |

pub mod memory;
#[cfg(feature = "neo4j")]
pub mod neo4j;

use async_trait::async_trait;

use crate::Result;
use crate::snapshot::RawTriple;

pub use memory::MemorySource;
#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jSource;

// ============================================================================
// Source Configuration
// ============================================================================

/// Configuration for connecting to a graph source.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// In-memory (no external service)
    Memory,

    /// Neo4j over the Bolt protocol
    #[cfg(feature = "neo4j")]
    Neo4j {
        uri: String,
        user: String,
        password: String,
    },
}

#[cfg(feature = "neo4j")]
impl SourceConfig {
    /// Read Neo4j connection settings from `NEO4J_URI`, `NEO4J_USERNAME`
    /// and `NEO4J_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| crate::Error::ConnectionFailure(format!("{name} is not set")))
        };
        Ok(SourceConfig::Neo4j {
            uri: var("NEO4J_URI")?,
            user: var("NEO4J_USERNAME")?,
            password: var("NEO4J_PASSWORD")?,
        })
    }
}

// ============================================================================
// GraphSource Trait
// ============================================================================

/// The query-executor contract.
///
/// Sessions are explicit so the caller can guarantee the
/// acquire → fetch → release sequence on every exit path. One fetch uses
/// exactly one session; [`crate::Explorer`] closes it whether the fetch
/// succeeded, failed, or came back empty.
#[async_trait]
pub trait GraphSource: Send + Sync + 'static {
    /// The per-fetch session/connection handle for this source.
    type Session: Send;

    /// Acquire a session. Reaching or authenticating against the source
    /// fails with [`crate::Error::ConnectionFailure`].
    async fn open_session(&self) -> Result<Self::Session>;

    /// Run the fixed traversal, returning at most `limit` triples.
    async fn fetch_triples(
        &self,
        session: &mut Self::Session,
        limit: usize,
    ) -> Result<Vec<RawTriple>>;

    /// Release a session. Must be called on every exit path.
    async fn close_session(&self, session: Self::Session) -> Result<()>;
}
