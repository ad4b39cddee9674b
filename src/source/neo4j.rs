//! Live Neo4j source over the Bolt protocol (feature `neo4j`).
//!
//! One fetch opens one driver handle, runs the fixed traversal, and
//! tears the handle down again, so no connection outlives the fetch that
//! acquired it.

use async_trait::async_trait;
use neo4rs::{Graph, query};

use crate::Value;
use crate::model::{ElementId, PropertyMap};
use crate::snapshot::{RawEntity, RawRelationship, RawTriple};
use crate::source::{GraphSource, SourceConfig};
use crate::{Error, Result};

const TRAVERSAL: &str = "MATCH (a)-[r]->(b) RETURN a, r, b LIMIT $limit";

/// Graph source backed by a Neo4j server.
pub struct Neo4jSource {
    uri: String,
    user: String,
    password: String,
}

impl Neo4jSource {
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        match config {
            SourceConfig::Neo4j { uri, user, password } => {
                Ok(Self::new(uri.clone(), user.clone(), password.clone()))
            }
            other => Err(Error::ConnectionFailure(format!(
                "not a Neo4j source config: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl GraphSource for Neo4jSource {
    type Session = Graph;

    async fn open_session(&self) -> Result<Graph> {
        Graph::new(&self.uri, &self.user, &self.password)
            .await
            .map_err(|e| Error::ConnectionFailure(e.to_string()))
    }

    async fn fetch_triples(&self, session: &mut Graph, limit: usize) -> Result<Vec<RawTriple>> {
        let mut stream = session
            .execute(query(TRAVERSAL).param("limit", limit as i64))
            .await
            .map_err(|e| Error::SourceError(e.to_string()))?;

        let mut triples = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| Error::SourceError(e.to_string()))?
        {
            let a: neo4rs::Node = row
                .get("a")
                .map_err(|e| Error::SourceError(format!("column 'a': {e}")))?;
            let r: neo4rs::Relation = row
                .get("r")
                .map_err(|e| Error::SourceError(format!("column 'r': {e}")))?;
            let b: neo4rs::Node = row
                .get("b")
                .map_err(|e| Error::SourceError(format!("column 'b': {e}")))?;

            triples.push(RawTriple {
                source: raw_entity(&a),
                relationship: RawRelationship {
                    id: Some(ElementId::from(r.id())),
                    rel_type: Some(r.typ().to_string()),
                },
                target: raw_entity(&b),
            });
        }
        Ok(triples)
    }

    async fn close_session(&self, session: Graph) -> Result<()> {
        // Dropping the driver handle releases its connection pool.
        drop(session);
        Ok(())
    }
}

fn raw_entity(node: &neo4rs::Node) -> RawEntity {
    let mut properties = PropertyMap::new();
    for key in node.keys() {
        let value = node
            .get::<serde_json::Value>(key)
            .map(scalarize)
            .unwrap_or(Value::Null);
        properties.insert(key.to_string(), value);
    }
    RawEntity {
        id: Some(ElementId::from(node.id())),
        label: node.labels().first().map(|l| l.to_string()),
        properties,
    }
}

/// Collapse a driver value to the closed scalar union; lists, maps and
/// temporal values are flattened to their JSON string rendering.
fn scalarize(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}
