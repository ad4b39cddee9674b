//! # Snapshot Builder
//!
//! Turns one batch of raw `(source)-[relationship]->(target)` triples into a
//! de-duplicated, renderer-agnostic [`Snapshot`].
//!
//! The builder is a pure function: no state survives between invocations,
//! and a new build pass always produces a fresh snapshot that wholly
//! replaces the previous one in the consuming view. De-duplication is
//! keyed by entity identity with last-write-wins merge, emitted in
//! key-insertion order; relationships pass through one-per-triple with no
//! de-duplication.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ElementId, Entity, PropertyMap, Relationship};
use crate::{Error, Result};

// ============================================================================
// Raw records — what a source hands back, before validation
// ============================================================================

/// An entity endpoint as reported by the source.
///
/// Fields are optional because drivers can hand back incomplete rows;
/// the builder is where missing identity becomes a reported error rather
/// than a silent `undefined`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntity {
    pub id: Option<ElementId>,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

impl RawEntity {
    pub fn new(id: impl Into<ElementId>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A relationship as reported by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRelationship {
    pub id: Option<ElementId>,
    pub rel_type: Option<String>,
}

impl RawRelationship {
    pub fn new(id: impl Into<ElementId>, rel_type: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            rel_type: Some(rel_type.into()),
        }
    }
}

/// One result row of the fixed `(a)-[r]->(b)` traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTriple {
    pub source: RawEntity,
    pub relationship: RawRelationship,
    pub target: RawEntity,
}

impl RawTriple {
    pub fn new(source: RawEntity, relationship: RawRelationship, target: RawEntity) -> Self {
        Self { source, relationship, target }
    }
}

// ============================================================================
// Malformed-record policy
// ============================================================================

/// What to do when a triple is missing a required field.
///
/// The builder never decides this on its own: it is caller
/// configuration, carried down from [`crate::Explorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the whole batch on the first malformed triple.
    #[default]
    Abort,
    /// Drop the malformed triple (its relationship and both endpoint
    /// records) and keep processing the rest.
    Skip,
}

// ============================================================================
// Snapshot
// ============================================================================

/// The output of one build pass: ordered, de-duplicated entities plus
/// all relationships in input order.
///
/// Immutable once built. A later fetch produces an entirely new
/// snapshot; there is no incremental merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// Look up an entity by identity.
    pub fn entity(&self, id: &ElementId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == *id)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Build a [`Snapshot`] from one batch of raw triples.
///
/// Entities are recorded under their identity key in first-seen order;
/// a later occurrence of the same identity overwrites the earlier label
/// and properties in place (last-write-wins), exactly like an
/// insertion-ordered map accumulation. Relationships are emitted
/// one-per-triple with no de-duplication.
///
/// An empty batch yields an empty snapshot. A triple missing a source
/// identity, target identity, relationship identity, or relationship
/// type is malformed: [`MalformedPolicy::Abort`] returns
/// [`Error::MalformedRecord`] naming the triple index and field,
/// [`MalformedPolicy::Skip`] drops that triple and continues.
pub fn build_snapshot(triples: &[RawTriple], on_malformed: MalformedPolicy) -> Result<Snapshot> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut slot_by_id: HashMap<ElementId, usize> = HashMap::new();
    let mut relationships: Vec<Relationship> = Vec::with_capacity(triples.len());

    for (index, triple) in triples.iter().enumerate() {
        let row = match validate(index, triple) {
            Ok(row) => row,
            Err(err) => match on_malformed {
                MalformedPolicy::Abort => return Err(err),
                MalformedPolicy::Skip => {
                    warn!(triple = index, %err, "skipping malformed triple");
                    continue;
                }
            },
        };

        record_entity(&mut entities, &mut slot_by_id, row.source_id.clone(), &triple.source);
        record_entity(&mut entities, &mut slot_by_id, row.target_id.clone(), &triple.target);

        relationships.push(Relationship {
            id: row.rel_id,
            from: row.source_id,
            to: row.target_id,
            rel_type: row.rel_type.to_owned(),
        });
    }

    Ok(Snapshot { entities, relationships })
}

/// The required fields of one triple, proven present.
struct ValidRow<'a> {
    source_id: ElementId,
    target_id: ElementId,
    rel_id: ElementId,
    rel_type: &'a str,
}

fn validate<'a>(index: usize, triple: &'a RawTriple) -> Result<ValidRow<'a>> {
    let field = |field| Error::MalformedRecord { index, field };
    Ok(ValidRow {
        source_id: triple.source.id.clone().ok_or_else(|| field("source.id"))?,
        target_id: triple.target.id.clone().ok_or_else(|| field("target.id"))?,
        rel_id: triple.relationship.id.clone().ok_or_else(|| field("relationship.id"))?,
        rel_type: triple
            .relationship
            .rel_type
            .as_deref()
            .ok_or_else(|| field("relationship.type"))?,
    })
}

/// Upsert one endpoint into the ordered entity list.
///
/// First sight of an identity appends; a repeat overwrites the existing
/// slot's label and properties, keeping the original position.
fn record_entity(
    entities: &mut Vec<Entity>,
    slot_by_id: &mut HashMap<ElementId, usize>,
    id: ElementId,
    raw: &RawEntity,
) {
    let label = raw.label.clone().unwrap_or_default();
    match slot_by_id.get(&id) {
        Some(&slot) => {
            entities[slot].label = label;
            entities[slot].properties = raw.properties.clone();
        }
        None => {
            slot_by_id.insert(id.clone(), entities.len());
            entities.push(Entity {
                id,
                label,
                properties: raw.properties.clone(),
                size: None,
                color: None,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
