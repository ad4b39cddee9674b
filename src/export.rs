//! Renderer handoff — serialize a snapshot as the plain JSON document a
//! visualization widget consumes.
//!
//! ```text
//! Snapshot → render_payload() → {"nodes": [...], "rels": [...]}
//!   → feed to any nodes/rels graph widget
//! ```
//!
//! The payload is plain data: ids, labels, properties, and whatever
//! presentation attributes a styling pass filled in. Nothing here knows
//! or assumes how the widget lays out or colors elements.

use std::io::Write;

use serde_json::json;

use crate::Result;
use crate::snapshot::Snapshot;

/// Render a snapshot as the `{nodes, rels}` widget payload.
pub fn render_payload(snapshot: &Snapshot) -> serde_json::Value {
    json!({
        "nodes": snapshot.entities,
        "rels": snapshot.relationships,
    })
}

/// Write the widget payload as pretty-printed JSON.
pub fn write_render_payload(snapshot: &Snapshot, writer: &mut dyn Write) -> Result<()> {
    let payload = render_payload(snapshot);
    serde_json::to_writer_pretty(&mut *writer, &payload)
        .map_err(|e| crate::Error::Io(std::io::Error::other(e)))?;
    writeln!(writer)?;
    Ok(())
}
