use crate::collector::CollectorNode;
use anyhow::Result;
use serde_json::{Map, Value};
use std::io::Write;

/// Assemble the current report: a fresh top-level object handed to the root
/// node, which merges its fields and nests one object per stratum key.
/// Read-only with respect to accumulated state, so snapshots can be taken
/// between any two records.
pub fn assemble(root: &CollectorNode) -> Value {
    let mut out = Map::new();
    root.append_report(&mut out);
    Value::Object(out)
}

/// Render one compact JSON report line for the tree's current state.
pub fn write_snapshot<W: Write>(writer: &mut W, root: &CollectorNode) -> Result<()> {
    let report = assemble(root);
    serde_json::to_writer(&mut *writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
