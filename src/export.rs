//! Hierarchy export: serialize a built graph for other runtimes.
//!
//! Two formats:
//!
//! ```text
//! SkeletonGraph → export_json() → JSON document → import_json() → SkeletonGraph
//! SkeletonGraph → export_dump() → line-oriented text (EDGE / ABSORB / A records)
//! ```
//!
//! The JSON form carries everything, including the config and every tensor.
//! The text dump lists only nonzero adjacency weights and is meant for
//! inspection and diffing.

use std::io::Write;
use ndarray::Axis;
use crate::{Result, SkeletonGraph};

/// Write the whole graph as a JSON document.
pub fn export_json(graph: &SkeletonGraph, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, graph)?;
    writeln!(writer)?;
    Ok(())
}

/// Read a graph written by [`export_json`]. The document is rejected unless
/// it passes [`SkeletonGraph::validate`].
pub fn import_json(json: &str) -> Result<SkeletonGraph> {
    let graph: SkeletonGraph = serde_json::from_str(json)?;
    graph.validate()?;
    Ok(graph)
}

/// Write a line-oriented text dump of every level.
pub fn export_dump(graph: &SkeletonGraph, writer: &mut dyn Write) -> Result<()> {
    let config = graph.config();

    // Header
    writeln!(writer, "// skeleton-graph hierarchy dump")?;
    writeln!(writer, "// Levels: {}", graph.levels())?;
    writeln!(
        writer,
        "// Strategy: {}, max_hop: {}, dilation: {}",
        serde_json::to_string(&config.strategy)?.trim_matches('"'),
        config.max_hop,
        config.dilation,
    )?;

    for l in 0..graph.levels() {
        let level = graph.level(l)?;
        let tensor = graph.adjacency_tensor(l)?;

        writeln!(writer)?;
        writeln!(
            writer,
            "// Level {}: {} nodes, center {}, {} slices",
            l,
            level.num_node,
            level.center,
            tensor.shape()[0],
        )?;

        for &(u, v) in &level.edges {
            writeln!(writer, "EDGE {l} {u} {v}")?;
        }

        if let Some(mapping) = &level.node_mapping {
            for (coarse, set) in mapping.absorbed.iter().enumerate() {
                writeln!(writer, "ABSORB {l} {coarse} <- {}", format_ids(set))?;
            }
        }

        for (k, slice) in tensor.axis_iter(Axis(0)).enumerate() {
            for ((j, i), &w) in slice.indexed_iter() {
                if w != 0.0 {
                    writeln!(writer, "A {l} {k} {j} {i} {}", format_weight(w))?;
                }
            }
        }
    }
    Ok(())
}

fn format_ids(ids: &[usize]) -> String {
    let inner: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// Six decimals, trailing zeros trimmed.
fn format_weight(w: f64) -> String {
    let s = format!("{w:.6}");
    let s = s.trim_end_matches('0');
    s.strip_suffix('.').unwrap_or(s).to_string()
}
