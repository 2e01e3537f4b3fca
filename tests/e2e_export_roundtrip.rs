//! Export round-trip test: build → dump → verify the dump → re-import.
//!
//! Covers both export formats:
//!   SkeletonGraph → export_json() → import_json() → same topology and tensors
//!   SkeletonGraph → export_dump() → EDGE / ABSORB / A record counts

use pretty_assertions::assert_eq;
use skeleton_graph::export::{export_dump, export_json, import_json};
use skeleton_graph::{Error, GraphConfig, SkeletonGraph};

fn ntu() -> SkeletonGraph {
    SkeletonGraph::new(GraphConfig::default()).unwrap()
}

fn dump(graph: &SkeletonGraph) -> String {
    let mut buf = Vec::new();
    export_dump(graph, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_json_round_trip_topology() {
    let graph = ntu();
    let mut buf = Vec::new();
    export_json(&graph, &mut buf).unwrap();
    let restored = import_json(std::str::from_utf8(&buf).unwrap()).unwrap();

    assert_eq!(restored.config(), graph.config());
    assert_eq!(restored.levels(), graph.levels());
    for l in 0..graph.levels() {
        assert_eq!(restored.level(l).unwrap(), graph.level(l).unwrap());
        assert_eq!(restored.hop_distances(l).unwrap(), graph.hop_distances(l).unwrap());
    }
}

#[test]
fn test_json_round_trip_tensors() {
    let graph = ntu();
    let mut buf = Vec::new();
    export_json(&graph, &mut buf).unwrap();
    let restored = import_json(std::str::from_utf8(&buf).unwrap()).unwrap();

    for l in 0..graph.levels() {
        let a = graph.adjacency_tensor(l).unwrap();
        let b = restored.adjacency_tensor(l).unwrap();
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}

#[test]
fn test_import_rejects_garbage() {
    assert!(import_json("{\"config\": 3}").is_err());
}

/// Exported document as a JSON value, for tampering.
fn exported_value(graph: &SkeletonGraph) -> serde_json::Value {
    let mut buf = Vec::new();
    export_json(graph, &mut buf).unwrap();
    serde_json::from_slice(&buf).unwrap()
}

#[test]
fn test_import_rejects_mapping_on_base_level() {
    let mut doc = exported_value(&ntu());
    let mapping = doc["levels"][1]["node_mapping"].take();
    doc["levels"][0]["node_mapping"] = mapping;
    let result = import_json(&doc.to_string());
    assert!(matches!(result, Err(Error::InvalidSkeleton(_))));
}

#[test]
fn test_import_rejects_truncated_adjacency() {
    let mut doc = exported_value(&ntu());
    if let Some(adjacency) = doc["adjacency"].as_array_mut() {
        adjacency.truncate(1);
    }
    let result = import_json(&doc.to_string());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[test]
fn test_import_rejects_mismatched_tensor() {
    let graph = ntu();
    let mut doc = exported_value(&graph);
    // level 2 tensors carried over onto level 1
    let level_two = doc["adjacency"][2].clone();
    doc["adjacency"][1] = level_two;
    let result = import_json(&doc.to_string());
    assert!(matches!(result, Err(Error::InvalidSkeleton(_))));
}

#[test]
fn test_imported_graph_validates() {
    let graph = ntu();
    assert!(graph.validate().is_ok());
    let mut buf = Vec::new();
    export_json(&graph, &mut buf).unwrap();
    let restored = import_json(std::str::from_utf8(&buf).unwrap()).unwrap();
    assert!(restored.validate().is_ok());
    assert!(matches!(
        restored.upsample(0, ndarray::Array2::<f64>::zeros((11, 2)).view()),
        Err(Error::InvalidLevel { level: 0, .. })
    ));
}

#[test]
fn test_dump_header() {
    let text = dump(&ntu());
    let header: Vec<&str> = text.lines().take(3).collect();
    assert_eq!(
        header,
        vec![
            "// skeleton-graph hierarchy dump",
            "// Levels: 4",
            "// Strategy: spatial, max_hop: 1, dilation: 1",
        ]
    );
    assert!(text.contains("// Level 0: 25 nodes, center 20, 3 slices"));
    assert!(text.contains("// Level 3: 1 nodes, center 0, 3 slices"));
}

#[test]
fn test_dump_edge_count() {
    let text = dump(&ntu());
    let edges = text.lines().filter(|l| l.starts_with("EDGE ")).count();
    // (bones + self-loops) per level: 24+25, 10+11, 5+5, 0+1
    assert_eq!(edges, 49 + 21 + 10 + 1);
}

#[test]
fn test_dump_absorb_records() {
    let text = dump(&ntu());
    let absorb = text.lines().filter(|l| l.starts_with("ABSORB ")).count();
    assert_eq!(absorb, 11 + 5 + 1);
    assert!(text.contains("ABSORB 1 0 <- [0, 1, 12, 16]"));
    assert!(text.contains("ABSORB 3 0 <- [0, 1, 2, 3, 4]"));
}

#[test]
fn test_dump_weight_records() {
    let text = dump(&ntu());
    let base = text.lines().filter(|l| l.starts_with("A 0 ")).count();
    assert_eq!(base, 25 + 40 + 8);
    assert!(text.contains("A 0 0 20 20 0.2"));
    assert!(text.contains("A 3 0 0 0 1"));
}
