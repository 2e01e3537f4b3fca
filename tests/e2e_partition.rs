//! End-to-end tests for hop distances and partitioned adjacency tensors.

use ndarray::Axis;
use skeleton_graph::{Error, GraphConfig, PartitionStrategy, SkeletonGraph};

const EPS: f64 = 1e-9;

fn ntu() -> SkeletonGraph {
    SkeletonGraph::new(GraphConfig::default()).unwrap()
}

// ============================================================================
// Hop distances
// ============================================================================

#[test]
fn test_hop_symmetric_zero_diagonal() {
    let graph = ntu();
    for l in 0..graph.levels() {
        let hop = graph.hop_distances(l).unwrap();
        assert!(hop.is_symmetric(), "level {l}");
        for i in 0..hop.num_node() {
            assert_eq!(hop.get(i, i), Some(0), "level {l} node {i}");
        }
    }
}

#[test]
fn test_hop_bounded_by_max_hop() {
    let graph = ntu();
    let hop = graph.hop_distances(0).unwrap();
    assert_eq!(hop.max_hop(), 1);
    // hand tip (21) to spine (20) is far beyond one hop
    assert_eq!(hop.get(21, 20), None);
    assert_eq!(hop.get(1, 20), Some(1));
}

// ============================================================================
// Spatial partition
// ============================================================================

#[test]
fn test_three_slices_per_level() {
    let graph = ntu();
    assert_eq!(graph.spatial_kernel_sizes(), vec![3, 3, 3, 3]);
    for l in 0..graph.levels() {
        let n = graph.num_node(l).unwrap();
        assert_eq!(graph.adjacency_tensor(l).unwrap().shape(), &[3, n, n]);
    }
}

#[test]
fn test_slices_reconstruct_normalized_adjacency() {
    let graph = ntu();
    for l in 0..graph.levels() {
        let total = graph.adjacency_tensor(l).unwrap().sum_axis(Axis(0));
        let normalized = graph.normalized_adjacency(l).unwrap();
        for (x, y) in total.iter().zip(normalized.iter()) {
            assert!((x - y).abs() < EPS, "level {l}: {x} != {y}");
        }
    }
}

#[test]
fn test_normalized_columns_sum_to_one() {
    let graph = ntu();
    for l in 0..graph.levels() {
        let normalized = graph.normalized_adjacency(l).unwrap();
        for (i, col) in normalized.columns().into_iter().enumerate() {
            let sum = col.sum();
            assert!((sum - 1.0).abs() < EPS, "level {l} column {i} sums to {sum}");
        }
    }
}

#[test]
fn test_slices_do_not_overlap() {
    let graph = ntu();
    for l in 0..graph.levels() {
        let a = graph.adjacency_tensor(l).unwrap();
        let n = graph.num_node(l).unwrap();
        for j in 0..n {
            for i in 0..n {
                let populated = (0..3).filter(|&k| a[[k, j, i]] != 0.0).count();
                assert!(populated <= 1, "level {l} ({j}, {i}) in {populated} slices");
            }
        }
    }
}

#[test]
fn test_hop_zero_slice_is_diagonal() {
    let graph = ntu();
    let a = graph.adjacency_tensor(1).unwrap();
    let root = a.index_axis(Axis(0), 0);
    for ((j, i), &w) in root.indexed_iter() {
        if j == i {
            assert!(w > 0.0);
        } else {
            assert_eq!(w, 0.0);
        }
    }
}

#[test]
fn test_level_one_center_row_is_centrifugal() {
    let graph = ntu();
    let a = graph.adjacency_tensor(1).unwrap();
    // the center (10) is closer to itself than any neighbor
    for i in [0, 1, 2, 4] {
        assert!(a[[2, 10, i]] > 0.0);
        assert_eq!(a[[1, 10, i]], 0.0);
    }
    assert!((a[[2, 10, 0]] - 0.25).abs() < EPS);
    assert!((a[[2, 10, 1]] - 0.5).abs() < EPS);
}

// ============================================================================
// Other strategies
// ============================================================================

#[test]
fn test_uniform_strategy() {
    let graph = SkeletonGraph::new(GraphConfig::default().with_strategy(PartitionStrategy::Uniform)).unwrap();
    assert_eq!(graph.spatial_kernel_sizes(), vec![1, 1, 1, 1]);
    let a = graph.adjacency_tensor(0).unwrap();
    assert_eq!(a.index_axis(Axis(0), 0), *graph.normalized_adjacency(0).unwrap());
}

#[test]
fn test_distance_strategy() {
    let config = GraphConfig::default().with_max_hop(2).with_strategy(PartitionStrategy::Distance);
    let graph = SkeletonGraph::new(config).unwrap();
    assert_eq!(graph.spatial_kernel_sizes(), vec![3, 3, 3, 3]);

    let total = graph.adjacency_tensor(0).unwrap().sum_axis(Axis(0));
    for (x, y) in total.iter().zip(graph.normalized_adjacency(0).unwrap().iter()) {
        assert!((x - y).abs() < EPS);
    }
}

#[test]
fn test_two_hop_spatial() {
    let graph = SkeletonGraph::new(GraphConfig::default().with_max_hop(2)).unwrap();
    assert_eq!(graph.spatial_kernel_sizes(), vec![5, 5, 5, 5]);
    assert_eq!(graph.hop_distances(0).unwrap().get(0, 20), Some(2));
}

// ============================================================================
// Parameter validation
// ============================================================================

#[test]
fn test_zero_dilation() {
    let result = SkeletonGraph::new(GraphConfig::default().with_dilation(0));
    assert!(matches!(result, Err(Error::EmptyHopSet { max_hop: 1, dilation: 0 })));
}

#[test]
fn test_uneven_dilation() {
    let result = SkeletonGraph::new(GraphConfig::default().with_max_hop(3).with_dilation(2));
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[test]
fn test_level_out_of_range() {
    let graph = ntu();
    assert!(matches!(graph.adjacency_tensor(4), Err(Error::InvalidLevel { level: 4, levels: 4 })));
}
