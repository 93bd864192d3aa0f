//! Benchmarks for cycle enumeration and SCC detection

use archlens::config::CycleDetectionConfig;
use archlens::cycles::{compute_scc_mapping, find_strongly_connected_components, CycleDetector, DirectedGraph};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// `rings` disjoint rings of `ring_len` nodes, each ring linked to the next
fn ring_graph(rings: usize, ring_len: usize) -> DirectedGraph<usize> {
    let mut graph = DirectedGraph::new();
    for r in 0..rings {
        let base = r * ring_len;
        for i in 0..ring_len {
            graph.add_edge(base + i, base + (i + 1) % ring_len);
        }
        if r + 1 < rings {
            graph.add_edge(base, base + ring_len);
        }
    }
    graph
}

/// Every node points at every later node, plus one back edge
fn dense_graph(size: usize) -> DirectedGraph<usize> {
    let mut graph = DirectedGraph::new();
    for i in 0..size {
        for j in (i + 1)..size {
            graph.add_edge(i, j);
        }
    }
    graph.add_edge(size - 1, 0);
    graph
}

fn bench_find_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_cycles");
    for rings in [10, 100, 1000] {
        let graph = ring_graph(rings, 5);
        group.bench_with_input(BenchmarkId::new("rings", rings), &graph, |b, graph| {
            let detector = CycleDetector::new(CycleDetectionConfig::default());
            b.iter(|| detector.find_cycles(black_box(graph)));
        });
    }

    // Bounded enumeration on a graph with exponentially many cycles
    let graph = dense_graph(16);
    group.bench_function("dense_bounded", |b| {
        let detector = CycleDetector::new(CycleDetectionConfig::default().with_max_cycles(100));
        b.iter(|| detector.find_cycles(black_box(&graph)));
    });
    group.finish();
}

fn bench_scc(c: &mut Criterion) {
    let mut group = c.benchmark_group("tarjan");
    for rings in [100, 1000, 10_000] {
        let graph = ring_graph(rings, 5);
        group.bench_with_input(BenchmarkId::new("components", rings), &graph, |b, graph| {
            b.iter(|| find_strongly_connected_components(black_box(graph)));
        });
        group.bench_with_input(BenchmarkId::new("mapping", rings), &graph, |b, graph| {
            b.iter(|| compute_scc_mapping(black_box(graph)));
        });
    }
    group.finish();
}

fn bench_deep_chain(c: &mut Criterion) {
    let mut graph = DirectedGraph::new();
    for i in 0..100_000usize {
        graph.add_edge(i, i + 1);
    }
    c.bench_function("tarjan_deep_chain", |b| {
        b.iter(|| find_strongly_connected_components(black_box(&graph)));
    });
}

criterion_group!(benches, bench_find_cycles, bench_scc, bench_deep_chain);
criterion_main!(benches);
