//! Benchmarks for sequence-dependent route packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use u_loading_core::{Item, Node, SolverConfig, VehicleType};
use u_loading_packing::SequencePacker;

fn route_of(stops: usize, items_per_stop: usize) -> Vec<Arc<Node>> {
    let mut sequence = vec![Arc::new(Node::depot(0, "start_point"))];
    for s in 0..stops {
        let items = (0..items_per_stop)
            .map(|i| {
                Arc::new(Item::new(
                    format!("B{}-{}", s, i),
                    300.0 + (i % 3) as f64 * 100.0,
                    300.0,
                    200.0,
                    5.0,
                ))
            })
            .collect();
        sequence.push(Arc::new(Node::customer(s + 1, format!("P{:02}", s + 1), false, items)));
    }
    sequence.push(Arc::new(Node::depot(stops + 1, "end_point")));
    sequence
}

fn packer_benchmark(c: &mut Criterion) {
    let vehicle = VehicleType::new("CT20", 4200.0, 2400.0, 2400.0, 20_000.0);
    let sequence = route_of(4, 5);

    let uncached = SequencePacker::new(&SolverConfig::default().with_cache(false));
    c.bench_function("pack_route_4_stops_20_boxes", |b| {
        b.iter(|| black_box(uncached.pack(black_box(&vehicle), black_box(&sequence))))
    });

    let cached = SequencePacker::new(&SolverConfig::default());
    cached.pack(&vehicle, &sequence);
    c.bench_function("pack_route_cache_hit", |b| {
        b.iter(|| black_box(cached.pack(black_box(&vehicle), black_box(&sequence))))
    });
}

criterion_group!(benches, packer_benchmark);
criterion_main!(benches);
