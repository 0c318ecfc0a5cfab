//! Benchmark pattern matching on deep paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use padnav_pattern::{matches, HierarchicalPath, Pattern};

fn deep_path(depth: usize) -> HierarchicalPath {
    let mut text = String::from("Main:Window");
    for i in 0..depth {
        text.push_str(&format!(" > Panel{}:Grid", i));
    }
    text.push_str(" > Save:Button[Save]");
    HierarchicalPath::parse(&text).expect("valid path")
}

fn bench_matching(c: &mut Criterion) {
    let path = deep_path(32);
    let bridged = Pattern::parse("Main:Window > ** > Save:Button").expect("valid pattern");
    let miss = Pattern::parse("** > ** > ** > Open:Button").expect("valid pattern");

    c.bench_function("bridged_hit_depth_32", |b| {
        b.iter(|| matches(black_box(&path), black_box(&bridged)))
    });

    c.bench_function("stacked_wildcards_miss_depth_32", |b| {
        b.iter(|| matches(black_box(&path), black_box(&miss)))
    });
}

criterion_group!(benches, bench_matching);
criterion_main!(benches);
