use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{DVec3, IVec3};
use lattice::{BlockAccess, BlockGrid, Bounds, Material, MaterialPattern, Region};
use std::sync::Arc;

fn bench_cuboid_blocks(c: &mut Criterion) {
    // Fresh region each iteration, otherwise the cached block list is measured
    let bounds = Bounds::from_blocks(IVec3::ZERO, IVec3::splat(31));

    c.bench_function("cuboid_blocks_32k", |b| {
        b.iter(|| {
            let region = Region::cuboid(black_box(bounds));
            black_box(region.blocks().map(<[IVec3]>::len))
        })
    });
}

fn bench_composite_contains(c: &mut Criterion) {
    let outer = Arc::new(Region::cuboid(Bounds::from_blocks(IVec3::ZERO, IVec3::splat(63))));
    let holes: Vec<_> = (0..8)
        .map(|i| {
            let corner = IVec3::splat(i * 8);
            Arc::new(Region::cuboid(Bounds::from_blocks(corner, corner + IVec3::splat(3))))
        })
        .collect();
    let region = Region::complement(outer, holes);

    c.bench_function("composite_contains", |b| {
        b.iter(|| {
            let mut inside = 0_u32;
            for i in 0..1024 {
                let p = DVec3::splat(f64::from(i % 64));
                inside += u32::from(region.contains(black_box(p)));
            }
            inside
        })
    });
}

fn bench_pattern_classification(c: &mut Criterion) {
    // Classify every block of a region the way objectives do at load time
    let bounds = Bounds::from_blocks(IVec3::ZERO, IVec3::new(15, 7, 15));
    let mut grid = BlockGrid::new();
    grid.fill(&bounds, Material::Obsidian);
    grid.fill(&Bounds::from_blocks(IVec3::ZERO, IVec3::new(15, 1, 15)), Material::Wool);
    let region = Region::cuboid(bounds);
    let pattern: MaterialPattern = "obsidian;wool:14".parse().unwrap();

    c.bench_function("pattern_classification", |b| {
        b.iter(|| {
            region
                .blocks()
                .unwrap()
                .iter()
                .filter(|p| pattern.matches(grid.block(**p)))
                .count()
        })
    });
}

criterion_group!(benches, bench_cuboid_blocks, bench_composite_contains, bench_pattern_classification);
criterion_main!(benches);
