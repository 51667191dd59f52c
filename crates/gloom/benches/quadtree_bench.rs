use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gloom::{Quadtree, Rect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ARENA: Rect = Rect::new(0.0, 36.0, 1280.0, 576.0);

fn scattered_rects(count: usize, seed: u64) -> Vec<Rect> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(ARENA.x..ARENA.right());
            let y = rng.gen_range(ARENA.y..ARENA.bottom());
            Rect::new(x, y, 32.0, 32.0)
        })
        .collect()
}

fn bench_rebuild_frame(c: &mut Criterion) {
    // One frame's worth of entities: soldiers, enemies, effects, projectiles
    let rects = scattered_rects(400, 7);
    let mut tree: Quadtree<usize> = Quadtree::with_bounds(ARENA, 10).expect("valid bounds");

    c.bench_function("rebuild_frame_400", |b| {
        b.iter(|| {
            tree.clear();
            for (i, rect) in rects.iter().enumerate() {
                tree.insert(i as u64, *rect, i);
            }
            black_box(tree.len())
        })
    });
}

fn bench_query_per_entity(c: &mut Criterion) {
    let rects = scattered_rects(400, 11);
    let mut tree: Quadtree<usize> = Quadtree::with_bounds(ARENA, 10).expect("valid bounds");
    for (i, rect) in rects.iter().enumerate() {
        tree.insert(i as u64, *rect, i);
    }

    c.bench_function("query_per_entity_400", |b| {
        let mut hits = Vec::new();
        b.iter(|| {
            for rect in &rects {
                hits.clear();
                tree.query_into(black_box(rect), &mut hits);
            }
            black_box(hits.len())
        })
    });
}

fn bench_clustered_rebuild(c: &mut Criterion) {
    // Everything piled around one soldier: the worst case for subdivision
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let rects: Vec<Rect> = (0..400)
        .map(|_| {
            let x = 640.0 + rng.gen_range(-60.0..60.0);
            let y = 320.0 + rng.gen_range(-60.0..60.0);
            Rect::new(x, y, 32.0, 32.0)
        })
        .collect();
    let mut tree: Quadtree<usize> = Quadtree::with_bounds(ARENA, 10).expect("valid bounds");

    c.bench_function("clustered_rebuild_400", |b| {
        b.iter(|| {
            tree.clear();
            for (i, rect) in rects.iter().enumerate() {
                tree.insert(i as u64, *rect, i);
            }
            black_box(tree.stats())
        })
    });
}

criterion_group!(benches, bench_rebuild_frame, bench_query_per_entity, bench_clustered_rebuild);
criterion_main!(benches);
