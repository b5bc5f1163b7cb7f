use criterion::{black_box, criterion_group, criterion_main, Criterion};
use faceflow_cluster::{cluster_embeddings, Config};

/// Deterministic xorshift noise in [-1, 1).
fn noise(dim: usize, seed: u64) -> impl Iterator<Item = f32> {
    let mut state = seed | 1;
    (0..dim).map(move |_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 23) as f32 - 1.0
    })
}

/// Raw embeddings around one identity: a shared direction plus per-photo
/// jitter, scaled by a varying magnitude. The engine normalizes them itself.
fn make_identity(dim: usize, identity: u64, photos: usize) -> Vec<Vec<f32>> {
    let base: Vec<f32> = noise(dim, identity.wrapping_mul(0x9E37_79B9)).collect();
    (0..photos)
        .map(|p| {
            let scale = 1.0 + (p % 7) as f32;
            let seed = identity.wrapping_mul(1_000_003).wrapping_add(p as u64);
            base.iter()
                .zip(noise(dim, seed))
                .map(|(&b, j)| (b + 0.15 * j) * scale)
                .collect()
        })
        .collect()
}

/// Interleaves identities so the first-fit scan sees every cluster early.
fn make_input(dim: usize, identities: u64, per_identity: usize) -> Vec<(String, Vec<f32>)> {
    let groups: Vec<_> = (0..identities)
        .map(|g| make_identity(dim, g + 1, per_identity))
        .collect();
    let mut input = Vec::with_capacity(groups.len() * per_identity);
    for p in 0..per_identity {
        for (g, group) in groups.iter().enumerate() {
            input.push((format!("id{g}-photo{p}"), group[p].clone()));
        }
    }
    input
}

fn bench_cluster_small(c: &mut Criterion) {
    let input = make_input(128, 3, 20);
    let cfg = Config::default();

    c.bench_function("cluster_128d_60photos_3groups", |b| {
        b.iter(|| {
            let _ = black_box(cluster_embeddings(black_box(&input), &cfg));
        });
    });
}

fn bench_cluster_large(c: &mut Criterion) {
    let input = make_input(512, 10, 50);
    let cfg = Config::default();

    c.bench_function("cluster_512d_500photos_10groups", |b| {
        b.iter(|| {
            let _ = black_box(cluster_embeddings(black_box(&input), &cfg));
        });
    });
}

criterion_group!(benches, bench_cluster_small, bench_cluster_large);
criterion_main!(benches);
