use chain_core::pow::{seal, Difficulty};
use chain_core::BlockDraft;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_pow(c: &mut Criterion) {
    c.bench_function("seal_one_zero_byte", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let payload: Vec<u8> = (0..256).map(|_| rng.gen()).collect();
        let draft = BlockDraft::new(1, 1_600_000_000, vec![0u8; 32], payload);

        b.iter(|| {
            let _sealed = seal(draft.clone(), Difficulty::leading_zero_bytes(1));
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
