use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marksrc::MarkConfig;

pub fn b(c: &mut Criterion) {
    let prefix = "2001:db8::/104".parse().unwrap();
    let cfg = MarkConfig::new(prefix, 120, 0).into_valid().unwrap();

    c.bench_function("enumerate_65536", |b| {
        b.iter(|| {
            black_box(&cfg)
                .enumerate()
                .fold(0u32, |acc, entry| acc ^ entry.mark ^ entry.address.word(3))
        });
    });

    let prefix = "::/96".parse().unwrap();
    let cfg = MarkConfig::new(prefix, 128, 0).into_valid().unwrap();
    c.bench_function("enumerate_nth", |b| {
        b.iter(|| black_box(&cfg).enumerate().nth(black_box(0xdead_beef)));
    });
}

criterion_group!(benches, b);
criterion_main!(benches);
