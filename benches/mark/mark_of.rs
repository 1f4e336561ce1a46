use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marksrc::{Address128, MarkConfig, Prefix, ValidConfig};

fn config(prefix: &str, sub_prefix_len: u8, mark_offset: u32) -> ValidConfig {
    let prefix: Prefix = prefix.parse().unwrap();
    MarkConfig::new(prefix, sub_prefix_len, mark_offset)
        .into_valid()
        .unwrap()
}

pub fn b(c: &mut Criterion) {
    let addr: Address128 = "2001:db8:1234:5678:9abc:def0:1357:9bdf".parse().unwrap();

    // Client bits inside the last word.
    let cfg = config("2001:db8::/96", 128, 0);
    c.bench_function("mark_of_one_word", |b| {
        b.iter(|| black_box(&cfg).mark_of(black_box(&addr)));
    });

    // Client bits straddling two words.
    let cfg = config("2001:db8::/48", 80, 0);
    c.bench_function("mark_of_two_words", |b| {
        b.iter(|| black_box(&cfg).mark_of(black_box(&addr)));
    });

    let cfg = config("2001:db8::/64", 64, 7);
    c.bench_function("mark_of_single_client", |b| {
        b.iter(|| black_box(&cfg).mark_of(black_box(&addr)));
    });
}

criterion_group!(benches, b);
criterion_main!(benches);
