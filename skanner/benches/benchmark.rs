use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use rand::prelude::*;
use skanner::dfa::serializer;
use skanner::generator::generate_scanner;

lazy_static! {
    static ref PATTERNS: Vec<&'static [u8]> = vec![
        b"[A-Za-z_]\\w*".as_slice(),
        b"-?\\d+",
        b"-?\\d+\\.\\d+",
        b"\"([^\"]|\\\\\")*\"",
        b"(abc|def)*(x)?123",
        b"\\s+",
        b"[0-9a-fA-F]+",
    ];
    static ref INPUTS: Vec<Vec<u8>> = {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let alphabet = b"abcdefx_0123456789 \"\\";
        (0..512)
            .map(|_| {
                let length = rng.gen_range(0..24);
                (0..length)
                    .map(|_| *alphabet.choose(&mut rng).unwrap())
                    .collect()
            })
            .collect()
    };
}

pub fn generation(c: &mut Criterion) {
    c.bench_function("generate scanner", |b| {
        b.iter(|| generate_scanner(black_box(PATTERNS.as_slice())).unwrap())
    });
}

pub fn matching(c: &mut Criterion) {
    let dfa = generate_scanner(PATTERNS.as_slice()).unwrap();
    let matcher = dfa.matcher();
    c.bench_function("match input lines", |b| {
        b.iter(|| {
            INPUTS
                .iter()
                .filter(|line| matcher.matches(black_box(line)))
                .count()
        })
    });
    c.bench_function("collect matching ids", |b| {
        b.iter(|| {
            INPUTS
                .iter()
                .map(|line| matcher.matching_ids(black_box(line)).len())
                .sum::<usize>()
        })
    });
}

pub fn serialization(c: &mut Criterion) {
    let dfa = generate_scanner(PATTERNS.as_slice()).unwrap();
    let mut artifact = Vec::new();
    serializer::serialize(&dfa, &mut artifact).unwrap();
    c.bench_function("serialize", |b| {
        b.iter(|| {
            let mut buffer = Vec::new();
            serializer::serialize(black_box(&dfa), &mut buffer).unwrap();
            buffer
        })
    });
    c.bench_function("deserialize", |b| {
        b.iter(|| serializer::deserialize(&mut black_box(&artifact).as_slice()).unwrap())
    });
}

criterion_group!(benches, generation, matching, serialization);
criterion_main!(benches);
