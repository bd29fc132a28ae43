use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kumihan_engine::{KeywordRegistry, Parser, ParserOptions, Strategy, scan_marker};
mod common;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let registry = KeywordRegistry::with_defaults();
    let parser = Parser::new(&registry, ParserOptions::default());

    for size in [10, 500] {
        let content = common::generate_kumihan_content(size);
        for strategy in [Strategy::Sequential, Strategy::Parallel, Strategy::Streaming] {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), size),
                &content,
                |b, content| {
                    b.iter(|| {
                        let out = parser.parse_with(std::hint::black_box(content), strategy);
                        std::hint::black_box(out);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_nested_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_blocks");
    group.sample_size(10);

    let registry = KeywordRegistry::with_defaults();
    let parser = Parser::new(&registry, ParserOptions::default());
    let content = common::generate_nested_blocks(50, 8);
    group.bench_function("sequential", |b| {
        b.iter(|| parser.parse_with(std::hint::black_box(&content), Strategy::Sequential));
    });

    group.finish();
}

fn bench_scan_marker(c: &mut Criterion) {
    let line = "前置き # 太字+下線 color=red #一## 中 # ルビ #漢字(かんじ)## 後 # 未知 #x##";
    c.bench_function("scan_marker", |b| {
        b.iter(|| scan_marker(std::hint::black_box(line)));
    });
}

criterion_group!(benches, bench_strategies, bench_nested_blocks, bench_scan_marker);
criterion_main!(benches);
