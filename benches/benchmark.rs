use axum::http::{header, HeaderMap};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_gateway::{forwarded_headers, route, Config, PageFormat};
use std::time::Duration;

// Fast settings for all benchmarks
fn configure_fast_group(group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>) {
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_millis(500));
    group.sample_size(20);
}

fn benchmark_route_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("route");
    configure_fast_group(&mut group);

    let paths = vec![
        "/",
        "/pricing?plan=team",
        "/reports/2026/q3.pdf",
        "/reports/2026/index.pdf",
    ];

    group.bench_function("decide", |b| {
        b.iter(|| {
            for path in &paths {
                let decision = route(path, "app.example.com");
                let _ = black_box(decision);
            }
        });
    });

    group.finish();
}

fn benchmark_header_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("forwarded_headers");
    configure_fast_group(&mut group);

    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, "gateway.internal".parse().unwrap());
    headers.insert(header::COOKIE, "session=abc123".parse().unwrap());
    headers.insert(header::AUTHORIZATION, "Bearer token".parse().unwrap());
    headers.insert(header::ACCEPT_LANGUAGE, "en-US".parse().unwrap());
    headers.insert("x-custom", "value".parse().unwrap());

    group.bench_function("filter", |b| {
        b.iter(|| {
            let forwarded = forwarded_headers(&headers);
            black_box(forwarded);
        });
    });

    group.finish();
}

fn benchmark_config_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");
    configure_fast_group(&mut group);

    group.bench_function("creation", |b| {
        b.iter(|| {
            let config = Config::default();
            black_box(config);
        });
    });

    group.bench_function("page_format_parse", |b| {
        b.iter(|| {
            for format in ["letter", "a4", "tabloid"] {
                let parsed = format.parse::<PageFormat>();
                let _ = black_box(parsed);
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_route_decision,
    benchmark_header_forwarding,
    benchmark_config_creation
);
criterion_main!(benches);
