//! 工具函数性能基准测试

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linklytics::analytics::classify_user_agent;
use linklytics::utils::ip::TrustedProxies;
use linklytics::utils::url_validator::validate_url;
use linklytics::utils::{MAX_SHORT_CODE_LENGTH, generate_random_code, is_valid_short_code};

// ============== is_valid_short_code 基准测试 ==============

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid_simple", |b| {
        b.iter(|| {
            assert!(is_valid_short_code(black_box("abc123")));
        });
    });

    group.bench_function("invalid_special_chars", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code(black_box("'; DROP TABLE--")));
        });
    });

    let max_len_code = "a".repeat(MAX_SHORT_CODE_LENGTH);
    group.bench_function("valid_max_length", |b| {
        b.iter(|| {
            assert!(is_valid_short_code(&max_len_code));
        });
    });

    group.finish();
}

// ============== generate_random_code 基准测试 ==============

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for len in [6, 7, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| generate_random_code(black_box(len)));
        });
    }

    group.finish();
}

// ============== validate_url 基准测试 ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("valid_https", |b| {
        b.iter(|| validate_url(black_box("https://example.com/path?q=1#frag")));
    });

    group.bench_function("dangerous_scheme", |b| {
        b.iter(|| validate_url(black_box("javascript:alert(1)")));
    });

    group.finish();
}

// ============== classify_user_agent 基准测试 ==============

fn bench_classify_user_agent(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics/classify_user_agent");

    let agents = [
        (
            "chrome_desktop",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
        (
            "safari_iphone",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
        ),
        ("curl", "curl/8.5.0"),
    ];

    for (name, ua) in agents {
        group.bench_function(name, |b| {
            b.iter(|| classify_user_agent(black_box(Some(ua))));
        });
    }

    group.finish();
}

// ============== TrustedProxies::resolve 基准测试 ==============

fn bench_resolve_client_ip(c: &mut Criterion) {
    use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
    );

    let auto = TrustedProxies::default();
    let explicit = TrustedProxies::parse(&["10.0.0.0/8".to_string(), "192.168.0.1".to_string()]);

    let mut group = c.benchmark_group("utils/resolve_client_ip");
    group.bench_function("auto_detect", |b| {
        b.iter(|| auto.resolve(black_box(Some("10.0.0.2:5000")), &headers));
    });
    group.bench_function("explicit_cidr", |b| {
        b.iter(|| explicit.resolve(black_box(Some("10.0.0.2:5000")), &headers));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_is_valid_short_code,
    bench_generate_random_code,
    bench_validate_url,
    bench_classify_user_agent,
    bench_resolve_client_ip,
);
criterion_main!(benches);
