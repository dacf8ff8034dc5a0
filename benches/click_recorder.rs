//! ClickRecorder 性能基准测试

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linklytics::analytics::{ClickRecorder, ClickSink, IpHasher};
use linklytics::storage::ClickEvent;
use tokio::time::Duration;

const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 空 sink，只用于测试入队性能
struct NoopSink;

#[async_trait::async_trait]
impl ClickSink for NoopSink {
    async fn write_events(&self, _events: Vec<ClickEvent>) -> anyhow::Result<()> {
        Ok(())
    }
}

fn create_recorder() -> ClickRecorder {
    ClickRecorder::new(
        Arc::new(NoopSink) as Arc<dyn ClickSink>,
        IpHasher::new("bench-salt"),
        Duration::from_secs(3600), // 长间隔，避免自动刷盘
        usize::MAX,                // 高阈值，避免阈值刷盘
    )
}

/// 单线程 record_visit：1000 次入队后刷盘一次
fn bench_record_single_thread(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let recorder = create_recorder();

    let mut group = c.benchmark_group("record_visit/single_thread");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("with_ua_and_ip", |b| {
        b.to_async(&rt).iter(|| async {
            for _ in 0..1000 {
                recorder.record_visit("link-1", Some(CHROME_DESKTOP), Some("203.0.113.7"));
            }
            recorder.flush().await;
        });
    });
    group.bench_function("bare", |b| {
        b.to_async(&rt).iter(|| async {
            for _ in 0..1000 {
                recorder.record_visit("link-1", None, None);
            }
            recorder.flush().await;
        });
    });
    group.finish();
}

/// 多任务并发 record_visit 吞吐量
fn bench_record_concurrent(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("record_visit/concurrent");

    for num_tasks in [2, 4, 8] {
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("tasks", num_tasks),
            &num_tasks,
            |b, &num_tasks| {
                b.to_async(&rt).iter(|| async {
                    let recorder = Arc::new(create_recorder());
                    let mut handles = vec![];

                    for t in 0..num_tasks {
                        let rec = Arc::clone(&recorder);
                        handles.push(tokio::spawn(async move {
                            let link_id = format!("link-{}", t);
                            for _ in 0..1000 / num_tasks {
                                rec.record_visit(&link_id, Some(CHROME_DESKTOP), None);
                            }
                        }));
                    }

                    for handle in handles {
                        handle.await.unwrap();
                    }
                    recorder.flush().await;
                });
            },
        );
    }

    group.finish();
}

fn bench_ip_hash(c: &mut Criterion) {
    let hasher = IpHasher::new("bench-salt");
    c.bench_function("ip_hash/ipv4", |b| {
        b.iter(|| hasher.hash(std::hint::black_box("203.0.113.7")));
    });
}

criterion_group!(
    benches,
    bench_record_single_thread,
    bench_record_concurrent,
    bench_ip_hash,
);
criterion_main!(benches);
