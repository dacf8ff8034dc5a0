//! 点击记录器
//!
//! 重定向路径只做分类和入队，写库由后台批量完成：
//! - 事件缓冲在 DashMap 中，按入队序号排序后落盘
//! - 达到阈值时触发一次异步刷盘，定时任务兜底
//! - 落盘失败的事件放回缓冲区，下次重试
//! - 缓冲区有硬上限，超出时丢弃最旧的事件；同一批连续失败多次后整批丢弃

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, trace, warn};
use xxhash_rust::xxh64::xxh64;

use super::classify::classify_user_agent;
use super::sink::ClickSink;
use crate::storage::ClickEvent;

/// 缓冲区默认硬上限
pub const DEFAULT_MAX_PENDING_EVENTS: usize = 100_000;
/// 默认连续失败次数上限
pub const DEFAULT_MAX_FLUSH_FAILURES: u32 = 5;

/// 对客户端 IP 做加盐哈希，原始 IP 不落盘
#[derive(Debug, Clone, Copy)]
pub struct IpHasher {
    seed: u64,
}

impl IpHasher {
    pub fn new(salt: &str) -> Self {
        if salt.is_empty() {
            warn!("analytics.ip_hash_salt is empty, using a random per-process salt");
            return Self {
                seed: rand::random(),
            };
        }
        Self {
            seed: xxh64(salt.as_bytes(), 0),
        }
    }

    pub fn hash(&self, ip: &str) -> String {
        format!("{:016x}", xxh64(ip.as_bytes(), self.seed))
    }
}

struct EventBuffer {
    data: DashMap<u64, ClickEvent>,
    next_id: AtomicU64,
    /// 不大于缓冲区中最小序号，淘汰从这里向上扫描
    floor: AtomicU64,
    capacity: usize,
    consecutive_failures: AtomicU32,
    flush_lock: Mutex<()>,
    flush_pending: AtomicBool,
}

impl EventBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicU64::new(0),
            floor: AtomicU64::new(0),
            capacity: capacity.max(1),
            consecutive_failures: AtomicU32::new(0),
            flush_lock: Mutex::new(()),
            flush_pending: AtomicBool::new(false),
        }
    }

    fn push(&self, event: ClickEvent) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.data.insert(id, event);
        self.enforce_capacity();
        self.data.len()
    }

    /// 只移除快照中的 key，窗口期内新入队的事件留给下一轮
    fn drain(&self) -> Vec<(u64, ClickEvent)> {
        let keys: Vec<u64> = self.data.iter().map(|r| *r.key()).collect();
        let mut events = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(entry) = self.data.remove(&key) {
                events.push(entry);
            }
        }
        events.sort_unstable_by_key(|(id, _)| *id);
        if let Some((last, _)) = events.last() {
            self.floor.fetch_max(last + 1, Ordering::Relaxed);
        }
        events
    }

    /// 原序号放回
    fn restore(&self, events: Vec<(u64, ClickEvent)>) {
        if let Some((first, _)) = events.first() {
            self.floor.fetch_min(*first, Ordering::Relaxed);
        }
        for (id, event) in events {
            self.data.insert(id, event);
        }
        self.enforce_capacity();
    }

    /// 超出上限时按序号从旧到新淘汰
    fn enforce_capacity(&self) {
        let len = self.data.len();
        if len <= self.capacity {
            return;
        }

        let excess = len - self.capacity;
        let mut dropped = 0;
        while dropped < excess {
            let id = self.floor.fetch_add(1, Ordering::Relaxed);
            if id >= self.next_id.load(Ordering::Relaxed) {
                self.floor.fetch_min(id, Ordering::Relaxed);
                break;
            }
            if self.data.remove(&id).is_some() {
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!(
                "ClickRecorder: buffer over capacity ({}), dropped {} oldest click events",
                self.capacity, dropped
            );
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[derive(Clone)]
pub struct ClickRecorder {
    buffer: Arc<EventBuffer>,
    sink: Arc<dyn ClickSink>,
    hasher: IpHasher,
    flush_interval: Duration,
    max_buffered_events: usize,
    max_flush_failures: u32,
}

impl ClickRecorder {
    pub fn new(
        sink: Arc<dyn ClickSink>,
        hasher: IpHasher,
        flush_interval: Duration,
        max_buffered_events: usize,
    ) -> Self {
        let max_buffered_events = max_buffered_events.max(1);
        Self {
            buffer: Arc::new(EventBuffer::new(
                DEFAULT_MAX_PENDING_EVENTS.max(max_buffered_events),
            )),
            sink,
            hasher,
            flush_interval,
            max_buffered_events,
            max_flush_failures: DEFAULT_MAX_FLUSH_FAILURES,
        }
    }

    /// 设置缓冲区硬上限和连续失败上限（构造后、开始记录前调用）
    ///
    /// 刷盘阈值不会超过硬上限
    pub fn with_limits(mut self, max_pending_events: usize, max_flush_failures: u32) -> Self {
        let capacity = max_pending_events.max(1);
        self.buffer = Arc::new(EventBuffer::new(capacity));
        self.max_buffered_events = self.max_buffered_events.min(capacity);
        self.max_flush_failures = max_flush_failures.max(1);
        self
    }

    pub fn from_config(sink: Arc<dyn ClickSink>) -> Self {
        let analytics = &crate::config::get_config().analytics;
        Self::new(
            sink,
            IpHasher::new(&analytics.ip_hash_salt),
            Duration::from_secs(analytics.flush_interval_secs.max(1)),
            analytics.max_buffered_events,
        )
        .with_limits(analytics.max_pending_events, analytics.max_flush_failures)
    }

    /// 记录一次访问（不等待落盘）
    pub fn record_visit(&self, link_id: &str, user_agent: Option<&str>, client_ip: Option<&str>) {
        let (device, browser) = classify_user_agent(user_agent);
        let event = ClickEvent {
            link_id: link_id.to_string(),
            clicked_at: Utc::now(),
            device,
            browser,
            ip_hash: client_ip.map(|ip| self.hasher.hash(ip)),
        };
        self.record(event);
    }

    pub fn record(&self, event: ClickEvent) {
        let buffered = self.buffer.push(event);
        trace!("ClickRecorder: {} events buffered", buffered);

        if buffered >= self.max_buffered_events
            && self
                .buffer
                .flush_pending
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
        {
            let buffer = Arc::clone(&self.buffer);
            let sink = Arc::clone(&self.sink);
            let max_failures = self.max_flush_failures;
            tokio::spawn(async move {
                if let Ok(_guard) = buffer.flush_lock.try_lock() {
                    Self::flush_buffer(&buffer, &sink, max_failures).await;
                } else {
                    trace!("ClickRecorder: flush already in progress, skipping");
                }
                buffer.flush_pending.store(false, Ordering::Release);
            });
        }
    }

    /// 定时刷盘循环
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            if let Ok(_guard) = self.buffer.flush_lock.try_lock() {
                Self::flush_buffer(&self.buffer, &self.sink, self.max_flush_failures).await;
            } else {
                trace!("ClickRecorder: flush already in progress, skipping scheduled flush");
            }
        }
    }

    /// 等待当前缓冲区全部落盘（或失败放回）
    pub async fn flush(&self) {
        let _guard = self.buffer.flush_lock.lock().await;
        Self::flush_buffer(&self.buffer, &self.sink, self.max_flush_failures).await;
    }

    async fn flush_buffer(buffer: &EventBuffer, sink: &Arc<dyn ClickSink>, max_failures: u32) {
        let drained = buffer.drain();
        if drained.is_empty() {
            return;
        }

        let count = drained.len();
        let events: Vec<ClickEvent> = drained.iter().map(|(_, e)| e.clone()).collect();

        match sink.write_events(events).await {
            Ok(()) => {
                buffer.consecutive_failures.store(0, Ordering::Relaxed);
                debug!("ClickRecorder: flushed {} click events", count);
            }
            Err(e) => {
                let failures = buffer.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                if failures >= max_failures {
                    buffer.consecutive_failures.store(0, Ordering::Relaxed);
                    error!(
                        "ClickRecorder: write_events failed {} times in a row: {}, dropping {} click events",
                        failures, e, count
                    );
                } else {
                    buffer.restore(drained);
                    warn!(
                        "ClickRecorder: write_events failed ({}/{}): {}, {} events restored to buffer",
                        failures, max_failures, e, count
                    );
                }
            }
        }
    }

    pub fn buffered_events(&self) -> usize {
        self.buffer.len()
    }
}
