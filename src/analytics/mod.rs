//! 点击统计：UA 分类、异步记录、保留期清理与报告组装

pub mod aggregate;
pub mod classify;
pub mod recorder;
pub mod retention;
pub mod sink;

pub use aggregate::{BrowserCount, DateCount, DeviceCount, LinkAnalytics, assemble_report};
pub use classify::{BrowserCategory, DeviceCategory, classify_user_agent};
pub use recorder::{ClickRecorder, IpHasher};
pub use retention::DataRetentionTask;
pub use sink::ClickSink;
