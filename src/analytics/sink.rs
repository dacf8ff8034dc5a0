use crate::storage::ClickEvent;

/// 点击事件落盘目标
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    /// 批量写入，失败时调用方负责保留数据
    async fn write_events(&self, events: Vec<ClickEvent>) -> anyhow::Result<()>;
}
