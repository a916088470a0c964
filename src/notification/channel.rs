//! 投递渠道 trait 定义

use anyhow::Result;
use std::future::Future;

use super::message::PresentationMessage;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（dry-run 等）
    Skipped(String),
    /// 对端拒绝
    Failed(String),
}

/// 投递渠道
///
/// 渠道本身不重试；`Err` 表示传输层错误，`Ok(Failed)` 表示对端返回了错误。
pub trait DeliveryChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    fn deliver(
        &self,
        message: &PresentationMessage,
    ) -> impl Future<Output = Result<SendResult>> + Send;
}
