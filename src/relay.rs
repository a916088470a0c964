//! Webhook 请求处理
//!
//! 把一次 HTTP 请求（方法 + 原始 body）映射为状态码和响应文本：
//!
//! | 情况 | 状态码 |
//! |------|--------|
//! | 非 POST | 405 |
//! | body 不是 JSON / token 解码失败 / 未知格式 | 400 |
//! | 未配置投递目标 / 内部错误 / 传输失败 | 500 |
//! | Discord 返回错误 | 502 |
//! | 成功（含 dry-run） | 200 |

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::{RelayConfig, WEBHOOK_URL_ENV};
use crate::error::PipelineError;
use crate::notification::channel::{DeliveryChannel, SendResult};
use crate::notification::channels::{DiscordWebhookChannel, DiscordWebhookConfig, DryRunChannel};
use crate::notification::dispatcher::Dispatcher;
use crate::notification::message::PresentationMessage;

/// 请求处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

impl RelayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 根据配置选择的渠道
#[derive(Debug)]
pub enum RelayChannel {
    Discord(DiscordWebhookChannel),
    DryRun(DryRunChannel),
}

impl RelayChannel {
    /// dry-run 优先；未配置 URL 时返回 None
    pub fn from_config(config: &RelayConfig) -> Result<Option<Self>> {
        if config.dry_run {
            return Ok(Some(RelayChannel::DryRun(DryRunChannel)));
        }

        match &config.discord_webhook_url {
            Some(url) => {
                let channel = DiscordWebhookChannel::new(DiscordWebhookConfig {
                    webhook_url: url.clone(),
                    timeout_secs: config.timeout_secs,
                })?;
                Ok(Some(RelayChannel::Discord(channel)))
            }
            None => Ok(None),
        }
    }
}

impl DeliveryChannel for RelayChannel {
    fn name(&self) -> &str {
        match self {
            RelayChannel::Discord(c) => c.name(),
            RelayChannel::DryRun(c) => c.name(),
        }
    }

    async fn deliver(&self, message: &PresentationMessage) -> Result<SendResult> {
        match self {
            RelayChannel::Discord(c) => c.deliver(message).await,
            RelayChannel::DryRun(c) => c.deliver(message).await,
        }
    }
}

/// Webhook 请求处理器
pub struct RelayHandler<C> {
    dispatcher: Dispatcher,
    channel: Option<C>,
}

impl RelayHandler<RelayChannel> {
    /// 从配置创建处理器
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        Ok(Self::new(Dispatcher::new(), RelayChannel::from_config(config)?))
    }
}

impl<C: DeliveryChannel> RelayHandler<C> {
    pub fn new(dispatcher: Dispatcher, channel: Option<C>) -> Self {
        Self {
            dispatcher,
            channel,
        }
    }

    /// 处理一次请求
    pub async fn handle(&self, method: &str, body: &[u8]) -> RelayResponse {
        if method != "POST" {
            return RelayResponse::new(405, "Method Not Allowed");
        }

        let document: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Request body is not JSON");
                return RelayResponse::new(400, "Invalid JSON");
            }
        };

        self.handle_document(&document).await
    }

    /// 处理已解析的入站文档
    pub async fn handle_document(&self, document: &Value) -> RelayResponse {
        let message = match self.dispatcher.dispatch(document) {
            Ok(m) => m,
            Err(PipelineError::Decode(e)) => {
                error!(reason = %e, "Signed payload decode failed");
                return RelayResponse::new(400, "Invalid JWS Token");
            }
            Err(PipelineError::UnrecognizedFormat) => {
                let pretty = serde_json::to_string_pretty(document)
                    .unwrap_or_else(|_| document.to_string());
                error!(payload = %pretty, "Unknown payload format");
                return RelayResponse::new(400, "Bad Request: Unknown Payload Format");
            }
            Err(e @ PipelineError::Internal(_)) => {
                error!(error = %e, "Failed to build message");
                return RelayResponse::new(500, format!("Server Error: {}", e));
            }
        };

        let Some(channel) = &self.channel else {
            error!("{} is not set", WEBHOOK_URL_ENV);
            return RelayResponse::new(500, format!("Server Error: {} is not set", WEBHOOK_URL_ENV));
        };

        match channel.deliver(&message).await {
            Ok(SendResult::Sent) | Ok(SendResult::Skipped(_)) => {
                info!(channel = channel.name(), title = %message.title, "Processed successfully");
                RelayResponse::new(200, "Processed Successfully")
            }
            Ok(SendResult::Failed(reason)) => {
                RelayResponse::new(502, format!("Discord Error: {}", reason))
            }
            Err(e) => {
                error!(channel = channel.name(), error = %e, "Delivery failed");
                RelayResponse::new(500, format!("Server Error: {}", e))
            }
        }
    }
}
