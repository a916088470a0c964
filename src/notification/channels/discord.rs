//! Discord webhook 渠道
//!
//! 把 `PresentationMessage` 以 embed 形式 POST 到 Discord webhook URL

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::notification::channel::{DeliveryChannel, SendResult};
use crate::notification::message::PresentationMessage;

/// Discord webhook 配置
#[derive(Debug, Clone)]
pub struct DiscordWebhookConfig {
    /// Webhook URL (https://discord.com/api/webhooks/...)
    pub webhook_url: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

/// Discord webhook 渠道
#[derive(Debug)]
pub struct DiscordWebhookChannel {
    client: Client,
    config: DiscordWebhookConfig,
}

impl DiscordWebhookChannel {
    pub fn new(config: DiscordWebhookConfig) -> Result<Self> {
        if config.webhook_url.trim().is_empty() {
            return Err(anyhow!("webhook_url is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }
}

impl DeliveryChannel for DiscordWebhookChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn deliver(&self, message: &PresentationMessage) -> Result<SendResult> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&message.discord_payload())
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let status = response.status();
        if status.is_success() {
            info!(channel = "discord", title = %message.title, "Message delivered");
            return Ok(SendResult::Sent);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        warn!(channel = "discord", status = %status, body = %body, "Discord rejected message");
        Ok(SendResult::Failed(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::message::RenderedField;
    use crate::notification::palette::EmbedColor;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    fn message() -> PresentationMessage {
        PresentationMessage {
            title: "Build Processing Complete".to_string(),
            description: "The build is ready for TestFlight or Submission.".to_string(),
            color: EmbedColor::Success,
            url: None,
            fields: vec![RenderedField::inline("New State", "COMPLETE")],
            footer_text: "Type: buildUploadStateUpdated".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    /// 单次请求的 HTTP 桩，返回收到的请求体
    async fn serve_once(listener: TcpListener, response: &'static str) -> String {
        let (socket, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(socket);

        let mut content_length = 0usize;
        let mut line = String::new();
        while reader.read_line(&mut line).await.unwrap() > 2 {
            if let Some(v) = line.to_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
            line.clear();
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await.unwrap();

        let mut socket = reader.into_inner();
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8(body).unwrap()
    }

    async fn channel_for(listener: &TcpListener) -> DiscordWebhookChannel {
        let addr = listener.local_addr().unwrap();
        DiscordWebhookChannel::new(DiscordWebhookConfig {
            webhook_url: format!("http://{}/api/webhooks/1/abc", addr),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_requires_webhook_url() {
        let result = DiscordWebhookChannel::new(DiscordWebhookConfig {
            webhook_url: "  ".to_string(),
            timeout_secs: 5,
        });
        assert!(result.unwrap_err().to_string().contains("webhook_url"));
    }

    #[tokio::test]
    async fn test_deliver_posts_embed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let channel = channel_for(&listener).await;
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ));

        let result = channel.deliver(&message()).await.unwrap();
        assert_eq!(result, SendResult::Sent);

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["embeds"][0]["title"], "Build Processing Complete");
        assert_eq!(body["embeds"][0]["color"], 5763719);
    }

    #[tokio::test]
    async fn test_deliver_reports_rejection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let channel = channel_for(&listener).await;
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: 32\r\nConnection: close\r\n\r\n{\"message\": \"Invalid Form Body\"}",
        ));

        let result = channel.deliver(&message()).await.unwrap();
        server.await.unwrap();
        assert_eq!(
            result,
            SendResult::Failed("{\"message\": \"Invalid Form Body\"}".to_string())
        );
    }

    #[tokio::test]
    async fn test_deliver_transport_error() {
        // 绑定后立即释放端口，连接会被拒绝
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let channel = channel_for(&listener).await;
        drop(listener);

        let result = channel.deliver(&message()).await;
        assert!(result.is_err());
    }
}
