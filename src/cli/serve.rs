//! serve 命令 - 逐行读取请求并逐行输出响应 (stdio 模式)
//!
//! 每行输入可以是：
//! - 请求信封 `{"method": "POST", "body": {...}}`（`body` 也可以是原始字符串）
//! - 入站文档本身（按 POST 处理）
//!
//! 每行输出一个 `{"status": 200, "body": "Processed Successfully"}`。

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::notification::channel::DeliveryChannel;
use crate::relay::{RelayHandler, RelayResponse};

/// serve 命令参数
#[derive(Args)]
pub struct ServeArgs {
    /// Discord webhook URL（覆盖环境变量和配置文件）
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,
}

/// 从 stdin 读取请求
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = RelayConfig::load(args.webhook_url)?.with_dry_run(args.dry_run);
    let handler = RelayHandler::from_config(&config)?;

    eprintln!("ASC Relay 已启动 (stdio 模式)");
    serve_lines(&handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// 处理行分隔的请求流，直到 EOF
pub async fn serve_lines<C, R, W>(handler: &RelayHandler<C>, mut reader: R, mut writer: W) -> Result<()>
where
    C: DeliveryChannel,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut handled = 0usize;

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(handler, trimmed).await;
        debug!(status = response.status, "Request handled");
        handled += 1;

        let response_json = serde_json::to_string(&response)?;
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!(requests = handled, "Input closed");
    Ok(())
}

async fn handle_line<C: DeliveryChannel>(handler: &RelayHandler<C>, line: &str) -> RelayResponse {
    let Ok(value) = serde_json::from_str::<Value>(line) else {
        return handler.handle("POST", line.as_bytes()).await;
    };

    let method = value.get("method").and_then(Value::as_str);
    match (method, value.get("body")) {
        (Some(method), Some(Value::String(raw))) => handler.handle(method, raw.as_bytes()).await,
        (Some(method), Some(body)) => {
            if method != "POST" {
                return handler.handle(method, &[]).await;
            }
            handler.handle_document(body).await
        }
        _ => handler.handle_document(&value).await,
    }
}
