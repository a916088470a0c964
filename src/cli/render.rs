//! render / send / handle 命令

use anyhow::{anyhow, bail, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::input::{read_body, read_document};
use super::output::{format_message, format_response};
use crate::config::{RelayConfig, WEBHOOK_URL_ENV};
use crate::notification::channel::{DeliveryChannel, SendResult};
use crate::notification::dispatcher::Dispatcher;
use crate::relay::{RelayChannel, RelayHandler, RelayResponse};

/// render 命令参数
#[derive(Args)]
pub struct RenderArgs {
    /// 入站 JSON 文件（省略或 `-` 时读 stdin）
    pub file: Option<PathBuf>,

    /// 输出单行 JSON
    #[arg(long)]
    pub compact: bool,
}

/// send 命令参数
#[derive(Args)]
pub struct SendArgs {
    /// 入站 JSON 文件（省略或 `-` 时读 stdin）
    pub file: Option<PathBuf>,

    /// Discord webhook URL（覆盖环境变量和配置文件）
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,
}

/// handle 命令参数
#[derive(Args)]
pub struct HandleArgs {
    /// 请求 body 文件（省略或 `-` 时读 stdin）
    pub file: Option<PathBuf>,

    /// HTTP 方法
    #[arg(long, short = 'X', default_value = "POST")]
    pub method: String,

    /// Discord webhook URL（覆盖环境变量和配置文件）
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 渲染并打印 Discord payload
pub fn handle_render(args: RenderArgs) -> Result<()> {
    let document = read_document(args.file.as_deref())?;
    let message = Dispatcher::new().dispatch(&document)?;
    println!("{}", format_message(&message, args.compact)?);
    Ok(())
}

/// 渲染并投递
pub async fn handle_send(args: SendArgs) -> Result<()> {
    let config = RelayConfig::load(args.webhook_url)?.with_dry_run(args.dry_run);
    let channel = RelayChannel::from_config(&config)?
        .ok_or_else(|| anyhow!("{} is not set", WEBHOOK_URL_ENV))?;

    let document = read_document(args.file.as_deref())?;
    let message = Dispatcher::new().dispatch(&document)?;

    match channel.deliver(&message).await? {
        SendResult::Sent => {
            info!(channel = channel.name(), "Delivered");
            println!("Sent: {}", message.title);
        }
        SendResult::Skipped(reason) => println!("Skipped: {}", reason),
        SendResult::Failed(reason) => bail!("Discord Error: {}", reason),
    }

    Ok(())
}

/// 按 webhook 请求语义处理一个 body
pub async fn handle_request(args: HandleArgs) -> Result<RelayResponse> {
    let config = RelayConfig::load(args.webhook_url)?.with_dry_run(args.dry_run);
    let handler = RelayHandler::from_config(&config)?;

    let body = read_body(args.file.as_deref())?;
    let response = handler.handle(&args.method, &body).await;
    println!("{}", format_response(&response, args.json));
    Ok(response)
}
