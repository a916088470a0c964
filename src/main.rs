//! ASC Relay CLI
//!
//! 把 App Store Connect webhook 通知渲染为 Discord embed 并投递

use anyhow::Result;
use asc_relay::cli::{
    handle_render, handle_request, handle_send, handle_serve, HandleArgs, RenderArgs, SendArgs,
    ServeArgs,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "asc-relay")]
#[command(about = "ASC Relay - App Store Connect webhook → Discord")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 渲染入站文档并打印 Discord payload
    Render(RenderArgs),
    /// 渲染入站文档并投递到 Discord
    Send(SendArgs),
    /// 按 webhook 请求语义处理一个 body，打印状态码和响应
    Handle(HandleArgs),
    /// 从 stdin 逐行读取请求并处理 (stdio 模式)
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug asc-relay serve
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("asc_relay=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => {
            handle_render(args)?;
        }
        Commands::Send(args) => {
            handle_send(args).await?;
        }
        Commands::Handle(args) => {
            let response = handle_request(args).await?;
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Serve(args) => {
            handle_serve(args).await?;
        }
    }

    Ok(())
}
