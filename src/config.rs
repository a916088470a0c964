//! 投递配置
//!
//! Discord webhook URL 读取优先级：
//! 1. 命令行 `--webhook-url`
//! 2. 环境变量 `DISCORD_WEBHOOK_URL`
//! 3. 配置文件 `~/.config/asc-relay/config.json`（字段 `discord_webhook_url`、可选 `timeout_secs`）
//!
//! 配置在入口处解析一次，显式传入 `RelayHandler`，管道内部不读取进程环境。

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 环境变量名
pub const WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 投递配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Discord webhook URL（未配置时请求返回 500）
    pub discord_webhook_url: Option<String>,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// dry-run 模式（只打印不发送）
    pub dry_run: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dry_run: false,
        }
    }
}

/// 配置文件结构
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    discord_webhook_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl RelayConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/asc-relay/config.json"))
    }

    /// 从命令行参数、环境变量和默认配置文件加载
    pub fn load(cli_url: Option<String>) -> Result<Self> {
        let env_url = std::env::var(WEBHOOK_URL_ENV).ok();
        let path = Self::default_path();
        Self::load_from(cli_url, env_url, path.as_deref())
    }

    /// 按优先级合并各来源
    pub fn load_from(
        cli_url: Option<String>,
        env_url: Option<String>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = config_path.map(read_config_file).unwrap_or_default();

        let discord_webhook_url = if let Some(url) = non_empty(cli_url) {
            debug!("Using webhook URL from command line");
            Some(url)
        } else if let Some(url) = non_empty(env_url) {
            debug!("Using webhook URL from {}", WEBHOOK_URL_ENV);
            Some(url)
        } else if let Some(url) = non_empty(file.discord_webhook_url) {
            debug!("Using webhook URL from config file");
            Some(url)
        } else {
            None
        };

        Ok(Self {
            discord_webhook_url,
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            dry_run: false,
        })
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// 读取配置文件；文件不存在或格式错误时返回空配置
fn read_config_file(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
            ConfigFile::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read config file");
            ConfigFile::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
