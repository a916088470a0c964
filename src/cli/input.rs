//! 读取入站文档（文件或 stdin）

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// 读取原始 body；未指定文件或文件为 `-` 时读 stdin
pub fn read_body(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read(p).with_context(|| format!("Cannot read {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Cannot read stdin")?;
            Ok(buf)
        }
    }
}

/// 读取并解析为 JSON 文档
pub fn read_document(path: Option<&Path>) -> Result<serde_json::Value> {
    let body = read_body(path)?;
    serde_json::from_slice(&body).context("Input is not valid JSON")
}
