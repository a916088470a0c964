//! Output formatting for CLI commands

use crate::notification::message::PresentationMessage;
use crate::relay::RelayResponse;
use anyhow::Result;

/// Discord payload，`compact` 时输出单行
pub fn format_message(message: &PresentationMessage, compact: bool) -> Result<String> {
    let text = if compact {
        message.to_json()?
    } else {
        message.to_json_pretty()?
    };
    Ok(text)
}

/// 请求处理结果，`json` 时输出单行 JSON
pub fn format_response(response: &RelayResponse, json: bool) -> String {
    if json {
        serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string())
    } else {
        format!("{} {}", response.status, response.body)
    }
}
