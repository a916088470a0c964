//! RelayHandler 集成测试：配置 → 渠道 → Discord HTTP 桩

use asc_relay::cli::serve_lines;
use asc_relay::{RelayConfig, RelayHandler, RelayResponse};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 接收一次请求，回写固定响应，返回请求体
async fn discord_stub(listener: TcpListener, response: &'static str) -> Value {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let body_start = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..body_start]).to_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);

    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.unwrap();
    serde_json::from_slice(&buf[body_start..]).unwrap()
}

fn config_for(listener: &TcpListener) -> RelayConfig {
    let url = format!("http://{}/api/webhooks/1/token", listener.local_addr().unwrap());
    RelayConfig::load_from(Some(url), None, None).unwrap()
}

const BUILD_COMPLETE: &[u8] = br#"{"data":{"type":"buildUploadStateUpdated","id":"evt-1","attributes":{"oldState":"PROCESSING","newState":"COMPLETE"}}}"#;

#[tokio::test]
async fn test_relay_delivers_to_discord() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let handler = RelayHandler::from_config(&config_for(&listener)).unwrap();
    let stub = tokio::spawn(discord_stub(
        listener,
        "HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    ));

    let response = handler.handle("POST", BUILD_COMPLETE).await;
    assert_eq!(response, RelayResponse::new(200, "Processed Successfully"));

    let sent = stub.await.unwrap();
    let embed = &sent["embeds"][0];
    assert_eq!(embed["title"], "Build Processing Complete");
    assert_eq!(embed["color"], 5763719);
    assert_eq!(embed["footer"]["text"], "Type: buildUploadStateUpdated");
    assert_eq!(embed["fields"][0]["name"], "Old State");
    assert_eq!(embed["fields"][0]["value"], "PROCESSING");
    assert!(embed.get("url").is_none());
}

#[tokio::test]
async fn test_relay_reports_discord_rejection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let handler = RelayHandler::from_config(&config_for(&listener)).unwrap();
    let stub = tokio::spawn(discord_stub(
        listener,
        "HTTP/1.1 429 Too Many Requests\r\nContent-Length: 12\r\nConnection: close\r\n\r\nslow it down",
    ));

    let response = handler.handle("POST", BUILD_COMPLETE).await;
    stub.await.unwrap();
    assert_eq!(response, RelayResponse::new(502, "Discord Error: slow it down"));
}

#[tokio::test]
async fn test_relay_without_webhook_url() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{"timeout_secs": 2}"#).unwrap();

    let config = RelayConfig::load_from(None, None, Some(&path)).unwrap();
    let handler = RelayHandler::from_config(&config).unwrap();

    let response = handler.handle("POST", BUILD_COMPLETE).await;
    assert_eq!(
        response,
        RelayResponse::new(500, "Server Error: DISCORD_WEBHOOK_URL is not set")
    );

    // 校验先于投递配置检查
    let response = handler.handle("POST", br#"{"foo":"bar"}"#).await;
    assert_eq!(response.status, 400);
}

#[tokio::test]
async fn test_relay_dry_run_over_stdio() {
    let handler = RelayHandler::from_config(&RelayConfig::default().with_dry_run(true)).unwrap();

    let input = [
        std::str::from_utf8(BUILD_COMPLETE).unwrap(),
        r#"{"method":"PUT","body":"{}"}"#,
        r#"{"signedPayload":"a.b"}"#,
    ]
    .join("\n");

    let mut output = Vec::new();
    serve_lines(&handler, input.as_bytes(), &mut output).await.unwrap();

    let statuses: Vec<u64> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["status"].as_u64().unwrap())
        .collect();
    assert_eq!(statuses, vec![200, 405, 400]);
}
