//! 通知管道 - 解码 → 分类 → 渲染 → 投递
//!
//! # 数据流
//! 1. `Dispatcher` 识别入站文档格式
//! 2. `token` 解码 signedPayload，或 `event` 分类 raw event
//! 3. `renderer` 生成 `PresentationMessage`
//! 4. `DeliveryChannel` 投递到 Discord
//!
//! # 使用示例
//! ```
//! use asc_relay::notification::Dispatcher;
//!
//! let document = serde_json::json!({
//!     "data": { "type": "webhookPingCreated", "id": "42", "attributes": {} }
//! });
//! let message = Dispatcher::new().dispatch(&document).unwrap();
//! assert_eq!(message.title, "Webhook Configured Successfully");
//! ```

pub mod channel;
pub mod channels;
pub mod clock;
pub mod dispatcher;
pub mod event;
pub mod message;
pub mod palette;
pub mod renderer;
pub mod token;

pub use channel::{DeliveryChannel, SendResult};
pub use channels::{DiscordWebhookChannel, DiscordWebhookConfig, DryRunChannel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatcher::{Dispatcher, InboundFormat};
pub use event::{classify, ClassifiedEvent, EventKind, RawEvent, Relationship};
pub use message::{PresentationMessage, RenderedField};
pub use palette::EmbedColor;
pub use renderer::{render_classified, render_decoded};
pub use token::{decode_header, decode_signed_payload, DecodedNotification, TokenHeader};
