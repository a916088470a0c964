//! ASC Relay - 把 App Store Connect webhook 通知转发为 Discord embed

pub mod cli;
pub mod config;
pub mod error;
pub mod notification;
pub mod relay;

pub use config::RelayConfig;
pub use error::{DecodeError, PipelineError};
pub use notification::{
    DecodedNotification, DeliveryChannel, Dispatcher, EmbedColor, PresentationMessage,
    RawEvent, RenderedField, SendResult,
};
pub use relay::{RelayChannel, RelayHandler, RelayResponse};
