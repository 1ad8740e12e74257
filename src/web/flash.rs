//! Session-backed flash messages.
//!
//! Mutating handlers push a message and redirect; the next page render
//! takes (and clears) the pending messages, the classic POST-redirect-GET
//! flow.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

const FLASH_KEY: &str = "_flashes";

/// Severity of a flash message, mapped to a banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    /// The operation succeeded.
    Success,
    /// Neutral information.
    Info,
    /// The request was refused (validation, missing fields).
    Warning,
    /// The operation failed.
    Danger,
}

impl FlashLevel {
    /// The CSS class suffix used by the page layout.
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// One pending flash message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Severity.
    pub level: FlashLevel,
    /// The message text.
    pub message: String,
}

/// Queues a flash message on the session.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> AppResult<()> {
    let mut flashes: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    flashes.push(Flash {
        level,
        message: message.into(),
    });
    session.insert(FLASH_KEY, flashes).await?;
    Ok(())
}

/// Takes and clears the pending flash messages.
pub async fn take(session: &Session) -> AppResult<Vec<Flash>> {
    Ok(session.remove(FLASH_KEY).await?.unwrap_or_default())
}
