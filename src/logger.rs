//! Tag-based logging for CryptoTracker
//!
//! Colored console output with per-subsystem tags. Debug output is gated
//! behind the `--debug` flag (or `set_debug(true)` in tests).

use chrono::Utc;
use colored::*;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Subsystem tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Config,
    Webserver,
    Cache,
    Market,
    Portfolio,
    Chat,
    Api,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Webserver => "WEBSERVER",
            LogTag::Cache => "CACHE",
            LogTag::Market => "MARKET",
            LogTag::Portfolio => "PORTFOLIO",
            LogTag::Chat => "CHAT",
            LogTag::Api => "API",
        }
    }
}

/// Enable or disable debug output (normally driven by `--debug`)
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_debug() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

fn timestamp() -> String {
    Utc::now().format("%H:%M:%S%.3f").to_string()
}

fn emit(symbol: ColoredString, tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        symbol,
        format!("[{}]", timestamp()).dimmed(),
        tag.as_str().bold(),
        message
    );
    io::stdout().flush().ok();
}

pub fn info(tag: LogTag, message: &str) {
    emit("ℹ".blue().bold(), tag, message);
}

pub fn warning(tag: LogTag, message: &str) {
    emit("⚠".yellow().bold(), tag, &message.yellow().to_string());
}

pub fn error(tag: LogTag, message: &str) {
    emit("❌".red().bold(), tag, &message.red().to_string());
}

pub fn debug(tag: LogTag, message: &str) {
    if is_debug() {
        emit("🐛".purple().bold(), tag, &message.dimmed().to_string());
    }
}
