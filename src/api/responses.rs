//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current controller status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub busy: bool,
    /// Sequence holding the buttons, if any
    pub busy_with: Option<String>,
    pub busy_for_seconds: Option<u64>,
    pub brew_count: u64,
    pub failed_log_writes: u64,
    pub active_tasks: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Status page shown after every redirect
#[derive(Debug, Clone)]
pub struct HomePage {
    pub num: u64,
    pub message: String,
}

impl HomePage {
    /// Pick the message for a redirect target like `s`, `n12` or `b`
    pub fn for_page(num: u64, page: &str, boot_secs: u64) -> Self {
        let rest = page.get(1..).unwrap_or("");
        let message = match page.get(..1) {
            Some("s") => "Starting coffee machine".to_string(),
            Some("n") if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => {
                format!("Brewing coffee number #{}", rest)
            }
            Some("b") => format!(
                "Now booting the machine, will reject requests for the next {} Seconds",
                boot_secs
            ),
            _ => "no status message".to_string(),
        };
        Self { num, message }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Coffee</title></head>
<body>
<h1>Coffee</h1>
<p>{message}</p>
<p>Coffees brewed: {num}</p>
<p><a href="/start/">Power</a> | <a href="/brew/">Brew</a> | <a href="/both/">Power and brew</a> | <a href="/data/data.csv">Data</a></p>
</body>
</html>
"#,
            message = self.message,
            num = self.num,
        )
    }
}
