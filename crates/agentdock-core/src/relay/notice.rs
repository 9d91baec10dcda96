//! Canned user-facing notices for relay failures.

use std::time::Duration;

use super::error::{RelayError, RelayErrorKind};
use crate::rich_text::RichText;

/// Builds the agent notice shown for a failed relay call.
pub fn failure_notice(error: &RelayError, timeout: Duration) -> RichText {
    match error.kind {
        RelayErrorKind::Timeout => timeout_notice(timeout),
        RelayErrorKind::Connectivity => connectivity_notice(),
        RelayErrorKind::HttpStatus => generic_notice(&match error.status {
            Some(status) => format!("API request failed (HTTP {status})"),
            None => "API request failed".to_string(),
        }),
        RelayErrorKind::Generic => generic_notice(&error.message),
    }
}

fn timeout_notice(timeout: Duration) -> RichText {
    let mut notice = RichText::new();
    notice
        .strong("⏱ Request timed out")
        .line_break()
        .line_break()
        .text(&format!(
            "The agent took longer than {} to answer.",
            describe_timeout(timeout)
        ))
        .line_break()
        .line_break()
        .text("Suggestions:")
        .line_break()
        .text("1. Simplify your question")
        .line_break()
        .text("2. Check that the model service is healthy")
        .line_break()
        .text("3. Consider a smaller model");
    notice
}

/// Whole seconds read as seconds; anything else as milliseconds.
fn describe_timeout(timeout: Duration) -> String {
    match timeout.as_secs() {
        1 if timeout.subsec_nanos() == 0 => "1 second".to_string(),
        secs if secs > 0 && timeout.subsec_nanos() == 0 => format!("{secs} seconds"),
        _ => format!("{} ms", timeout.as_millis()),
    }
}

fn connectivity_notice() -> RichText {
    let mut notice = RichText::new();
    notice
        .strong("✖ Cannot reach the AI agent")
        .line_break()
        .line_break()
        .text("Please confirm:")
        .line_break()
        .text("1. The backend service is running")
        .line_break()
        .text("2. The model server is started ")
        .code("ollama serve")
        .line_break()
        .text("3. The model is installed ")
        .code("ollama pull qwen2.5:7b");
    notice
}

fn generic_notice(detail: &str) -> RichText {
    let mut notice = RichText::new();
    notice.text("Sorry, an error occurred: ").text(detail);
    notice
}
