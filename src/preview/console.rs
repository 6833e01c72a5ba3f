//! Host side of the preview message channel
//!
//! The sandboxed preview surface posts `{"type": "console", "method": ...,
//! "args": [...]}` messages back to the host. That is the only recognized
//! shape; everything else is silently dropped. Messages arrive in send
//! order per surface, but nothing here depends on ordering — stale lines
//! from a reloaded preview are just extra lines.

use serde::Deserialize;
use serde_json::Value;

/// Console methods the bridge forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Warn,
    Error,
}

impl ConsoleMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
        }
    }
}

/// One inbound message from the preview surface.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleMessage {
    #[serde(rename = "type")]
    kind: String,
    pub method: ConsoleMethod,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ConsoleMessage {
    /// Parse a raw channel payload. Returns `None` for anything that is not
    /// a well-formed console message — invalid JSON, a different type tag,
    /// or an unknown method.
    pub fn parse(raw: &str) -> Option<Self> {
        let msg: ConsoleMessage = serde_json::from_str(raw).ok()?;
        (msg.kind == "console").then_some(msg)
    }

    /// Render as one log line: `[method] arg arg ...`. String args appear
    /// bare, everything else as compact JSON.
    pub fn format_line(&self) -> String {
        let rendered: Vec<String> = self
            .args
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        format!("[{}] {}", self.method.as_str(), rendered.join(" "))
    }
}

/// Append-only log of console lines for the lifetime of a preview surface.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    lines: Vec<String>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and append one raw channel payload; unrecognized payloads are
    /// dropped without error.
    pub fn receive_raw(&mut self, raw: &str) {
        if let Some(msg) = ConsoleMessage::parse(raw) {
            self.lines.push(msg.format_line());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reset on preview reload.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_console_message() {
        let msg =
            ConsoleMessage::parse(r#"{"type":"console","method":"warn","args":["careful",2]}"#)
                .unwrap();
        assert_eq!(msg.method, ConsoleMethod::Warn);
        assert_eq!(msg.format_line(), "[warn] careful 2");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(ConsoleMessage::parse(r#"{"type":"resize","method":"log"}"#).is_none());
        assert!(ConsoleMessage::parse(r#"{"type":"console","method":"table"}"#).is_none());
        assert!(ConsoleMessage::parse("{").is_none());
        assert!(ConsoleMessage::parse("42").is_none());
    }

    #[test]
    fn test_missing_args_defaults_to_empty() {
        let msg = ConsoleMessage::parse(r#"{"type":"console","method":"error"}"#).unwrap();
        assert_eq!(msg.format_line(), "[error] ");
    }

    #[test]
    fn test_log_appends_and_clears() {
        let mut log = ConsoleLog::new();
        log.receive_raw(r#"{"type":"console","method":"log","args":["a"]}"#);
        log.receive_raw("garbage");
        log.receive_raw(r#"{"type":"console","method":"error","args":[{"k":1}]}"#);
        assert_eq!(
            log.lines(),
            vec!["[log] a".to_string(), r#"[error] {"k":1}"#.to_string()]
        );
        log.clear();
        assert!(log.is_empty());
    }
}
