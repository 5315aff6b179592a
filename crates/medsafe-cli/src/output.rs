//! Output formatting helpers.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use colored::Colorize;
use serde::Serialize;

use medsafe_core::Error;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning the user should act on.
pub fn notice(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a labeled field if it has a value.
pub fn field_opt(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        field(label, value);
    }
}

/// Print a dimmed hint on stderr.
pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and zone-less ISO 8601; anything else is returned as-is.
pub fn timestamp(raw: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format(FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The line shown for a failed command.
///
/// Backend failures show the backend's own message when it sent one.
/// Everything else shows the context chain.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(inner) if inner.as_api().is_some() => {
            let fallback = match inner.status() {
                Some(status) => format!("{} (HTTP {})", err, status),
                None => err.to_string(),
            };
            inner.user_message(&fallback)
        }
        _ => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use medsafe_core::error::{ApiError, TransportError};

    #[test]
    fn formats_timestamps() {
        assert_eq!(timestamp("2024-05-01T10:00:00"), "2024-05-01 10:00");
        assert_eq!(timestamp("2024-05-01T10:00:00.123456"), "2024-05-01 10:00");
        assert_eq!(timestamp("2024-05-01T10:00:00+09:00"), "2024-05-01 10:00");
        assert_eq!(timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn backend_message_wins() {
        let err = Err::<(), _>(Error::Api(ApiError::new(
            409,
            None,
            Some("ingredient already registered".into()),
        )))
        .context("Failed to add allergy")
        .unwrap_err();
        assert_eq!(describe_error(&err), "ingredient already registered");
    }

    #[test]
    fn falls_back_to_context_and_status() {
        let err = Err::<(), _>(Error::Api(ApiError::new(500, None, None)))
            .context("Failed to list allergies")
            .unwrap_err();
        assert_eq!(describe_error(&err), "Failed to list allergies (HTTP 500)");
    }

    #[test]
    fn transport_errors_show_the_chain() {
        let err = Err::<(), _>(Error::Transport(TransportError::Connection {
            message: "refused".into(),
        }))
        .context("Failed to list allergies")
        .unwrap_err();
        let line = describe_error(&err);
        assert!(line.starts_with("Failed to list allergies: "));
        assert!(line.contains("refused"));
    }
}
