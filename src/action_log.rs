//! Action logging for Plotkeeper commands.
//!
//! Every CLI invocation against an initialized garden is appended to
//! `action.log` in the garden's storage directory as one JSON object per line.

use crate::config::{ConfigOverrides, resolve_config};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// A single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// When the command finished
    pub timestamp: DateTime<Utc>,

    /// Garden working directory the command ran against
    pub garden_path: String,

    /// Command name (e.g., "cell plant", "harvests")
    pub command: String,

    /// Sanitized command arguments
    pub args: serde_json::Value,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Log an action for the garden at `garden_path`.
///
/// Never fails: gardens that are not initialized are skipped, and write
/// errors are reported as warnings so logging cannot break a command.
pub fn log_action(
    garden_path: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    let storage = match Storage::open(garden_path) {
        Ok(storage) => storage,
        Err(_) => return,
    };

    let enabled = resolve_config(&storage, &ConfigOverrides::default())
        .map(|c| c.action_log_enabled())
        .unwrap_or(true);
    if !enabled {
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        garden_path: garden_path.to_string_lossy().to_string(),
        command: command.to_string(),
        args: sanitize_args(&args),
        success,
        error,
        duration_ms,
        user: get_current_user(),
    };

    if let Err(e) = write_log_entry(&storage.action_log_path(), &entry) {
        tracing::warn!(error = %e, "failed to write action log");
    }
}

/// Read every entry from a garden's action log, skipping malformed lines.
pub fn read_entries(storage: &Storage) -> crate::Result<Vec<ActionLog>> {
    let path = storage.action_log_path();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

fn write_log_entry(path: &Path, entry: &ActionLog) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// Shorten arguments before they are written: paths become basenames, long
/// strings and arrays are summarized.
fn sanitize_args(args: &serde_json::Value) -> serde_json::Value {
    match args {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), sanitize_args(value)))
                .collect(),
        ),
        serde_json::Value::Array(arr) => {
            if arr.len() > 10 {
                serde_json::Value::String(format!("[Array with {} items]", arr.len()))
            } else {
                serde_json::Value::Array(arr.iter().map(sanitize_args).collect())
            }
        }
        serde_json::Value::String(s) => {
            let sanitized = if s.contains('/') || s.contains('\\') {
                s.rsplit(['/', '\\']).next().unwrap_or(s).to_string()
            } else {
                s.clone()
            };

            if sanitized.chars().count() > 100 {
                let head: String = sanitized.chars().take(97).collect();
                serde_json::Value::String(format!(
                    "{}... ({} chars)",
                    head,
                    sanitized.chars().count()
                ))
            } else {
                serde_json::Value::String(sanitized)
            }
        }
        _ => args.clone(),
    }
}

fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_sanitize_plain_values() {
        assert_eq!(sanitize_args(&serde_json::json!("Basil")), serde_json::json!("Basil"));
        assert_eq!(sanitize_args(&serde_json::json!(21)), serde_json::json!(21));
    }

    #[test]
    fn test_sanitize_location_path() {
        let value = serde_json::json!({ "location": "/home/alice/garden/patio" });
        assert_eq!(sanitize_args(&value)["location"], "patio");
    }

    #[test]
    fn test_sanitize_long_string() {
        let long_name = "x".repeat(150);
        let sanitized = sanitize_args(&serde_json::json!(long_name));
        let s = sanitized.as_str().unwrap();
        assert!(s.ends_with("... (150 chars)"));
    }

    #[test]
    fn test_sanitize_multibyte_string_does_not_split_chars() {
        let name = "é".repeat(120);
        let sanitized = sanitize_args(&serde_json::json!(name));
        assert!(sanitized.as_str().unwrap().contains("(120 chars)"));
    }

    #[test]
    fn test_sanitize_large_array() {
        let arr: Vec<i32> = (0..15).collect();
        let sanitized = sanitize_args(&serde_json::json!(arr));
        assert_eq!(sanitized, serde_json::json!("[Array with 15 items]"));
    }

    #[test]
    fn test_write_and_read_entries() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        let entry = ActionLog {
            timestamp: Utc::now(),
            garden_path: env.path().display().to_string(),
            command: "summary".to_string(),
            args: serde_json::json!({}),
            success: true,
            error: None,
            duration_ms: 3,
            user: "tester".to_string(),
        };
        write_log_entry(&storage.action_log_path(), &entry).unwrap();
        write_log_entry(&storage.action_log_path(), &entry).unwrap();
        fs::OpenOptions::new()
            .append(true)
            .open(storage.action_log_path())
            .unwrap()
            .write_all(b"not json\n")
            .unwrap();

        let entries = read_entries(&storage).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "summary");
        assert!(entries[0].error.is_none());
    }
}
