//! CSV and trace file writers.

use std::path::Path;

use rtm_model::TraceEntry;
use tracing::info;

use crate::cell::header_line;
use crate::error::{OutputError, Result};

/// Header line plus rows, joined by `\n` without a trailing newline.
pub fn csv_contents(headers: &[String], lines: &[String]) -> String {
    let mut out = header_line(headers);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Write the import CSV, creating parent directories as needed.
pub fn write_csv(path: &Path, headers: &[String], lines: &[String]) -> Result<()> {
    ensure_parent(path)?;
    write_file(path, csv_contents(headers, lines))?;
    info!(path = %path.display(), rows = lines.len(), "wrote CSV");
    Ok(())
}

/// The trace as pretty-printed JSON (two-space indent).
pub fn trace_json(trace: &[TraceEntry]) -> Result<String> {
    serde_json::to_string_pretty(trace).map_err(|e| OutputError::Serialize { source: e })
}

/// Write the CSV and its trace together.
///
/// The trace is serialized and both parent directories exist before the
/// CSV is written, so a failure there leaves neither file behind.
pub fn write_outputs(
    csv_path: &Path,
    trace_path: &Path,
    headers: &[String],
    lines: &[String],
    trace: &[TraceEntry],
) -> Result<()> {
    let json = trace_json(trace)?;
    ensure_parent(csv_path)?;
    ensure_parent(trace_path)?;
    write_csv(csv_path, headers, lines)?;
    write_file(trace_path, json)?;
    info!(path = %trace_path.display(), entries = trace.len(), "wrote trace");
    Ok(())
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rtm_model::EmissionKind;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_csv_has_no_trailing_newline() {
        let headers = vec!["TYPE".to_string(), "CONTENT".to_string()];
        let lines = vec!["task,a".to_string(), "note,b".to_string()];
        assert_eq!(csv_contents(&headers, &lines), "TYPE,CONTENT\ntask,a\nnote,b");
        assert_eq!(csv_contents(&headers, &[]), "TYPE,CONTENT");
    }

    #[test]
    fn test_writers_create_directories() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("nested/out.csv");
        let trace_path = dir.path().join("nested/deeper/used.json");
        let headers = vec!["TYPE".to_string()];
        let trace = vec![TraceEntry {
            kind: EmissionKind::Task,
            data: json!({"id": "1"}),
        }];
        write_outputs(&csv_path, &trace_path, &headers, &["task".to_string()], &trace).unwrap();

        assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), "TYPE\ntask");
        let written = std::fs::read_to_string(&trace_path).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"type\": \"task\",\n    \"data\": {\n      \"id\": \"1\"\n    }\n  }\n]"
        );
    }

    #[test]
    fn test_outputs_leave_no_csv_when_trace_dir_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let csv_path = dir.path().join("out.csv");
        let trace = vec![TraceEntry {
            kind: EmissionKind::Note,
            data: json!({"id": "N1"}),
        }];

        let err = write_outputs(
            &csv_path,
            &blocker.join("used.json"),
            &["TYPE".to_string()],
            &["note".to_string()],
            &trace,
        )
        .unwrap_err();

        assert!(matches!(err, OutputError::CreateDir { .. }));
        assert!(!csv_path.exists());
    }

    #[test]
    fn test_outputs_write_both_files() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("a/out.csv");
        let trace_path = dir.path().join("b/used.json");

        write_outputs(&csv_path, &trace_path, &["TYPE".to_string()], &[], &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), "TYPE");
        assert_eq!(std::fs::read_to_string(&trace_path).unwrap(), "[]");
    }

    #[test]
    fn test_write_into_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_csv(&blocker.join("out.csv"), &[], &[]).unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }
}
