//! File system helpers for the output sink

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Normalize a path lexically (collapses `.` and `..` without touching disk)
pub fn normalize_path(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Serialize `value` as two-space-indented JSON and write it to `path`.
///
/// Missing parent directories are created. The document is written to a
/// temporary file next to the target and renamed over it, so readers never
/// observe a half-written file.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> crate::Result<()> {
    let path = normalize_path(path);
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| crate::UtilError::Serialization(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(&path)
        .map_err(|e| crate::UtilError::PathOperation(format!("{}: {}", path.display(), e.error)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
    }

    #[test]
    fn test_write_json_creates_parents() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let target = temp_dir.path().join("nested").join("deeper").join("out.json");

        write_json_pretty(&target, &serde_json::json!({"a": [1, 2]}))?;

        let written = std::fs::read_to_string(&target)?;
        assert_eq!(written, "{\n  \"a\": [\n    1,\n    2\n  ]\n}\n");
        Ok(())
    }

    #[test]
    fn test_write_json_replaces_existing() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let target = temp_dir.path().join("out.json");
        std::fs::write(&target, "stale")?;

        write_json_pretty(&target, &vec!["fresh"])?;

        let written = std::fs::read_to_string(&target)?;
        assert!(written.contains("fresh"));
        assert!(!written.contains("stale"));
        Ok(())
    }

    proptest! {
        #[test]
        fn test_normalize_path_is_idempotent(segments in prop::collection::vec("[a-z]{1,4}|\\.|\\.\\.", 1..8)) {
            let joined: PathBuf = segments.iter().collect();
            let once = normalize_path(&joined);
            prop_assert_eq!(normalize_path(&once), once);
        }
    }
}
