use crate::error::AnalysisError;
use crate::record::MetricsRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `record` as JSON to `path`.
///
/// The record goes to a sibling `.tmp` file first and is renamed into place,
/// so `path` either holds the complete record or is left untouched.
pub fn save_json(record: &MetricsRecord, path: &Path, pretty: bool) -> Result<PathBuf, AnalysisError> {
    info!(path = %path.display(), "writing JSON file");
    let data = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, data).map_err(|e| AnalysisError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Reads a record previously written by [`save_json`].
pub fn load_json(path: &Path) -> Result<MetricsRecord, AnalysisError> {
    let data = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::create_record;
    use tempfile::TempDir;

    fn record() -> MetricsRecord {
        create_record(
            13.877,
            (-375.0, 606.25),
            4,
            17,
            vec![0.956, 1.706, 2.456, 3.206],
        )
    }

    #[test]
    fn test_save_and_load_round_trip() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("test_data32.json");

        let written = save_json(&record(), &path, false)?;
        assert_eq!(written, path);
        assert_eq!(load_json(&path)?, record());
        assert!(!tmpdir.path().join("test_data32.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_pretty_output_round_trips() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("pretty.json");

        save_json(&record(), &path, true)?;
        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains('\n'));
        assert_eq!(load_json(&path)?, record());
        Ok(())
    }

    #[test]
    fn test_save_creates_missing_dirs() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("nested/out/strip.json");

        save_json(&record(), &path, false)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_save_overwrites_previous_record() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("strip.json");

        save_json(&create_record(1.0, (0.0, 1.0), 0, 0, vec![]), &path, false)?;
        save_json(&record(), &path, false)?;
        assert_eq!(load_json(&path)?.num_beats, 4);
        Ok(())
    }

    #[test]
    fn test_load_rejects_incomplete_record() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("partial.json");
        std::fs::write(&path, r#"{"duration": 1.0, "num_beats": 2}"#)?;

        assert!(matches!(load_json(&path), Err(AnalysisError::Serialization(_))));
        Ok(())
    }
}
