//! Lesson vocabulary loading.
//!
//! # Format
//! ```json
//! [
//!   {
//!     "dars": 3,
//!     "so'zlar": [
//!       { "kana": "水", "jp": "みず", "uzb": "suv" }
//!     ]
//!   }
//! ]
//! ```
//! Field names are fixed by the data provider. The label of the first group names
//! the whole run; words of every group are flattened in file order.

use crate::error::LoadError;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// One flashcard worth of text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordEntry {
    #[serde(rename = "kana")]
    pub front: String,
    #[serde(rename = "jp")]
    pub reading: String,
    #[serde(rename = "uzb")]
    pub translation: String,
}

impl WordEntry {
    pub fn new(
        front: impl Into<String>,
        reading: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            reading: reading.into(),
            translation: translation.into(),
        }
    }
}

/// All entries of one run plus the label shown on captions and in the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub label: String,
    pub entries: Vec<WordEntry>,
}

#[derive(Debug, Deserialize)]
struct LessonGroup {
    dars: serde_json::Value,
    #[serde(rename = "so'zlar")]
    words: Vec<WordEntry>,
}

/// Read and parse the vocabulary file at `path`.
pub fn load_lesson(path: impl AsRef<Path>) -> Result<Lesson, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lesson = parse_lesson(&content)?;
    debug!(
        "Loaded {} words for lesson {} from {}",
        lesson.entries.len(),
        lesson.label,
        path.display()
    );
    Ok(lesson)
}

/// Parse vocabulary JSON already in memory.
pub fn parse_lesson(content: &str) -> Result<Lesson, LoadError> {
    let groups: Vec<LessonGroup> = serde_json::from_str(content)?;
    let first = groups.first().ok_or(LoadError::NoLessons)?;
    let label = label_text(&first.dars)?;

    let entries = groups.into_iter().flat_map(|group| group.words).collect();
    Ok(Lesson { label, entries })
}

fn label_text(value: &serde_json::Value) -> Result<String, LoadError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(LoadError::InvalidLabel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_LESSONS: &str = r#"[
        {"dars": 5, "so'zlar": [
            {"kana": "水", "jp": "みず", "uzb": "suv"},
            {"kana": "火", "jp": "ひ", "uzb": "olov"}
        ]},
        {"dars": 6, "so'zlar": [
            {"kana": "木", "jp": "き", "uzb": "daraxt, yog'och"}
        ]}
    ]"#;

    #[test]
    fn flattens_groups_in_order() {
        let lesson = parse_lesson(TWO_LESSONS).unwrap();
        assert_eq!(lesson.label, "5");
        assert_eq!(
            lesson.entries,
            vec![
                WordEntry::new("水", "みず", "suv"),
                WordEntry::new("火", "ひ", "olov"),
                WordEntry::new("木", "き", "daraxt, yog'och"),
            ]
        );
    }

    #[test]
    fn string_label_is_kept_verbatim() {
        let lesson = parse_lesson(r#"[{"dars": "N5-1", "so'zlar": []}]"#).unwrap();
        assert_eq!(lesson.label, "N5-1");
        assert!(lesson.entries.is_empty());
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = parse_lesson(r#"[{"dars": 1, "so'zlar": [{"kana": "水", "jp": "みず"}]}]"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)), "got {err}");
    }

    #[test]
    fn empty_list_has_no_label() {
        assert!(matches!(parse_lesson("[]").unwrap_err(), LoadError::NoLessons));
    }

    #[test]
    fn object_label_is_rejected() {
        let err = parse_lesson(r#"[{"dars": {"n": 1}, "so'zlar": []}]"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidLabel(_)), "got {err}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_lesson("no/such/words.json").unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert_eq!(path, Path::new("no/such/words.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, TWO_LESSONS).unwrap();

        let lesson = load_lesson(&path).unwrap();
        assert_eq!(lesson.entries.len(), 3);
    }
}
