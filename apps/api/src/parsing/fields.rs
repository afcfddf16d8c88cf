//! Field list parsing — turns a model reply containing a JSON array of question
//! fields into validated `FieldDescriptor`s with unique slug ids.
//!
//! The reply is uncontrolled text, so the array is located by bracket position
//! (first `[` to last `]`) and every element is normalized rather than rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Input widget for a single application question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Select,
}

impl FieldType {
    /// Case-insensitive; anything unrecognized is `None`.
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "textarea" => Some(FieldType::Textarea),
            "select" => Some(FieldType::Select),
            _ => None,
        }
    }
}

/// One admissions question as a renderable form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub optional: bool,
    /// Only present for `select` fields, and then never empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum FieldParseError {
    #[error("no JSON array found in reply")]
    MissingArray,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON value is not an array")]
    NotAnArray,
}

/// Parses a reply into fields, returning an empty list for anything unusable.
pub fn parse_fields(raw: &str) -> Vec<FieldDescriptor> {
    match try_parse_fields(raw) {
        Ok(fields) => fields,
        Err(e) => {
            debug!("Field list not parseable: {e}");
            Vec::new()
        }
    }
}

/// Like [`parse_fields`] but reports why a reply could not be used.
pub fn try_parse_fields(raw: &str) -> Result<Vec<FieldDescriptor>, FieldParseError> {
    let candidate = slice_json_array(raw).ok_or(FieldParseError::MissingArray)?;
    let value: Value = serde_json::from_str(candidate)?;
    let elements = match value {
        Value::Array(elements) => elements,
        _ => return Err(FieldParseError::NotAnArray),
    };

    let mut taken = HashSet::new();
    let fields = elements
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|obj| normalize_field(obj, &mut taken))
        .collect();

    Ok(fields)
}

/// Slices from the first `[` to the last `]`, inclusive.
fn slice_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (start < end).then(|| &raw[start..=end])
}

fn normalize_field(obj: &Map<String, Value>, taken: &mut HashSet<String>) -> Option<FieldDescriptor> {
    let supplied_id = non_blank_str(obj.get("id"));
    let label = non_blank_str(obj.get("label")).or(supplied_id)?;

    let mut field_type = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(FieldType::parse)
        .unwrap_or_default();

    let optional = match obj.get("optional").and_then(Value::as_bool) {
        Some(optional) => optional,
        None => obj
            .get("required")
            .and_then(Value::as_bool)
            .map(|required| !required)
            .unwrap_or(false),
    };

    let options = match field_type {
        FieldType::Select => {
            let options = string_list(obj.get("options"));
            if options.is_empty() {
                // A select with nothing to choose from renders as free text.
                field_type = FieldType::Text;
                None
            } else {
                Some(options)
            }
        }
        _ => None,
    };

    let base = slugify(supplied_id.unwrap_or(label));
    let id = unique_id(base, taken);

    Some(FieldDescriptor {
        id,
        label: label.to_string(),
        field_type,
        optional,
        options,
    })
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Lowercases, collapses runs of non-alphanumerics into `-` and strips edge dashes.
/// Returns `"field"` when nothing alphanumeric remains.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for c in label.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "field".to_string()
    } else {
        slug
    }
}

/// Appends `-2`, `-3`, … until the id is unused, then records it.
fn unique_id(base: String, taken: &mut HashSet<String>) -> String {
    let id = if taken.contains(&base) {
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default()
    } else {
        base
    };
    taken.insert(id.clone());
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_json_returns_empty() {
        assert!(parse_fields("Sorry, I could not find any questions.").is_empty());
        assert!(parse_fields("").is_empty());
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let fields = parse_fields(r#"Intro text [{"label":"GPA","type":"text"}] trailing"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "gpa");
        assert_eq!(fields[0].label, "GPA");
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert!(!fields[0].optional);
        assert!(fields[0].options.is_none());
    }

    #[test]
    fn test_duplicate_labels_get_suffixes() {
        let fields = parse_fields(
            r#"[{"label":"Essay","type":"textarea"},{"label":"Essay","type":"textarea"},{"label":"essay!","type":"textarea"}]"#,
        );
        let ids: Vec<_> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["essay", "essay-2", "essay-3"]);
    }

    #[test]
    fn test_suffix_skips_ids_already_taken() {
        let fields = parse_fields(
            r#"[{"label":"Essay"},{"label":"Essay 2"},{"label":"Essay"}]"#,
        );
        let ids: Vec<_> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["essay", "essay-2", "essay-3"]);
    }

    #[test]
    fn test_select_without_options_is_demoted_to_text() {
        let fields = parse_fields(r#"[{"label":"Legacy?","type":"select"}]"#);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert!(fields[0].options.is_none());

        let fields = parse_fields(r#"[{"label":"Legacy?","type":"select","options":[" ", ""]}]"#);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert!(fields[0].options.is_none());
    }

    #[test]
    fn test_select_keeps_options_in_order() {
        let fields = parse_fields(
            r#"[{"id":"legacy","label":"Any legacy?","type":"select","options":["Yes","No"]}]"#,
        );
        assert_eq!(fields[0].field_type, FieldType::Select);
        assert_eq!(
            fields[0].options.as_deref(),
            Some(&["Yes".to_string(), "No".to_string()][..])
        );
    }

    #[test]
    fn test_options_dropped_for_non_select() {
        let fields = parse_fields(r#"[{"label":"Why us?","type":"textarea","options":["a"]}]"#);
        assert_eq!(fields[0].field_type, FieldType::Textarea);
        assert!(fields[0].options.is_none());
    }

    #[test]
    fn test_invalid_or_missing_type_defaults_to_text() {
        let fields = parse_fields(r#"[{"label":"A","type":"checkbox"},{"label":"B"},{"label":"C","type":"TextArea"}]"#);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[1].field_type, FieldType::Text);
        assert_eq!(fields[2].field_type, FieldType::Textarea);
    }

    #[test]
    fn test_optional_flag_and_required_fallback() {
        let fields = parse_fields(
            r#"[{"label":"A","optional":true},{"label":"B","required":false},{"label":"C","required":true},{"label":"D","optional":"yes"}]"#,
        );
        let optional: Vec<_> = fields.iter().map(|f| f.optional).collect();
        assert_eq!(optional, vec![true, true, false, false]);
    }

    #[test]
    fn test_supplied_id_is_slugified_and_label_falls_back_to_id() {
        let fields = parse_fields(r#"[{"id":"Why This Major","type":"textarea"},{"label":"","id":""}]"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "why-this-major");
        assert_eq!(fields[0].label, "Why This Major");
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let fields = parse_fields(r#"["GPA", 3, null, {"label":"Major"}]"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "major");
    }

    #[test]
    fn test_try_parse_reports_failure_kind() {
        assert!(matches!(
            try_parse_fields("no brackets"),
            Err(FieldParseError::MissingArray)
        ));
        assert!(matches!(
            try_parse_fields("] reversed ["),
            Err(FieldParseError::MissingArray)
        ));
        assert!(matches!(
            try_parse_fields("[not json]"),
            Err(FieldParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_fenced_reply() {
        let raw = "```json\n[{\"label\":\"Intended major\",\"type\":\"text\"}]\n```";
        let fields = parse_fields(raw);
        assert_eq!(fields[0].id, "intended-major");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Why UChicago? (250 words) "), "why-uchicago-250-words");
        assert_eq!(slugify("--A  --  B--"), "a-b");
        assert_eq!(slugify("???"), "field");
    }

    #[test]
    fn test_serialized_shape() {
        let fields = parse_fields(r#"[{"label":"GPA"},{"label":"Legacy","type":"select","options":["Yes","No"]}]"#);
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert!(json[0].get("options").is_none());
        assert_eq!(json[1]["type"], "select");
        assert_eq!(json[1]["options"][1], "No");
    }
}
