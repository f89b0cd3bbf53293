//! Front matter extraction.
//!
//! A document may open with a YAML block fenced by `---` lines or a TOML block
//! fenced by `+++` lines. Only five keys are read: `date`, `project`, `title`,
//! `mood` and `time-spent`; everything else in the block is ignored. A document
//! with no block at all reads as if every key were empty.

use chrono::NaiveDate;
use tracing::debug;

use crate::duration::parse_duration;
use crate::error::MetadataError;

/// Typed metadata for one journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub date: NaiveDate,
    pub project: String,
    pub title: String,
    pub mood: String,
    pub time_spent_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    fn delimiter(self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Toml => "+++",
        }
    }
}

/// A front matter block split away from the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    pub format: FrontMatterFormat,
    pub block: &'a str,
    pub body: &'a str,
}

const KNOWN_KEYS: [&str; 5] = ["date", "project", "title", "mood", "time-spent"];

/// Raw string values as written in the block, before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RawFields {
    date: String,
    project: String,
    title: String,
    mood: String,
    time_spent: String,
}

/// Find the leading front matter block, if the document has one.
///
/// Blank lines (and a byte order mark) before the opening fence are allowed.
/// An opening fence without a matching closing fence is an error.
pub fn split_front_matter(text: &str) -> Result<Option<FrontMatter<'_>>, MetadataError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut offset = 0;
    let mut format = None;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        format = match trimmed {
            "---" => Some(FrontMatterFormat::Yaml),
            "+++" => Some(FrontMatterFormat::Toml),
            _ => None,
        };
        break;
    }
    let Some(format) = format else {
        return Ok(None);
    };

    let rest = &text[offset..];
    let mut block_len = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == format.delimiter() {
            let block = &rest[..block_len];
            let body = &rest[block_len + line.len()..];
            return Ok(Some(FrontMatter { format, block, body }));
        }
        block_len += line.len();
    }

    Err(MetadataError::MalformedFrontMatter(format!(
        "no closing {} after the opening fence",
        format.delimiter()
    )))
}

/// Parse and validate the document's front matter.
///
/// Validation order: `time-spent` must be present and non-empty, then it must
/// parse as a duration, then `date` must parse as `YYYY-MM-DD`.
pub fn extract_metadata(text: &str) -> Result<DocumentMetadata, MetadataError> {
    let raw = match split_front_matter(text)? {
        Some(front_matter) => {
            debug!(format = ?front_matter.format, "Parsing front matter");
            parse_block(front_matter.format, front_matter.block)?
        }
        None => {
            debug!("Document has no front matter block");
            RawFields::default()
        }
    };

    let time_spent_raw = raw.time_spent.trim();
    if time_spent_raw.is_empty() {
        return Err(MetadataError::MissingTimeSpent);
    }
    let time_spent = parse_duration(time_spent_raw).map_err(|e| MetadataError::InvalidDuration {
        value: time_spent_raw.to_string(),
        reason: e.to_string(),
    })?;

    let date_raw = raw.date.trim();
    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|source| {
        MetadataError::InvalidDate {
            value: date_raw.to_string(),
            source,
        }
    })?;

    Ok(DocumentMetadata {
        date,
        project: raw.project,
        title: raw.title,
        mood: raw.mood,
        time_spent_minutes: time_spent.minutes_rounded(),
    })
}

fn parse_block(format: FrontMatterFormat, block: &str) -> Result<RawFields, MetadataError> {
    let mut raw = RawFields::default();
    let mut assign = |key: &str, value: String| match key {
        "date" => raw.date = value,
        "project" => raw.project = value,
        "title" => raw.title = value,
        "mood" => raw.mood = value,
        "time-spent" => raw.time_spent = value,
        _ => {}
    };

    match format {
        FrontMatterFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(block)
                .map_err(|e| MetadataError::MalformedFrontMatter(e.to_string()))?;
            let mapping = match value {
                serde_yaml::Value::Null => serde_yaml::Mapping::new(),
                serde_yaml::Value::Mapping(mapping) => mapping,
                _ => {
                    return Err(MetadataError::MalformedFrontMatter(
                        "expected key/value pairs".to_string(),
                    ))
                }
            };
            for (key, value) in mapping {
                let Some(key) = key.as_str().filter(|k| KNOWN_KEYS.contains(k)) else {
                    continue;
                };
                let value = yaml_scalar(key, value)?;
                assign(key, value);
            }
        }
        FrontMatterFormat::Toml => {
            let table: toml::Table = toml::from_str(block)
                .map_err(|e| MetadataError::MalformedFrontMatter(e.to_string()))?;
            for (key, value) in table {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    continue;
                }
                let value = toml_scalar(&key, value)?;
                assign(&key, value);
            }
        }
    }
    Ok(raw)
}

fn yaml_scalar(key: &str, value: serde_yaml::Value) -> Result<String, MetadataError> {
    use serde_yaml::Value;
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Tagged(tagged) => yaml_scalar(key, tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(not_a_scalar(key)),
    }
}

fn toml_scalar(key: &str, value: toml::Value) -> Result<String, MetadataError> {
    use toml::Value;
    match value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(not_a_scalar(key)),
    }
}

fn not_a_scalar(key: &str) -> MetadataError {
    MetadataError::MalformedFrontMatter(format!("field `{key}` must be a single value"))
}
