//! Front-matter parsing

use serde::{Deserialize, Deserializer};

/// Line that opens and closes a front-matter block
const DELIMITER: &str = "---";

/// Accepts any YAML scalar and keeps its string form.
/// `null`, sequences and mappings are treated as absent.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Front-matter data from a post
///
/// Only `title` and `date` are recognized; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
}

impl FrontMatter {
    /// Split a file into front-matter and markdown body.
    ///
    /// Never fails: a missing block yields empty metadata and the whole file
    /// as body, and a block that is not valid YAML yields empty metadata and
    /// the text after the block.
    pub fn parse(content: &str) -> (Self, &str) {
        let source = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some((yaml, body)) = split_block(source) else {
            return (FrontMatter::default(), source);
        };

        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => (fm, body),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, using defaults: {}", e);
                (FrontMatter::default(), body)
            }
        }
    }
}

/// Locate a `---` delimited block at the very start of `source`.
/// Returns the raw block text and everything after the closing line.
fn split_block(source: &str) -> Option<(&str, &str)> {
    let (first, block) = split_line(source)?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let mut rest = block;
    let mut consumed = 0;
    while let Some((line, after)) = split_line(rest) {
        if line.trim_end() == DELIMITER {
            return Some((&block[..consumed], after));
        }
        consumed += rest.len() - after.len();
        rest = after;
    }

    None
}

/// Split off the first line, without its terminator (`\n` or `\r\n`)
fn split_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(pos) => Some((s[..pos].trim_end_matches('\r'), &s[pos + 1..])),
        None => Some((s, "")),
    }
}
