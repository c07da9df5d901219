//! # Smart Comments
//!
//! Database objects carry their annotations in their comments. A comment's leading lines that
//! start with `@` are tags, either flags (`@omit`) or carrying a value (`@patch patch app.users`).
//! The first line that isn't a tag ends the tag block and the remaining text is the description.
//!
//! ```
//! use graphql_patch::tags::{parse_smart_comment, TagValue};
//!
//! let comment = parse_smart_comment("@patch patch app.users\nUpdates a user.");
//! assert_eq!(
//!     comment.tags.get("patch"),
//!     Some(&TagValue::Text("patch app.users".into()))
//! );
//! assert_eq!(comment.description.as_deref(), Some("Updates a user."));
//! ```

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Map of tag names to their values, as attached to a single database object.
pub type Tags = HashMap<String, TagValue>;

/// The value of a single tag.
///
/// Repeating a tag collects its values into a list, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    /// A tag without a value, e.g. `@omit`
    Flag(bool),
    /// A tag that was given a single value
    Text(String),
    /// A tag that was given several times
    List(Vec<String>),
}

impl TagValue {
    /// Returns the values of this tag in order. Flags have no values.
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::Flag(_) => Vec::new(),
            TagValue::Text(value) => vec![value.as_str()],
            TagValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the single value of this tag, if it has exactly one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(value) => Some(value),
            _ => None,
        }
    }

    fn push(self, value: TagValue) -> TagValue {
        match (self, value) {
            (TagValue::Flag(_), value) => value,
            (existing, TagValue::Flag(_)) => existing,
            (TagValue::Text(first), TagValue::Text(second)) => TagValue::List(vec![first, second]),
            (TagValue::Text(first), TagValue::List(rest)) => {
                TagValue::List(std::iter::once(first).chain(rest).collect())
            }
            (TagValue::List(mut values), TagValue::Text(value)) => {
                values.push(value);
                TagValue::List(values)
            }
            (TagValue::List(mut values), TagValue::List(rest)) => {
                values.extend(rest);
                TagValue::List(values)
            }
        }
    }
}

/// Adds a tag to a set of tags, collecting repeated tags into a list.
pub fn merge_tag(tags: &mut Tags, name: &str, value: TagValue) {
    let merged = match tags.remove(name) {
        Some(existing) => existing.push(value),
        None => value,
    };
    tags.insert(name.to_string(), merged);
}

/// A comment that was split into its tags and its description.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SmartComment {
    pub tags: Tags,
    pub description: Option<String>,
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a comment into its leading tag lines and its description.
pub fn parse_smart_comment(comment: &str) -> SmartComment {
    let mut tags = Tags::new();
    let mut rest = comment;

    while !rest.is_empty() {
        let (line, remainder) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };
        let line = line.trim_end_matches('\r');

        let Some(tag) = line.strip_prefix('@') else {
            break;
        };
        let (name, value) = match tag.find(char::is_whitespace) {
            Some(idx) => (&tag[..idx], Some(tag[idx..].trim())),
            None => (tag, None),
        };
        if !is_tag_name(name) {
            break;
        }

        let value = match value {
            Some(value) if !value.is_empty() => TagValue::Text(value.to_string()),
            _ => TagValue::Flag(true),
        };
        merge_tag(&mut tags, name, value);
        rest = remainder;
    }

    let description = rest.trim();
    SmartComment {
        tags,
        description: (!description.is_empty()).then(|| description.to_string()),
    }
}
