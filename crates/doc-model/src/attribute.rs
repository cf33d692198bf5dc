use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metadata value as reported by a filesystem or PDF metadata provider.
///
/// Providers map their native values onto one of these variants so the
/// display string is produced by an explicit formatter per kind instead of
/// a generic debug dump.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Real(f64),
    Bool(bool),
    Date(DateTime<FixedOffset>),
    /// Permission bits, shown in octal.
    Mode(u32),
    Bytes(Vec<u8>),
    List(Vec<AttributeValue>),
    /// Best-effort rendering of anything the provider could not classify.
    Other(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Other(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S %:z")),
            Self::Mode(mode) => write!(f, "{mode:04o}"),
            Self::Bytes(bytes) => {
                f.write_str("<")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str(">")
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One displayable `name = value` row.
///
/// `id` is 1-based and only unique within the list it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub id: u16,
    pub name: String,
    pub value: String,
}

impl AttributeEntry {
    pub fn display_line(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Flattens a metadata mapping into sequentially numbered entries.
///
/// Mapping order is kept unless `sort_by_name` is set, in which case entries
/// are ordered by name before ids are assigned.
pub fn flatten_attributes<I>(pairs: I, sort_by_name: bool) -> Vec<AttributeEntry>
where
    I: IntoIterator<Item = (String, AttributeValue)>,
{
    let mut pairs: Vec<(String, AttributeValue)> = pairs.into_iter().collect();
    if sort_by_name {
        pairs.sort_by(|left, right| left.0.cmp(&right.0));
    }

    pairs
        .into_iter()
        .take(usize::from(u16::MAX))
        .zip(1u16..)
        .map(|((name, value), id)| AttributeEntry { id, name, value: value.to_string() })
        .collect()
}
