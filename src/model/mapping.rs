use serde::de::Error as SerdeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// The header row of a sales table. Each header is also given a normalized key so that
/// `Sub-Category`, `Sub Category` and `sub_category` all find the same column.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<Header>,
    key_map: HashMap<String, usize>,
}

impl Mapping {
    /// Create a new `Mapping` from a list of header strings. Fails if two headers normalize to the
    /// same key.
    pub fn new<S, I>(headers: I) -> Result<Self, MappingError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<Header> = headers.into_iter().map(|s| s.into().into()).collect();
        let mut key_map = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if let Some(prior) = key_map.insert(normalize(header), idx) {
                return Err(MappingError(format!(
                    "Encountered a duplicate header: '{}' (column {}) and '{}' (column {})",
                    headers[prior].as_ref(),
                    prior + 1,
                    header.as_ref(),
                    idx + 1,
                )));
            }
        }
        Ok(Self { headers, key_map })
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The column index of `header`, compared after normalization.
    pub fn index_of(&self, header: impl AsRef<str>) -> Option<usize> {
        self.key_map.get(&normalize(header)).copied()
    }
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.headers.len()))?;
        for header in &self.headers {
            seq.serialize_element(header.as_ref())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items: Vec<String> = Vec::deserialize(deserializer)?;
        let mapping = Mapping::new(items).map_err(D::Error::custom)?;
        Ok(mapping)
    }
}

/// Represents a header in the input table, for example, `Order_Date`
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

/// Lowercases, trims, and turns spaces and hyphens into underscores. A UTF-8 byte order mark, which
/// some spreadsheet exports put in front of the first header, is dropped.
fn normalize(s: impl AsRef<str>) -> String {
    s.as_ref()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
