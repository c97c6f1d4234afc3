//! Core data models used by the library.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Page attribution for a chunk.
///
/// Serialized as a JSON number when known and as the string `"unknown"`
/// otherwise, so downstream consumers see one consistent sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// 1-based page number in the source document.
    Number(u32),
    /// The source carried no page information.
    Unknown,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Number(n) => write!(f, "{n}"),
            Page::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Page::Number(n) => serializer.serialize_u32(*n),
            Page::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for Page {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u32),
            Text(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Page::Number(n),
            Repr::Text(_) => Page::Unknown,
        })
    }
}

/// A contiguous span of source text, the unit of retrieval.
///
/// Created once at ingestion time by the segmenter and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Non-empty chunk text.
    pub text: String,
    /// Page attribution.
    pub page: Page,
    /// Identifier of the originating document.
    pub source: String,
}

/// A single retrieval hit: a chunk plus its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_serializes_number_and_sentinel() {
        assert_eq!(serde_json::to_string(&Page::Number(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&Page::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn page_round_trips() {
        let n: Page = serde_json::from_str("7").unwrap();
        assert_eq!(n, Page::Number(7));
        let u: Page = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(u, Page::Unknown);
    }
}
