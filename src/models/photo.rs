// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved sentinel marking an unresolved review field
pub const PENDING: &str = "pending";

/// The four derived renditions stored for every upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Original,
    Enhanced,
    Compressed,
    EnhancedAndCompressed,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Original,
        Variant::Enhanced,
        Variant::Compressed,
        Variant::EnhancedAndCompressed,
    ];

    /// Key string: storage subdirectory, URL segment and review option value
    pub fn key(self) -> &'static str {
        match self {
            Variant::Original => "original",
            Variant::Enhanced => "enhanced",
            Variant::Compressed => "compressed",
            Variant::EnhancedAndCompressed => "enhanced_and_compressed",
        }
    }

    /// Parse a review option value; None for anything outside the four keys
    pub fn parse(value: &str) -> Option<Variant> {
        match value {
            "original" => Some(Variant::Original),
            "enhanced" => Some(Variant::Enhanced),
            "compressed" => Some(Variant::Compressed),
            "enhanced_and_compressed" => Some(Variant::EnhancedAndCompressed),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A moderated field: the pending sentinel or a resolved value
/// DOCUMENTATION: Serializes as a bare string, "pending" meaning unresolved.
/// Resolved values can never equal the sentinel by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewState {
    Pending,
    Resolved(String),
}

impl ReviewState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewState::Pending)
    }

    /// Stored/serialized form: the sentinel or the resolved value
    pub fn as_str(&self) -> &str {
        match self {
            ReviewState::Pending => PENDING,
            ReviewState::Resolved(value) => value,
        }
    }
}

impl From<String> for ReviewState {
    fn from(value: String) -> Self {
        if value == PENDING {
            ReviewState::Pending
        } else {
            ReviewState::Resolved(value)
        }
    }
}

impl From<ReviewState> for String {
    fn from(state: ReviewState) -> Self {
        state.as_str().to_string()
    }
}

/// Public addresses of the four stored variants of one photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantUrls {
    pub original: String,
    pub enhanced: String,
    pub compressed: String,
    pub enhanced_and_compressed: String,
}

impl VariantUrls {
    /// Address recorded for the given variant
    pub fn get(&self, variant: Variant) -> &str {
        match variant {
            Variant::Original => &self.original,
            Variant::Enhanced => &self.enhanced,
            Variant::Compressed => &self.compressed,
            Variant::EnhancedAndCompressed => &self.enhanced_and_compressed,
        }
    }
}

/// One photo submission and its review progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// uuid4 hex plus ".jpeg"; shared by all four stored variant files
    pub name: String,
    /// Caller-supplied event label
    pub event: String,
    /// Where each stored variant is served from
    pub urls: VariantUrls,
    /// "pending" until technical review resolves it to a URL
    pub tech_review: ReviewState,
    /// "pending" until a caption is supplied
    pub caption: ReviewState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_keys_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::parse(variant.key()), Some(variant));
        }
        assert_eq!(Variant::parse("thumbnail"), None);
        assert_eq!(Variant::parse("Original"), None);
    }

    #[test]
    fn test_review_state_sentinel() {
        let pending = ReviewState::from("pending".to_string());
        assert!(pending.is_pending());
        assert_eq!(pending.as_str(), PENDING);

        let resolved = ReviewState::from("a fine caption".to_string());
        assert!(!resolved.is_pending());
        assert_eq!(resolved.as_str(), "a fine caption");
    }

    #[test]
    fn test_review_state_serializes_as_bare_string() {
        let json = serde_json::to_string(&ReviewState::Pending).unwrap();
        assert_eq!(json, "\"pending\"");

        let json = serde_json::to_string(&ReviewState::Resolved("https://x/y.jpeg".into())).unwrap();
        assert_eq!(json, "\"https://x/y.jpeg\"");
    }
}
