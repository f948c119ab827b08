//! Catalog enums: product categories, frame sizes, and frame materials.
//!
//! The backend stores these as lowercase strings, so every enum round-trips
//! through `as_str`/`FromStr` with `snake_case` serde names to match.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown enum variant from user input or
/// a backend row.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum failed to parse (e.g. "category").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Product category for the curated catalog sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cars,
    Motorbikes,
    Art,
    Misc,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Cars, Self::Motorbikes, Self::Art, Self::Misc];

    /// Backend column value for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cars => "cars",
            Self::Motorbikes => "motorbikes",
            Self::Art => "art",
            Self::Misc => "misc",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cars" => Ok(Self::Cars),
            "motorbikes" => Ok(Self::Motorbikes),
            "art" => Ok(Self::Art),
            "misc" => Ok(Self::Misc),
            other => Err(UnknownVariant {
                kind: "category",
                value: other.to_owned(),
            }),
        }
    }
}

/// Frame size, which drives the per-product price table.
///
/// Ordered smallest to largest so price tables iterate in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSize {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl FrameSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::Xlarge];

    /// Backend column value for this size.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xlarge => "xlarge",
        }
    }

    /// Paper-format label shown next to the size name.
    #[must_use]
    pub const fn format_label(self) -> &'static str {
        match self {
            Self::Small => "A4",
            Self::Medium => "A3",
            Self::Large => "A2",
            Self::Xlarge => "A1",
        }
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrameSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "xlarge" => Ok(Self::Xlarge),
            other => Err(UnknownVariant {
                kind: "frame size",
                value: other.to_owned(),
            }),
        }
    }
}

/// Frame material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    Wood,
    Metal,
    Acrylic,
}

impl FrameType {
    /// All materials, in display order.
    pub const ALL: [Self; 3] = [Self::Wood, Self::Metal, Self::Acrylic];

    /// Backend column value for this material.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Metal => "metal",
            Self::Acrylic => "acrylic",
        }
    }
}

impl std::fmt::Display for FrameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrameType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wood" => Ok(Self::Wood),
            "metal" => Ok(Self::Metal),
            "acrylic" => Ok(Self::Acrylic),
            other => Err(UnknownVariant {
                kind: "frame type",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(category, parsed);
        }
    }

    #[test]
    fn test_unknown_category() {
        let err = "planes".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: planes");
    }

    #[test]
    fn test_frame_size_serde_matches_as_str() {
        for size in FrameSize::ALL {
            let json = serde_json::to_string(&size).unwrap();
            assert_eq!(json, format!("\"{}\"", size.as_str()));
        }
    }

    #[test]
    fn test_frame_size_labels() {
        assert_eq!(FrameSize::Small.format_label(), "A4");
        assert_eq!(FrameSize::Xlarge.format_label(), "A1");
    }

    #[test]
    fn test_frame_type_roundtrip() {
        for frame in FrameType::ALL {
            let parsed: FrameType = frame.as_str().parse().unwrap();
            assert_eq!(frame, parsed);
        }
        assert!("glass".parse::<FrameType>().is_err());
    }
}
