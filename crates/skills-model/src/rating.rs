//! Proficiency levels and the tagged rating value
//!
//! Stored documents carry plain integers. Everything that reasons about
//! ratings works with [`Rating`] instead, which keeps "not rated" apart from
//! the 1..=5 scale rather than overloading `0`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A proficiency level on the 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Lowest level
    pub const MIN: Level = Level(1);
    /// Highest level
    pub const MAX: Level = Level(5);

    /// Create a level, `None` if outside 1..=5
    #[inline]
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Create a level, clamping into 1..=5
    #[inline]
    #[must_use]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Numeric value as a signed integer for gap arithmetic
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn signed(self) -> i8 {
        // Always within 1..=5
        self.0 as i8
    }

    /// Check whether a raw stored value is a valid level
    #[inline]
    #[must_use]
    pub fn is_valid(value: u8) -> bool {
        Self::new(value).is_some()
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(LevelOutOfRange(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw value outside the 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("level {0} is outside 1..=5")]
pub struct LevelOutOfRange(pub u8);

/// A rating that may not have been given yet
///
/// Serialized as `null` when unrated, otherwise as the integer level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rating {
    /// No rating has been given
    #[default]
    Unrated,
    /// A rating on the 1..=5 scale
    Rated(Level),
}

impl Rating {
    /// Interpret a stored integer
    ///
    /// `0` is the legacy "no selection" marker. Values above 5 never pass the
    /// store boundary; if one is found anyway it is clamped.
    #[must_use]
    pub fn from_stored(value: u8) -> Self {
        match value {
            0 => Self::Unrated,
            v => {
                if !Level::is_valid(v) {
                    tracing::warn!(value = v, "clamping stored rating outside 1..=5");
                }
                Self::Rated(Level::clamped(v))
            }
        }
    }

    /// Level if rated
    #[inline]
    #[must_use]
    pub fn level(self) -> Option<Level> {
        match self {
            Self::Unrated => None,
            Self::Rated(level) => Some(level),
        }
    }

    /// Whether a rating has been given
    #[inline]
    #[must_use]
    pub fn is_rated(self) -> bool {
        matches!(self, Self::Rated(_))
    }

    /// Numeric value, `0` when unrated
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.level().map_or(0, Level::get)
    }

    /// First rated value of `self` and `fallback`
    #[inline]
    #[must_use]
    pub fn or(self, fallback: Rating) -> Rating {
        match self {
            Self::Rated(_) => self,
            Self::Unrated => fallback,
        }
    }

    /// `self − self_rating`, defined only when `self` is rated
    ///
    /// An unrated `self_rating` counts as zero here so the persisted number
    /// stays `manager − 0`; callers that need to tell the two apart check
    /// `self_rating.is_rated()`.
    #[inline]
    #[must_use]
    pub fn gap_from(self, self_rating: Rating) -> Option<i8> {
        let base = self_rating.level().map_or(0, Level::signed);
        self.level().map(|level| level.signed() - base)
    }
}

impl From<Level> for Rating {
    fn from(level: Level) -> Self {
        Self::Rated(level)
    }
}

impl From<Option<Level>> for Rating {
    fn from(level: Option<Level>) -> Self {
        level.map_or(Self::Unrated, Self::Rated)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrated => f.write_str("unrated"),
            Self::Rated(level) => write!(f, "{level}"),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unrated => serializer.serialize_none(),
            Self::Rated(level) => serializer.serialize_some(&level.get()),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<u8>::deserialize(deserializer)? {
            None | Some(0) => Ok(Self::Unrated),
            Some(v) => Level::try_from(v).map(Self::Rated).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_bounds() {
        assert!(Level::new(0).is_none());
        assert_eq!(Level::new(1), Some(Level::MIN));
        assert_eq!(Level::new(5), Some(Level::MAX));
        assert!(Level::new(6).is_none());
    }

    #[test]
    fn zero_is_unrated() {
        assert_eq!(Rating::from_stored(0), Rating::Unrated);
        assert_eq!(Rating::from_stored(3).value(), 3);
    }

    #[test]
    fn stored_overflow_is_clamped() {
        assert_eq!(Rating::from_stored(9), Rating::Rated(Level::MAX));
    }

    #[test]
    fn gap_requires_manager_rating() {
        let four = Rating::from_stored(4);
        assert_eq!(Rating::Unrated.gap_from(four), None);
        assert_eq!(Rating::from_stored(5).gap_from(four), Some(1));
        assert_eq!(Rating::from_stored(3).gap_from(four), Some(-1));
        assert_eq!(Rating::from_stored(3).gap_from(Rating::Unrated), Some(3));
    }

    #[test]
    fn or_prefers_rated_value() {
        let two = Rating::from_stored(2);
        assert_eq!(Rating::Unrated.or(two), two);
        assert_eq!(Rating::from_stored(4).or(two).value(), 4);
    }

    #[test]
    fn rating_json_shape() {
        assert_eq!(serde_json::to_string(&Rating::Unrated).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Rating::from_stored(4)).unwrap(), "4");
        let parsed: Rating = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, Rating::Unrated);
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }

    #[test]
    fn level_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Level>("0").is_err());
        assert_eq!(serde_json::from_str::<Level>("2").unwrap().get(), 2);
    }

    proptest! {
        #[test]
        fn prop_gap_is_difference_of_levels(manager in 1u8..=5, own in 0u8..=5) {
            let gap = Rating::from_stored(manager).gap_from(Rating::from_stored(own));
            prop_assert_eq!(gap, Some(i8::try_from(manager).unwrap() - i8::try_from(own).unwrap()));
        }
    }
}
