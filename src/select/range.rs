//! Threshold ranges on bounding-box volume.
//!
//! A [`ThresholdRange`] is an interval with independently toggled lower and
//! upper bounds. The bound values are kept even while their toggle is off, so
//! switching a bound back on restores the last value. Both bounds are
//! inclusive.
//!
//! A [`RangeList`] is the ordered, editable list of ranges together with the
//! index of the active (currently edited) range.
//!
//! # Example
//!
//! ```
//! use volsel::select::{RangeList, ThresholdRange};
//!
//! let small: ThresholdRange = "small=:0.5".parse().unwrap();
//! assert!(small.contains(0.5));
//! assert!(!small.contains(0.51));
//!
//! let mut list = RangeList::new();
//! list.add();
//! assert_eq!(list.active().unwrap().label, "Range 1");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Default upper bound value for a new range (scene units cubed).
pub const DEFAULT_MAX_VALUE: f64 = 0.1;

/// One volume interval with optional Min and Max bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdRange {
    /// Display name.
    pub label: String,
    /// Whether the lower bound is enforced.
    pub use_min: bool,
    /// Lower bound on volume.
    pub min_value: f64,
    /// Whether the upper bound is enforced.
    pub use_max: bool,
    /// Upper bound on volume.
    pub max_value: f64,
}

impl Default for ThresholdRange {
    fn default() -> Self {
        Self {
            label: "Range".to_string(),
            use_min: false,
            min_value: 0.0,
            use_max: false,
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

impl ThresholdRange {
    /// Create an unbounded range with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Create a range from optional bounds.
    pub fn between(min: Option<f64>, max: Option<f64>) -> Self {
        let mut range = Self::default();
        range.set_min(min);
        range.set_max(max);
        range
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enable the lower bound at `value`.
    pub fn with_min(mut self, value: f64) -> Self {
        self.set_min(Some(value));
        self
    }

    /// Enable the upper bound at `value`.
    pub fn with_max(mut self, value: f64) -> Self {
        self.set_max(Some(value));
        self
    }

    /// Set or clear the lower bound. Clearing keeps the stored value.
    pub fn set_min(&mut self, value: Option<f64>) {
        self.use_min = value.is_some();
        if let Some(v) = value {
            self.min_value = v;
        }
    }

    /// Set or clear the upper bound. Clearing keeps the stored value.
    pub fn set_max(&mut self, value: Option<f64>) {
        self.use_max = value.is_some();
        if let Some(v) = value {
            self.max_value = v;
        }
    }

    /// The effective bounds; a disabled side is `None`.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (
            self.use_min.then_some(self.min_value),
            self.use_max.then_some(self.max_value),
        )
    }

    /// Check whether `volume` lies inside the range (bounds inclusive).
    ///
    /// A non-finite volume, or a NaN on an enabled side, never matches.
    pub fn contains(&self, volume: f64) -> bool {
        if !volume.is_finite() {
            return false;
        }
        let (min, max) = self.bounds();
        if min.is_some_and(|min| min.is_nan() || volume < min) {
            return false;
        }
        if max.is_some_and(|max| max.is_nan() || volume > max) {
            return false;
        }
        true
    }

    /// Check that both stored bound values are finite.
    ///
    /// Disabled sides are checked too, since they are persisted and restored.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("min_value", self.min_value), ("max_value", self.max_value)] {
            if !value.is_finite() {
                return Err(MeshError::invalid_param(name, value, "bound must be finite"));
            }
        }
        Ok(())
    }

    /// Check whether no volume can ever match (both bounds on and Min > Max).
    pub fn is_empty_interval(&self) -> bool {
        matches!(self.bounds(), (Some(min), Some(max)) if min > max)
    }
}

/// Index of the first range in `ranges` that contains `volume`.
pub fn first_match(ranges: &[ThresholdRange], volume: f64) -> Option<usize> {
    ranges.iter().position(|r| r.contains(volume))
}

/// Check whether any range contains `volume`. An empty list matches nothing.
pub fn matches_any(ranges: &[ThresholdRange], volume: f64) -> bool {
    first_match(ranges, volume).is_some()
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        match self.bounds().0 {
            Some(min) => write!(f, "  Min: {:.6}", min)?,
            None => write!(f, "  Min: -")?,
        }
        match self.bounds().1 {
            Some(max) => write!(f, "  Max: {:.6}", max),
            None => write!(f, "  Max: +"),
        }
    }
}

/// Parses `[LABEL=]MIN:MAX`, where either side may be empty for "no bound".
///
/// `"0.5:"`, `":2"`, `"0.1:3"`, `":"` and `"tiny=:0.01"` are all accepted.
impl FromStr for ThresholdRange {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        let (label, bounds) = match s.split_once('=') {
            Some((label, rest)) => {
                let label = label.trim();
                if label.is_empty() {
                    return Err(MeshError::invalid_range(s, "label before '=' is empty"));
                }
                (Some(label), rest)
            }
            None => (None, s),
        };

        let (min, max) = bounds
            .split_once(':')
            .ok_or_else(|| MeshError::invalid_range(s, "expected MIN:MAX"))?;

        let parse_side = |side: &str| -> Result<Option<f64>> {
            let side = side.trim();
            if side.is_empty() {
                return Ok(None);
            }
            let value: f64 = side
                .parse()
                .map_err(|_| MeshError::invalid_range(s, "bound is not a number"))?;
            if !value.is_finite() {
                return Err(MeshError::invalid_range(
                    s,
                    "bound must be finite; leave the side empty for no bound",
                ));
            }
            Ok(Some(value))
        };

        let mut range = ThresholdRange::between(parse_side(min)?, parse_side(max)?);
        if let Some(label) = label {
            range.label = label.to_string();
        }
        Ok(range)
    }
}

/// Direction for reordering the active range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the front of the list.
    Up,
    /// Towards the back of the list.
    Down,
}

/// An ordered list of threshold ranges with an active entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeList {
    ranges: Vec<ThresholdRange>,
    active: Option<usize>,
}

impl RangeList {
    /// Create an empty list with no active range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from ranges; the last one becomes active.
    pub fn from_ranges(ranges: Vec<ThresholdRange>) -> Self {
        let active = ranges.len().checked_sub(1);
        Self { ranges, active }
    }

    /// Create a list with an explicit active index.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] if `active` is past the end.
    pub fn with_active(ranges: Vec<ThresholdRange>, active: Option<usize>) -> Result<Self> {
        let list = Self { ranges, active };
        list.validate()?;
        Ok(list)
    }

    /// Split the list into its ranges and active index.
    pub fn into_parts(self) -> (Vec<ThresholdRange>, Option<usize>) {
        (self.ranges, self.active)
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The ranges in order.
    pub fn ranges(&self) -> &[ThresholdRange] {
        &self.ranges
    }

    /// Iterate over the ranges in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ThresholdRange> {
        self.ranges.iter()
    }

    /// Index of the active range.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active range.
    pub fn active(&self) -> Option<&ThresholdRange> {
        self.active.and_then(|i| self.ranges.get(i))
    }

    /// The active range, mutably.
    pub fn active_mut(&mut self) -> Option<&mut ThresholdRange> {
        let i = self.active?;
        self.ranges.get_mut(i)
    }

    /// Make `index` the active range.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.ranges.len() {
            return Err(MeshError::invalid_param(
                "active",
                index,
                "index is past the end of the range list",
            ));
        }
        self.active = Some(index);
        Ok(())
    }

    /// Append a default range labelled `Range N` and make it active.
    pub fn add(&mut self) -> &mut ThresholdRange {
        let label = format!("Range {}", self.ranges.len() + 1);
        self.push(ThresholdRange::new(label))
    }

    /// Append `range` and make it active.
    pub fn push(&mut self, range: ThresholdRange) -> &mut ThresholdRange {
        self.ranges.push(range);
        let last = self.ranges.len() - 1;
        self.active = Some(last);
        &mut self.ranges[last]
    }

    fn require_active(&self) -> Result<usize> {
        match self.active {
            Some(i) if i < self.ranges.len() => Ok(i),
            _ => Err(MeshError::NoActiveRange),
        }
    }

    /// Remove the active range and return it.
    ///
    /// The range before it becomes active (or the new first range when the
    /// removed one was first); an emptied list has no active range.
    pub fn remove_active(&mut self) -> Result<ThresholdRange> {
        let idx = self.require_active()?;
        let removed = self.ranges.remove(idx);
        self.active = if self.ranges.is_empty() {
            None
        } else {
            Some(idx.saturating_sub(1).min(self.ranges.len() - 1))
        };
        Ok(removed)
    }

    /// Move the active range one step and keep it active.
    ///
    /// Moving past either end leaves the list unchanged. Returns whether the
    /// range moved.
    pub fn move_active(&mut self, direction: Direction) -> Result<bool> {
        let idx = self.require_active()?;
        let target = match direction {
            Direction::Up if idx > 0 => idx - 1,
            Direction::Down if idx + 1 < self.ranges.len() => idx + 1,
            _ => return Ok(false),
        };
        self.ranges.swap(idx, target);
        self.active = Some(target);
        Ok(true)
    }

    /// Remove every range.
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.active = None;
    }

    /// Check that the active index points into the list and every bound is
    /// finite. Ranges with Min above Max are logged as warnings but accepted.
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self.active.filter(|&i| i >= self.ranges.len()) {
            return Err(MeshError::invalid_param(
                "active",
                i,
                "index is past the end of the range list",
            ));
        }
        for (i, range) in self.ranges.iter().enumerate() {
            range.validate()?;
            if range.is_empty_interval() {
                log::warn!("range {} ('{}') has Min above Max and matches nothing", i, range.label);
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a ThresholdRange;
    type IntoIter = std::slice::Iter<'a, ThresholdRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let r = ThresholdRange::default();
        assert_eq!(r.label, "Range");
        assert!(!r.use_min && !r.use_max);
        assert_eq!(r.min_value, 0.0);
        assert_eq!(r.max_value, DEFAULT_MAX_VALUE);
        assert_eq!(r.bounds(), (None, None));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = ThresholdRange::default().with_min(1.0).with_max(2.0);
        assert!(r.contains(1.0));
        assert!(r.contains(2.0));
        assert!(!r.contains(0.999));
        assert!(!r.contains(2.001));
    }

    #[test]
    fn test_unbounded_sides() {
        let open = ThresholdRange::default();
        assert!(open.contains(0.0));
        assert!(open.contains(1e12));

        let at_least = ThresholdRange::default().with_min(5.0);
        assert!(at_least.contains(1e9));
        assert!(!at_least.contains(4.0));

        let at_most = ThresholdRange::default().with_max(5.0);
        assert!(at_most.contains(0.0));
        assert!(!at_most.contains(6.0));
    }

    #[test]
    fn test_disabled_bound_keeps_value() {
        let mut r = ThresholdRange::default().with_max(3.0);
        r.set_max(None);
        assert!(!r.use_max);
        assert_eq!(r.max_value, 3.0);
        assert!(r.contains(100.0));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let r = ThresholdRange::default().with_min(2.0).with_max(1.0);
        assert!(r.is_empty_interval());
        assert!(!r.contains(1.5));
        assert!(!ThresholdRange::default().with_min(2.0).is_empty_interval());
    }

    #[test]
    fn test_nan_never_matches() {
        assert!(!ThresholdRange::default().contains(f64::NAN));
        assert!(!ThresholdRange::default().with_min(0.0).contains(f64::INFINITY));
        assert!(!ThresholdRange::default().with_min(f64::NAN).contains(1.0));
        assert!(!ThresholdRange::default().with_max(f64::NAN).contains(1.0));
        assert!(!matches_any(&[ThresholdRange::default()], f64::NAN));

        // A NaN on a disabled side is ignored when matching but still invalid
        let mut r = ThresholdRange::default().with_max(f64::NAN);
        r.set_max(None);
        assert!(r.contains(1.0));
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_matches_any_is_union() {
        let ranges = vec![
            ThresholdRange::default().with_max(1.0),
            ThresholdRange::default().with_min(0.5).with_max(3.0),
            ThresholdRange::default().with_min(10.0),
        ];
        assert_eq!(first_match(&ranges, 0.7), Some(0));
        assert_eq!(first_match(&ranges, 2.0), Some(1));
        assert_eq!(first_match(&ranges, 5.0), None);
        assert!(matches_any(&ranges, 11.0));
        assert!(!matches_any(&[], 1.0));
    }

    #[test]
    fn test_parse() {
        let r: ThresholdRange = "0.5:".parse().unwrap();
        assert_eq!(r.bounds(), (Some(0.5), None));

        let r: ThresholdRange = ":2".parse().unwrap();
        assert_eq!(r.bounds(), (None, Some(2.0)));

        let r: ThresholdRange = " big = 1e3 : 1e6 ".parse().unwrap();
        assert_eq!(r.label, "big");
        assert_eq!(r.bounds(), (Some(1000.0), Some(1e6)));

        let r: ThresholdRange = ":".parse().unwrap();
        assert_eq!(r.bounds(), (None, None));

        assert!("1".parse::<ThresholdRange>().is_err());
        assert!("a:b".parse::<ThresholdRange>().is_err());
        assert!("inf:".parse::<ThresholdRange>().is_err());
        assert!("=1:2".parse::<ThresholdRange>().is_err());
    }

    #[test]
    fn test_display() {
        let r = ThresholdRange::new("Range 1").with_min(0.5);
        assert_eq!(r.to_string(), "Range 1  Min: 0.500000  Max: +");
    }

    #[test]
    fn test_add_labels_and_activates() {
        let mut list = RangeList::new();
        assert_eq!(list.active_index(), None);
        list.add();
        list.add();
        assert_eq!(list.len(), 2);
        assert_eq!(list.ranges()[1].label, "Range 2");
        assert_eq!(list.active_index(), Some(1));
    }

    #[test]
    fn test_remove_active_index_rules() {
        let mut list = RangeList::new();
        for _ in 0..3 {
            list.add();
        }

        // Removing the middle range activates the one before it
        list.set_active(1).unwrap();
        let removed = list.remove_active().unwrap();
        assert_eq!(removed.label, "Range 2");
        assert_eq!(list.active_index(), Some(0));

        // Removing the first range keeps index 0 active
        let removed = list.remove_active().unwrap();
        assert_eq!(removed.label, "Range 1");
        assert_eq!(list.active_index(), Some(0));
        assert_eq!(list.active().unwrap().label, "Range 3");

        list.remove_active().unwrap();
        assert!(list.is_empty());
        assert_eq!(list.active_index(), None);
        assert!(matches!(list.remove_active(), Err(MeshError::NoActiveRange)));
    }

    #[test]
    fn test_move_active() {
        let mut list = RangeList::new();
        for _ in 0..3 {
            list.add();
        }

        assert!(!list.move_active(Direction::Down).unwrap());
        assert!(list.move_active(Direction::Up).unwrap());
        assert_eq!(list.active_index(), Some(1));
        assert_eq!(list.ranges()[1].label, "Range 3");
        assert_eq!(list.ranges()[2].label, "Range 2");

        list.set_active(0).unwrap();
        assert!(!list.move_active(Direction::Up).unwrap());
        assert!(matches!(
            RangeList::new().move_active(Direction::Up),
            Err(MeshError::NoActiveRange)
        ));
    }

    #[test]
    fn test_validate() {
        // Inverted ranges are legal, just useless
        let inverted = ThresholdRange::default().with_min(2.0).with_max(1.0);
        assert!(RangeList::from_ranges(vec![inverted]).validate().is_ok());

        let infinite = ThresholdRange::default().with_max(f64::INFINITY);
        let list = RangeList::from_ranges(vec![ThresholdRange::default(), infinite]);
        assert!(matches!(
            list.validate(),
            Err(MeshError::InvalidParameter { name: "max_value", .. })
        ));
        assert!(RangeList::with_active(vec![ThresholdRange::default()], Some(1)).is_err());
    }

    #[test]
    fn test_set_active_bounds() {
        let mut list = RangeList::from_ranges(vec![ThresholdRange::default()]);
        assert_eq!(list.active_index(), Some(0));
        assert!(list.set_active(1).is_err());
        list.clear();
        assert!(list.active().is_none());
    }
}
