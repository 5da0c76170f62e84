//! Range presets stored as JSON.
//!
//! A preset keeps a [`RangeList`] and a [`SelectMode`] between runs:
//!
//! ```json
//! {
//!   "ranges": [
//!     { "label": "Range 1", "use_min": false, "min_value": 0.0, "use_max": true, "max_value": 0.1 }
//!   ],
//!   "active": 0,
//!   "mode": { "vertices": true, "edges": true, "faces": true }
//! }
//! ```
//!
//! Missing fields take their defaults. Unknown fields are rejected so that a
//! misspelt `use_max` does not silently widen a range.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::select::{RangeList, SelectMode, ThresholdRange};

/// A saved range list and select mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preset {
    /// Threshold ranges in list order.
    pub ranges: Vec<ThresholdRange>,
    /// Index of the active range.
    pub active: Option<usize>,
    /// Element kinds a selection writes.
    pub mode: SelectMode,
}

impl Preset {
    /// Create a preset from a range list and mode.
    pub fn new(list: RangeList, mode: SelectMode) -> Self {
        let (ranges, active) = list.into_parts();
        Self {
            ranges,
            active,
            mode,
        }
    }

    /// The ranges as an editable list.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] if `active` is past the end or
    /// a bound value is not finite.
    pub fn range_list(&self) -> Result<RangeList> {
        RangeList::with_active(self.ranges.clone(), self.active)
    }

    /// Replace the ranges and active index with those of `list`.
    pub fn set_range_list(&mut self, list: RangeList) {
        let (ranges, active) = list.into_parts();
        self.ranges = ranges;
        self.active = active;
    }

    /// Load a preset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Json`] for malformed JSON or unknown fields, and
    /// [`MeshError::InvalidParameter`] if the active index is out of range.
    /// JSON has no NaN or infinity, so a non-finite bound cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let preset: Preset = serde_json::from_reader(reader).map_err(|source| MeshError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        preset.range_list()?;

        log::debug!(
            "loaded preset {} with {} range(s), mode {}",
            path.display(),
            preset.ranges.len(),
            preset.mode
        );
        Ok(preset)
    }

    /// Write the preset to a JSON file.
    ///
    /// # Errors
    ///
    /// Fails without touching `path` if the preset would not load back: an
    /// active index past the end or a non-finite bound value.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.range_list()?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| MeshError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("volsel_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load() {
        let mut list = RangeList::new();
        list.add().set_max(Some(0.25));
        list.add().set_min(Some(2.0));
        list.set_active(0).unwrap();
        let preset = Preset::new(list, SelectMode::FACES);

        let path = temp_path("preset");
        preset.save(&path).unwrap();
        let loaded = Preset::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, preset);
        let list = loaded.range_list().unwrap();
        assert_eq!(list.active().unwrap().bounds(), (None, Some(0.25)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let preset: Preset =
            serde_json::from_str(r#"{ "ranges": [ { "use_min": true } ] }"#).unwrap();

        assert_eq!(preset.mode, SelectMode::ALL);
        assert_eq!(preset.active, None);
        assert_eq!(preset.ranges[0].min_value, 0.0);
        assert_eq!(preset.ranges[0].max_value, 0.1);
        assert!(!preset.ranges[0].use_max);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let path = temp_path("preset_unknown");
        std::fs::write(&path, r#"{ "ranges": [ { "use_maximum": true } ] }"#).unwrap();
        let result = Preset::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MeshError::Json { .. })));
    }

    #[test]
    fn test_active_out_of_range() {
        let path = temp_path("preset_active");
        std::fs::write(&path, r#"{ "ranges": [], "active": 2 }"#).unwrap();
        let result = Preset::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "active", .. })
        ));
    }

    #[test]
    fn test_non_finite_bound_is_not_saved() {
        let path = temp_path("preset_infinite");
        std::fs::write(&path, "{}\n").unwrap();

        let mut list = RangeList::new();
        list.add().set_max(Some(f64::INFINITY));
        let result = Preset::new(list, SelectMode::ALL).save(&path);
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "max_value", .. })
        ));

        // The existing file is left as it was and still loads
        let loaded = Preset::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.unwrap(), Preset::default());
    }

    #[test]
    fn test_disabled_nan_bound_is_not_saved() {
        let path = temp_path("preset_nan");
        std::fs::remove_file(&path).ok();

        let mut range = ThresholdRange::default().with_min(f64::NAN);
        range.set_min(None);
        let preset = Preset::new(RangeList::from_ranges(vec![range]), SelectMode::ALL);

        assert!(preset.save(&path).is_err());
        assert!(!path.exists());
    }
}
