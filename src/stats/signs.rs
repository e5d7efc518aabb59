use std::{fs, io, path::Path};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::stats::{PlayerStat, RecordSet, StatsError};

/// The sign each player stat is assumed to have, keyed by stat name.
///
/// The table only stores magnitudes, so this is what turns `5%` back into `-0.05`. There is one
/// sign per stat for the whole record set, taken from the first record with a nonzero value. A
/// record whose stat has the opposite sign loses that sign on the way back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignConvention {
    signs: IndexMap<String, i8>,
}

impl SignConvention {
    pub fn from_records(records: &RecordSet) -> Self {
        let mut signs = IndexMap::new();

        for record in records.values() {
            for (key, value) in &record.player_stats {
                if *value != 0.0 && !signs.contains_key(key) {
                    signs.insert(key.clone(), if *value < 0.0 { -1 } else { 1 });
                }
            }
        }

        Self { signs }
    }

    /// Reads a sign file. A missing file is an empty convention.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "No sign file at {}, treating every stat as positive",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StatsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StatsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StatsError> {
        let path = path.as_ref();

        let json = serde_json::to_vec_pretty(self).map_err(|source| StatsError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(|source| StatsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<i8> {
        self.signs.get(key).copied()
    }

    /// Stats without a recorded sign are positive.
    pub fn sign(&self, stat: PlayerStat) -> f64 {
        self.get(stat.key()).map(f64::from).unwrap_or(1.0)
    }

    /// Gives a magnitude the sign of `stat`. Zero stays `0.0`, never `-0.0`.
    pub fn apply(&self, stat: PlayerStat, magnitude: f64) -> f64 {
        let value = magnitude * self.sign(stat);

        if value == 0.0 { 0.0 } else { value }
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ArmorRecord;

    fn record_with(stats: &[(&str, f64)]) -> ArmorRecord {
        ArmorRecord {
            player_stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn first_nonzero_value_decides() {
        let mut records = RecordSet::new();
        records.insert(
            "armor-a".into(),
            record_with(&[("walkspeed", 0.0), ("hungerrate", 0.05)]),
        );
        records.insert(
            "armor-b".into(),
            record_with(&[("walkspeed", -0.1), ("hungerrate", -0.2)]),
        );
        records.insert("armor-c".into(), record_with(&[("walkspeed", 0.3)]));

        let signs = SignConvention::from_records(&records);

        assert_eq!(signs.get("walkspeed"), Some(-1));
        assert_eq!(signs.get("hungerrate"), Some(1));
        assert_eq!(signs.get("steadyAim"), None);
        assert_eq!(signs.len(), 2);
    }

    #[test]
    fn keys_are_kept_in_discovery_order() {
        let mut records = RecordSet::new();
        records.insert("armor-a".into(), record_with(&[("steadyAim", -0.05)]));
        records.insert(
            "armor-b".into(),
            record_with(&[("walkspeed", -0.05), ("customStat", 0.5)]),
        );

        let json = serde_json::to_string(&SignConvention::from_records(&records)).unwrap();

        assert_eq!(json, r#"{"steadyAim":-1,"walkspeed":-1,"customStat":1}"#);
    }

    #[test]
    fn unknown_stats_are_positive() {
        let signs = SignConvention::default();

        assert_eq!(signs.sign(PlayerStat::WalkSpeed), 1.0);
        assert_eq!(signs.apply(PlayerStat::WalkSpeed, 0.25), 0.25);
    }

    #[test]
    fn zero_never_becomes_negative() {
        let signs: SignConvention = serde_json::from_str(r#"{"walkspeed": -1}"#).unwrap();

        let value = signs.apply(PlayerStat::WalkSpeed, 0.0);

        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
        assert_eq!(signs.apply(PlayerStat::WalkSpeed, 0.05), -0.05);
    }

    #[test]
    fn missing_sign_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let signs = SignConvention::load(dir.path().join("playerstat_signs.json")).unwrap();

        assert!(signs.is_empty());
    }

    #[test]
    fn sign_file_written_with_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playerstat_signs.json");

        let mut records = RecordSet::new();
        records.insert(
            "armor-a".into(),
            record_with(&[("walkspeed", -0.05), ("hungerrate", 0.1)]),
        );
        let signs = SignConvention::from_records(&records);

        signs.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"walkspeed\": -1,\n  \"hungerrate\": 1\n}"
        );
        assert_eq!(SignConvention::load(&path).unwrap(), signs);
    }

    #[test]
    fn malformed_sign_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playerstat_signs.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            SignConvention::load(&path),
            Err(StatsError::Json { .. })
        ));
    }
}
