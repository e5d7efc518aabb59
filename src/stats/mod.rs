mod convert;
mod signs;
mod table;

use std::{io, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};
use thiserror::Error;

pub use convert::{json_to_tsv, records_to_rows, rows_to_records, tsv_to_json};
pub use signs::SignConvention;
pub use table::{COLUMNS, StatRow, format_percent, parse_percent, read_table, write_table};

pub const DEFAULT_JSON_INPUT: &str = "stats.json";
pub const DEFAULT_TSV: &str = "stats.tsv";
pub const DEFAULT_SIGNS: &str = "playerstat_signs.json";
pub const DEFAULT_JSON_OUTPUT: &str = "stats_converted.json";

/// Separator between the segments of a record name, eg. `armor-chest-plate-iron`
pub const NAME_DELIMITER: char = '-';

/// All armor records of a stats file, in file order.
pub type RecordSet = IndexMap<String, ArmorRecord>;

/// The player stats which get a column in the stats table.
///
/// The key for healing effectiveness is misspelled in the game data, and has to stay that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum PlayerStat {
    #[strum(serialize = "walkspeed")]
    WalkSpeed,
    #[strum(serialize = "manipulationSpeed")]
    ManipulationSpeed,
    #[strum(serialize = "steadyAim")]
    SteadyAim,
    #[strum(serialize = "healingeffectivness")]
    HealingEffectiveness,
    #[strum(serialize = "hungerrate")]
    HungerRate,
}

impl PlayerStat {
    /// The stat's key in the game data, which is also its column name.
    pub fn key(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Resist {
    #[strum(serialize = "PiercingAttack")]
    Piercing,
    #[strum(serialize = "SlashingAttack")]
    Slashing,
    #[strum(serialize = "BluntAttack")]
    Blunt,
}

impl Resist {
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// One entry of the armor stats JSON. Every field is optional in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArmorRecord {
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub zones: Vec<String>,
    /// Kept as written, so `2` stays `2` in the table.
    #[serde(default)]
    pub resists: IndexMap<String, serde_json::Number>,
    /// Never populated by these tools, only carried so the output keeps its shape.
    #[serde(default)]
    pub flat_reduction: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub player_stats: IndexMap<String, f64>,
}

impl ArmorRecord {
    pub fn resist(&self, resist: Resist) -> Option<f64> {
        self.resists.get(resist.key()).and_then(serde_json::Number::as_f64)
    }

    /// Absent stats count as zero.
    pub fn player_stat(&self, stat: PlayerStat) -> f64 {
        self.player_stats.get(stat.key()).copied().unwrap_or(0.0)
    }
}

/// Positional parts of a record name.
///
/// `weapon-sword-long-steel` has the type `sword`, the subtype `long` and the material `steel`.
/// The first segment is never used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub kind: &'a str,
    pub subtype: &'a str,
    pub material: &'a str,
}

impl<'a> NameParts<'a> {
    pub fn parse(name: &'a str) -> Self {
        let parts: Vec<&str> = name.split(NAME_DELIMITER).collect();

        Self {
            kind: parts.get(1).copied().unwrap_or_default(),
            subtype: parts.get(2).copied().unwrap_or_default(),
            material: match parts.len() {
                0 | 1 => "",
                n => parts[n - 1],
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Unable to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Unable to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not valid stats JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unable to process table {}: {source}", .path.display())]
    Table { path: PathBuf, source: csv::Error },

    #[error("Table {} has no {column} column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A header row is derived from the records, so an empty set can't be written.
    #[error("{} contains no records", .0.display())]
    NoRecords(PathBuf),

    #[error("Invalid {column} value {value:?} for {name}")]
    InvalidResist {
        name: String,
        column: &'static str,
        value: String,
    },
}
