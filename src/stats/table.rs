use std::{
    io::{Read, Write},
    path::Path,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::stats::{ArmorRecord, NameParts, PlayerStat, Resist, SignConvention, StatsError};

/// Header of the stats table, in column order.
pub const COLUMNS: [&str; 16] = [
    "Name",
    "Type",
    "Subtype",
    "Material",
    "Layers",
    "LayerCount",
    "Zones",
    "ZoneCount",
    "PiercingAttack",
    "SlashingAttack",
    "BluntAttack",
    "walkspeed",
    "manipulationSpeed",
    "steadyAim",
    "healingeffectivness",
    "hungerrate",
];

const LIST_SEPARATOR: &str = ", ";

/// One row of the stats table.
///
/// Every cell is kept as text so a hand-edited table still loads. The counts are derived from the
/// lists and are never read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Subtype")]
    pub subtype: String,
    #[serde(rename = "Material")]
    pub material: String,

    #[serde(rename = "Layers")]
    pub layers: String,
    #[serde(rename = "LayerCount", skip_deserializing)]
    pub layer_count: usize,
    #[serde(rename = "Zones")]
    pub zones: String,
    #[serde(rename = "ZoneCount", skip_deserializing)]
    pub zone_count: usize,

    #[serde(rename = "PiercingAttack")]
    pub piercing: String,
    #[serde(rename = "SlashingAttack")]
    pub slashing: String,
    #[serde(rename = "BluntAttack")]
    pub blunt: String,

    #[serde(rename = "walkspeed")]
    pub walk_speed: String,
    #[serde(rename = "manipulationSpeed")]
    pub manipulation_speed: String,
    #[serde(rename = "steadyAim")]
    pub steady_aim: String,
    #[serde(rename = "healingeffectivness")]
    pub healing_effectiveness: String,
    #[serde(rename = "hungerrate")]
    pub hunger_rate: String,
}

impl StatRow {
    /// Flattens a record. Resists the record doesn't have are left as empty cells.
    pub fn from_record(name: &str, record: &ArmorRecord) -> Self {
        let parts = NameParts::parse(name);

        let mut row = Self {
            name: name.to_string(),
            kind: parts.kind.to_string(),
            subtype: parts.subtype.to_string(),
            material: parts.material.to_string(),
            layers: record.layers.join(LIST_SEPARATOR),
            layer_count: record.layers.len(),
            zones: record.zones.join(LIST_SEPARATOR),
            zone_count: record.zones.len(),
            ..Default::default()
        };

        for resist in Resist::iter() {
            *row.resist_mut(resist) = record
                .resists
                .get(resist.key())
                .map(ToString::to_string)
                .unwrap_or_default();
        }

        for stat in PlayerStat::iter() {
            *row.stat_mut(stat) = format_percent(record.player_stat(stat));
        }

        row
    }

    /// Rebuilds a record, giving each stat the sign from `signs`.
    ///
    /// Empty resist cells become `0`, unlike the forward direction which leaves missing resists
    /// empty. Unreadable percentages also become `0`, but a resist that isn't a finite number is an
    /// error.
    pub fn to_record(&self, signs: &SignConvention) -> Result<ArmorRecord, StatsError> {
        let mut resists = IndexMap::new();
        for resist in Resist::iter() {
            let cell = self.resist(resist).trim();

            let value = if cell.is_empty() {
                Some(0.0)
            } else {
                cell.parse::<f64>().ok()
            };

            let number = value
                .and_then(serde_json::Number::from_f64)
                .ok_or_else(|| StatsError::InvalidResist {
                    name: self.name.clone(),
                    column: resist.key(),
                    value: cell.to_string(),
                })?;

            resists.insert(resist.key().to_string(), number);
        }

        let player_stats = PlayerStat::iter()
            .map(|stat| {
                (
                    stat.key().to_string(),
                    signs.apply(stat, parse_percent(self.stat(stat))),
                )
            })
            .collect();

        Ok(ArmorRecord {
            layers: split_list(&self.layers),
            zones: split_list(&self.zones),
            resists,
            flat_reduction: IndexMap::new(),
            player_stats,
        })
    }

    pub fn resist(&self, resist: Resist) -> &str {
        match resist {
            Resist::Piercing => &self.piercing,
            Resist::Slashing => &self.slashing,
            Resist::Blunt => &self.blunt,
        }
    }

    fn resist_mut(&mut self, resist: Resist) -> &mut String {
        match resist {
            Resist::Piercing => &mut self.piercing,
            Resist::Slashing => &mut self.slashing,
            Resist::Blunt => &mut self.blunt,
        }
    }

    pub fn stat(&self, stat: PlayerStat) -> &str {
        match stat {
            PlayerStat::WalkSpeed => &self.walk_speed,
            PlayerStat::ManipulationSpeed => &self.manipulation_speed,
            PlayerStat::SteadyAim => &self.steady_aim,
            PlayerStat::HealingEffectiveness => &self.healing_effectiveness,
            PlayerStat::HungerRate => &self.hunger_rate,
        }
    }

    fn stat_mut(&mut self, stat: PlayerStat) -> &mut String {
        match stat {
            PlayerStat::WalkSpeed => &mut self.walk_speed,
            PlayerStat::ManipulationSpeed => &mut self.manipulation_speed,
            PlayerStat::SteadyAim => &mut self.steady_aim,
            PlayerStat::HealingEffectiveness => &mut self.healing_effectiveness,
            PlayerStat::HungerRate => &mut self.hunger_rate,
        }
    }
}

/// Formats a stat as a whole, unsigned percentage. `-0.05` becomes `5%`.
///
/// Halfway values round to even.
pub fn format_percent(value: f64) -> String {
    if value == 0.0 {
        return "0%".to_string();
    }

    format!("{}%", (value.abs() * 100.0).round_ties_even() as i64)
}

/// Reads a percentage cell back into a fraction. Anything unreadable, `nan%` and `inf%` included,
/// is `0`.
pub fn parse_percent(cell: &str) -> f64 {
    if cell.is_empty() {
        return 0.0;
    }

    cell.replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|percent| percent.is_finite())
        .map(|percent| percent / 100.0)
        .unwrap_or(0.0)
}

fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return vec![];
    }

    cell.split(',').map(|item| item.trim().to_string()).collect()
}

pub fn write_table<W: Write>(rows: &[StatRow], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}

/// Reads every row of a stats table. Short rows are padded with empty cells.
///
/// `path` only names the table in errors. The header must have every column of [`COLUMNS`] apart
/// from the counts. An empty file has no rows.
pub fn read_table<R: Read, P: AsRef<Path>>(
    reader: R,
    path: P,
) -> Result<Vec<StatRow>, StatsError> {
    let table_error = |source: csv::Error| StatsError::Table {
        path: path.as_ref().to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(table_error)?.clone();

    if headers.is_empty() {
        return Ok(vec![]);
    }

    if let Some(column) = COLUMNS
        .into_iter()
        .filter(|column| !matches!(*column, "LayerCount" | "ZoneCount"))
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(StatsError::MissingColumn {
            path: path.as_ref().to_path_buf(),
            column,
        });
    }

    let mut rows = vec![];

    for record in reader.records() {
        let mut record = record.map_err(table_error)?;

        while record.len() < headers.len() {
            record.push_field("");
        }

        rows.push(record.deserialize::<StatRow>(Some(&headers)).map_err(table_error)?);
    }

    Ok(rows)
}
