//! Cascading categorical filter over the point table.
//!
//! Stages run in a fixed order (crop, flight date, species, variety, block
//! set). The options each stage offers come from the rows left by the stages
//! before it, but the final row set is the intersection of every active
//! predicate and therefore independent of the order.

use serde::{Deserialize, Serialize};

use crate::core::domain::{PointRecord, PointTable};
use crate::core::schema::Attribute;
use crate::parsing::dates::canonical_date;

/// Order in which stages are applied and their options computed.
pub const STAGE_ORDER: [Attribute; 5] = [
    Attribute::Crop,
    Attribute::FlightDate,
    Attribute::Species,
    Attribute::Variety,
    Attribute::Block,
];

/// Selection words that mean "no constraint".
const ALL_SENTINELS: [&str; 4] = ["all", "todas", "todos", ""];

static NO_CONSTRAINT: Choice = Choice::All;

/// Single-valued stage selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Parse a selection coming from a widget or command line.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if ALL_SENTINELS.contains(&trimmed.to_lowercase().as_str()) {
            Choice::All
        } else {
            Choice::Only(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl From<Option<String>> for Choice {
    fn from(value: Option<String>) -> Self {
        value.map(|v| Choice::parse(&v)).unwrap_or_default()
    }
}

impl From<Choice> for Option<String> {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl From<&str> for Choice {
    fn from(raw: &str) -> Self {
        Choice::parse(raw)
    }
}

/// The user's current selection for every stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub crop: Choice,
    pub flight_date: Choice,
    pub species: Choice,
    pub variety: Choice,
    /// Empty means every block.
    pub blocks: Vec<String>,
}

impl FilterSelection {
    pub fn choice(&self, attribute: Attribute) -> &Choice {
        match attribute {
            Attribute::Crop => &self.crop,
            Attribute::FlightDate => &self.flight_date,
            Attribute::Species => &self.species,
            Attribute::Variety => &self.variety,
            Attribute::Block => &NO_CONSTRAINT,
        }
    }

    /// True when no stage constrains anything.
    pub fn is_empty(&self) -> bool {
        self.crop.is_all()
            && self.flight_date.is_all()
            && self.species.is_all()
            && self.variety.is_all()
            && self.blocks.is_empty()
    }
}

/// Options offered by one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOptions {
    pub attribute: Attribute,
    /// Sorted distinct values among the rows reaching this stage.
    pub options: Vec<String>,
    /// The table has no column for this stage.
    pub skipped: bool,
}

/// Filtered table plus what each stage offered.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub table: PointTable,
    pub stages: Vec<StageOptions>,
}

impl FilterOutcome {
    pub fn options(&self, attribute: Attribute) -> &[String] {
        self.stages
            .iter()
            .find(|s| s.attribute == attribute)
            .map(|s| s.options.as_slice())
            .unwrap_or(&[])
    }
}

fn distinct_values(rows: &[&PointRecord], attribute: Attribute) -> Vec<String> {
    let mut values: Vec<String> = rows
        .iter()
        .filter_map(|r| r.attribute(attribute))
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}

fn stage_predicate<'a>(
    attribute: Attribute,
    selection: &'a FilterSelection,
) -> Option<Box<dyn Fn(&PointRecord) -> bool + 'a>> {
    match attribute {
        Attribute::Block => {
            if selection.blocks.is_empty() {
                return None;
            }
            Some(Box::new(move |r: &PointRecord| {
                r.block
                    .as_ref()
                    .is_some_and(|b| selection.blocks.iter().any(|s| s == b))
            }))
        }
        Attribute::FlightDate => {
            let wanted = canonical_date(selection.flight_date.value()?)?;
            Some(Box::new(move |r: &PointRecord| {
                r.flight_date.as_deref() == Some(wanted.as_str())
            }))
        }
        _ => {
            let wanted = selection.choice(attribute).value()?;
            Some(Box::new(move |r: &PointRecord| {
                r.attribute(attribute) == Some(wanted)
            }))
        }
    }
}

/// Apply every stage of `selection` to `base`.
///
/// `base` is left untouched; the outcome holds a new table.
pub fn apply_cascade(base: &PointTable, selection: &FilterSelection) -> FilterOutcome {
    let mut rows: Vec<&PointRecord> = base.records.iter().collect();
    let mut stages = Vec::with_capacity(STAGE_ORDER.len());

    for attribute in STAGE_ORDER {
        if !base.schema.has(attribute) {
            stages.push(StageOptions {
                attribute,
                options: Vec::new(),
                skipped: true,
            });
            continue;
        }

        stages.push(StageOptions {
            attribute,
            options: distinct_values(&rows, attribute),
            skipped: false,
        });

        if let Some(keep) = stage_predicate(attribute, selection) {
            rows.retain(|r| keep(r));
        }
    }

    log::debug!(
        "Cascade kept {} of {} points",
        rows.len(),
        base.len()
    );

    FilterOutcome {
        table: PointTable::new(base.schema.clone(), rows.into_iter().cloned().collect()),
        stages,
    }
}

/// Keep rows whose attribute equals `choice`; absent columns keep everything.
pub fn filter_by_attribute(table: &PointTable, attribute: Attribute, choice: &Choice) -> PointTable {
    let selection = match attribute {
        Attribute::Crop => FilterSelection {
            crop: choice.clone(),
            ..Default::default()
        },
        Attribute::FlightDate => FilterSelection {
            flight_date: choice.clone(),
            ..Default::default()
        },
        Attribute::Species => FilterSelection {
            species: choice.clone(),
            ..Default::default()
        },
        Attribute::Variety => FilterSelection {
            variety: choice.clone(),
            ..Default::default()
        },
        Attribute::Block => FilterSelection {
            blocks: choice.value().map(|b| vec![b.to_string()]).unwrap_or_default(),
            ..Default::default()
        },
    };
    apply_cascade(table, &selection).table
}

/// Keep rows from one flight, compared on canonical dates.
pub fn filter_by_flight_date(table: &PointTable, date: &str) -> PointTable {
    filter_by_attribute(table, Attribute::FlightDate, &Choice::Only(date.to_string()))
}

/// Keep rows whose block is in `blocks`; an empty set keeps everything.
pub fn filter_by_blocks(table: &PointTable, blocks: &[String]) -> PointTable {
    let selection = FilterSelection {
        blocks: blocks.to_vec(),
        ..Default::default()
    };
    apply_cascade(table, &selection).table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::PointSchema;

    fn point(crop: &str, date: &str, species: &str, variety: Option<&str>, block: &str) -> PointRecord {
        PointRecord {
            crop: Some(crop.to_string()),
            flight_date: Some(date.to_string()),
            species: Some(species.to_string()),
            variety: variety.map(str::to_string),
            block: Some(block.to_string()),
            ..Default::default()
        }
    }

    fn table() -> PointTable {
        let schema = PointSchema {
            has_block: true,
            has_species: true,
            has_variety: true,
            has_crop: true,
            has_flight_date: true,
            ..Default::default()
        };
        PointTable::new(
            schema,
            vec![
                point("Frutal", "2023-10-15", "Cerezo", Some("Lapins"), "C1"),
                point("Frutal", "2023-10-15", "Cerezo", Some("Santina"), "C2"),
                point("Frutal", "2023-11-20", "Cerezo", Some("Lapins"), "C1"),
                point("Frutal", "2023-11-20", "Ciruelo", None, "C3"),
                point("Vid", "2023-11-20", "Uva", Some("Syrah"), "V1"),
            ],
        )
    }

    #[test]
    fn test_choice_sentinels() {
        assert_eq!(Choice::parse("All"), Choice::All);
        assert_eq!(Choice::parse("Todas"), Choice::All);
        assert_eq!(Choice::parse("todos"), Choice::All);
        assert_eq!(Choice::parse("  "), Choice::All);
        assert_eq!(Choice::parse(" Lapins "), Choice::Only("Lapins".to_string()));
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let base = table();
        let outcome = apply_cascade(&base, &FilterSelection::default());
        assert_eq!(outcome.table.records, base.records);
        assert_eq!(outcome.options(Attribute::Crop), ["Frutal", "Vid"]);
    }

    #[test]
    fn test_options_come_from_narrowed_rows() {
        let base = table();
        let selection = FilterSelection {
            crop: Choice::parse("Frutal"),
            flight_date: Choice::parse("20231120"),
            ..Default::default()
        };
        let outcome = apply_cascade(&base, &selection);

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.options(Attribute::FlightDate), ["2023-10-15", "2023-11-20"]);
        assert_eq!(outcome.options(Attribute::Species), ["Cerezo", "Ciruelo"]);
        assert_eq!(outcome.options(Attribute::Variety), ["Lapins"]);
        assert_eq!(outcome.options(Attribute::Block), ["C1", "C3"]);
    }

    #[test]
    fn test_block_stage_is_membership() {
        let base = table();
        let selection = FilterSelection {
            blocks: vec!["C1".to_string(), "V1".to_string()],
            ..Default::default()
        };
        let outcome = apply_cascade(&base, &selection);
        assert_eq!(outcome.table.len(), 3);
        assert!(outcome
            .table
            .records
            .iter()
            .all(|r| matches!(r.block.as_deref(), Some("C1") | Some("V1"))));
    }

    #[test]
    fn test_missing_variety_column_is_skipped() {
        let mut base = table();
        base.schema.has_variety = false;
        for record in &mut base.records {
            record.variety = None;
        }
        let selection = FilterSelection {
            variety: Choice::parse("Lapins"),
            ..Default::default()
        };
        let outcome = apply_cascade(&base, &selection);

        assert_eq!(outcome.table.len(), base.len());
        let variety = &outcome.stages[3];
        assert_eq!(variety.attribute, Attribute::Variety);
        assert!(variety.skipped);
        assert!(variety.options.is_empty());
    }

    #[test]
    fn test_base_table_untouched() {
        let base = table();
        let before = base.records.clone();
        let _ = filter_by_flight_date(&base, "15/10/2023");
        assert_eq!(base.records, before);
        assert_eq!(filter_by_flight_date(&base, "15/10/2023").len(), 2);
    }

    #[test]
    fn test_selection_deserializes_sentinels() {
        let selection: FilterSelection =
            serde_json::from_str(r#"{"crop": "Todos", "species": "Cerezo", "blocks": []}"#).unwrap();
        assert_eq!(selection.crop, Choice::All);
        assert_eq!(selection.species, Choice::Only("Cerezo".to_string()));
        assert_eq!(selection.variety, Choice::All);
    }
}
