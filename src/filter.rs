//! Filter selection state
//!
//! Pending per-category selections and which filter sections are expanded.
//! Editing a selection never issues a request; applying it is a separate
//! action handled by the browser model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{BrowserError, Result};

/// A filterable attribute of a puzzle position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    Rooks,
    Queens,
    Bishops,
    Knights,
    Pawns,
    GameState,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        FilterCategory::Rooks,
        FilterCategory::Queens,
        FilterCategory::Bishops,
        FilterCategory::Knights,
        FilterCategory::Pawns,
        FilterCategory::GameState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::Rooks => "rooks",
            FilterCategory::Queens => "queens",
            FilterCategory::Bishops => "bishops",
            FilterCategory::Knights => "knights",
            FilterCategory::Pawns => "pawns",
            FilterCategory::GameState => "game_state",
        }
    }

    /// Values offered for this category, in display order.
    pub fn options(&self) -> Vec<FilterValue> {
        use FilterValue::{AtLeast, Count, Phase};
        match self {
            FilterCategory::Rooks | FilterCategory::Bishops | FilterCategory::Knights => {
                vec![Count(0), Count(1), Count(2), AtLeast(3)]
            }
            FilterCategory::Queens => vec![Count(0), Count(1), AtLeast(2)],
            FilterCategory::Pawns => (0..=8).map(Count).chain([AtLeast(9)]).collect(),
            FilterCategory::GameState => GamePhase::ALL.into_iter().map(Phase).collect(),
        }
    }

    pub fn accepts(&self, value: FilterValue) -> bool {
        self.options().contains(&value)
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rook" | "rooks" => Ok(FilterCategory::Rooks),
            "queen" | "queens" => Ok(FilterCategory::Queens),
            "bishop" | "bishops" => Ok(FilterCategory::Bishops),
            "knight" | "knights" => Ok(FilterCategory::Knights),
            "pawn" | "pawns" => Ok(FilterCategory::Pawns),
            "game_state" | "game-state" | "phase" => Ok(FilterCategory::GameState),
            _ => Err(BrowserError::InvalidFilterCategory(s.to_string())),
        }
    }
}

/// Phase of the game, as classified by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Opening,
    Midgame,
    Endgame,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [GamePhase::Opening, GamePhase::Midgame, GamePhase::Endgame];

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Opening => "opening",
            GamePhase::Midgame => "midgame",
            GamePhase::Endgame => "endgame",
        }
    }
}

/// One selectable value within a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterValue {
    /// Exactly this many pieces
    Count(u8),
    /// This many pieces or more, shown as "N+"
    AtLeast(u8),
    Phase(GamePhase),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Count(n) => write!(f, "{n}"),
            FilterValue::AtLeast(n) => write!(f, "{n}+"),
            FilterValue::Phase(phase) => f.write_str(phase.as_str()),
        }
    }
}

impl FromStr for FilterValue {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || BrowserError::InvalidFilterValue {
            category: "any".to_string(),
            value: s.to_string(),
        };

        if let Some(count) = s.strip_suffix('+') {
            return count.parse().map(FilterValue::AtLeast).map_err(|_| invalid());
        }
        if let Ok(count) = s.parse() {
            return Ok(FilterValue::Count(count));
        }
        GamePhase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(s))
            .map(FilterValue::Phase)
            .ok_or_else(invalid)
    }
}

// The backend compares exact counts numerically and matches sentinels and
// phase labels as strings.
impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FilterValue::Count(n) => serializer.serialize_u8(*n),
            FilterValue::AtLeast(_) => serializer.collect_str(self),
            FilterValue::Phase(phase) => serializer.serialize_str(phase.as_str()),
        }
    }
}

/// Selected values per category. An empty set places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<FilterCategory, BTreeSet<FilterValue>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the category's selection, or remove it if present.
    ///
    /// Returns whether the value is selected afterwards. Values the category
    /// does not offer are rejected and leave the selection unchanged.
    pub fn toggle_value(&mut self, category: FilterCategory, value: FilterValue) -> Result<bool> {
        if !category.accepts(value) {
            return Err(BrowserError::InvalidFilterValue {
                category: category.to_string(),
                value: value.to_string(),
            });
        }

        let values = self.selected.entry(category).or_default();
        let now_selected = if values.remove(&value) {
            false
        } else {
            values.insert(value);
            true
        };
        if values.is_empty() {
            self.selected.remove(&category);
        }
        Ok(now_selected)
    }

    pub fn is_selected(&self, category: FilterCategory, value: FilterValue) -> bool {
        self.selected
            .get(&category)
            .is_some_and(|values| values.contains(&value))
    }

    pub fn values(&self, category: FilterCategory) -> impl Iterator<Item = FilterValue> + '_ {
        self.selected.get(&category).into_iter().flatten().copied()
    }

    /// Categories with at least one selected value
    pub fn active_categories(&self) -> impl Iterator<Item = FilterCategory> + '_ {
        self.selected
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, _)| *category)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

// Serialized as `{ "rooks": [2, "3+"], "game_state": ["opening"] }`, omitting
// unconstrained categories.
impl Serialize for FilterSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.selected.iter().filter(|(_, values)| !values.is_empty()))
    }
}

/// Which filter sections are expanded in the panel. Presentational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpandedSections {
    expanded: BTreeMap<FilterCategory, bool>,
}

impl ExpandedSections {
    /// Flip the section; returns whether it is expanded afterwards.
    pub fn toggle(&mut self, category: FilterCategory) -> bool {
        let entry = self.expanded.entry(category).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_expanded(&self, category: FilterCategory) -> bool {
        self.expanded.get(&category).copied().unwrap_or(false)
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_collapsed(&self) -> bool {
        !self.expanded.values().any(|expanded| *expanded)
    }
}
