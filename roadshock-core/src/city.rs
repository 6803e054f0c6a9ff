//! City references, the preset list, and catalog search.
use serde::{Deserialize, Serialize};

use crate::constants::{CITY_SEARCH_MAX_RESULTS, CITY_SEARCH_MIN_CHARS};

/// A city chosen by the user.
///
/// `label` is the display form; `query` is the canonical string sent to the
/// simulation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityRef {
    label: String,
    query: String,
}

impl CityRef {
    #[must_use]
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
        }
    }

    /// City typed by hand: the text serves as both label and query.
    #[must_use]
    pub fn free_text(text: &str) -> Self {
        let trimmed = text.trim();
        Self::new(trimmed, trimmed)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Popular cities offered before the user types anything.
#[must_use]
pub fn preset_cities() -> Vec<CityRef> {
    [
        ("Chicago, IL", "Chicago, Illinois, USA"),
        ("Pittsburgh, PA", "Pittsburgh, Pennsylvania, USA"),
        ("Dallas, TX", "Dallas, Texas, USA"),
        ("Phoenix, AZ", "Phoenix, Arizona, USA"),
        ("San Francisco, CA", "San Francisco, California, USA"),
    ]
    .into_iter()
    .map(|(label, query)| CityRef::new(label, query))
    .collect()
}

/// Decide which city identifier a run should target.
///
/// A non-blank typed override wins over the selected city.
#[must_use]
pub fn resolve_city_query(override_text: Option<&str>, selected: Option<&CityRef>) -> Option<String> {
    if let Some(text) = override_text.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(text.to_string());
    }
    selected
        .map(|city| city.query().trim())
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogRow {
    name: String,
    state: String,
}

/// Searchable list of known cities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityCatalog {
    cities: Vec<CityRef>,
}

impl CityCatalog {
    #[must_use]
    pub const fn new(cities: Vec<CityRef>) -> Self {
        Self { cities }
    }

    /// Load a catalog from `[{"name": "...", "state": "..."}]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into catalog rows.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<CatalogRow> = serde_json::from_str(json)?;
        let cities = rows
            .into_iter()
            .map(|row| {
                let label = format!("{}, {}", row.name.trim(), row.state.trim());
                CityRef::new(label.clone(), label)
            })
            .collect();
        Ok(Self { cities })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Case-insensitive substring match on labels, capped to a short list.
    ///
    /// Queries shorter than two characters return nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CityRef> {
        let needle = normalize(query);
        if needle.chars().count() < CITY_SEARCH_MIN_CHARS {
            return Vec::new();
        }
        self.cities
            .iter()
            .filter(|city| normalize(city.label()).contains(&needle))
            .take(CITY_SEARCH_MAX_RESULTS)
            .collect()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
