//! Spot search filter
//!
//! The search form has five optional fields. Each one turns into exactly one
//! typed predicate so every query has the same shape:
//!
//! | form field | present | absent |
//! |------------|---------|--------|
//! | value      | `field = $field` | `field != NONE` |
//!
//! Predicates are ANDed; there is no OR or fuzzy matching. Values are always
//! bound as query parameters. Results are ordered newest first.

use serde::{Deserialize, Serialize};
use shared::models::parse_purchase_required;

use crate::db::models::Spot;
use crate::utils::{AppError, AppResult};

/// Placeholder the search form uses for "any"
const ANY_PLACEHOLDER: &str = "---";

/// Filterable spot columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotField {
    Name,
    Location,
    SpotType,
    PurchaseRequired,
    NoiseLevel,
}

impl SpotField {
    /// Form order; also the order predicates appear in the query
    pub const ALL: [SpotField; 5] = [
        SpotField::Name,
        SpotField::Location,
        SpotField::SpotType,
        SpotField::PurchaseRequired,
        SpotField::NoiseLevel,
    ];

    /// Column name in the `spot` table (doubles as the bind parameter name)
    pub fn column(&self) -> &'static str {
        match self {
            SpotField::Name => "name",
            SpotField::Location => "location",
            SpotField::SpotType => "spot_type",
            SpotField::PurchaseRequired => "purchase_required",
            SpotField::NoiseLevel => "noise_level",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

impl FilterValue {
    fn to_json(&self) -> serde_json::Value {
        match self {
            FilterValue::Text(s) => serde_json::Value::String(s.clone()),
            FilterValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field must equal the value exactly
    Equals(SpotField, FilterValue),
    /// Field only has to be present
    Exists(SpotField),
}

impl Predicate {
    pub fn field(&self) -> SpotField {
        match self {
            Predicate::Equals(f, _) | Predicate::Exists(f) => *f,
        }
    }

    fn matches(&self, spot: &Spot) -> bool {
        let Predicate::Equals(field, value) = self else {
            return true;
        };
        match (field, value) {
            (SpotField::Name, FilterValue::Text(v)) => spot.name == *v,
            (SpotField::Location, FilterValue::Text(v)) => spot.location.as_str() == v,
            (SpotField::SpotType, FilterValue::Text(v)) => spot.spot_type.as_str() == v,
            (SpotField::NoiseLevel, FilterValue::Text(v)) => spot.noise_level.as_str() == v,
            (SpotField::PurchaseRequired, FilterValue::Bool(v)) => spot.purchase_required == *v,
            _ => false,
        }
    }
}

/// Raw search form, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default, alias = "fspotname")]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "ftype")]
    pub spot_type: Option<String>,
    #[serde(default)]
    pub purchase_required: Option<String>,
    #[serde(default)]
    pub noise_level: Option<String>,
}

/// A complete, ANDed predicate set over the `spot` table
#[derive(Debug, Clone, PartialEq)]
pub struct SpotFilter {
    predicates: Vec<Predicate>,
}

/// Rendered query plus its bind parameters
#[derive(Debug, Clone)]
pub struct SpotQuery {
    pub sql: String,
    pub params: Vec<(String, serde_json::Value)>,
}

impl SpotFilter {
    pub fn builder() -> SpotFilterBuilder {
        SpotFilterBuilder::default()
    }

    /// Build from the submitted search form
    pub fn from_form(form: &SearchForm) -> AppResult<Self> {
        let mut builder = Self::builder();
        if let Some(v) = &form.name {
            builder = builder.name(v);
        }
        if let Some(v) = &form.location {
            builder = builder.location(v);
        }
        if let Some(v) = &form.spot_type {
            builder = builder.spot_type(v);
        }
        if let Some(v) = &form.purchase_required {
            builder = builder.purchase_required(v);
        }
        if let Some(v) = &form.noise_level {
            builder = builder.noise_level(v);
        }
        builder.build()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of exact-match predicates
    pub fn constrained(&self) -> usize {
        self.predicates
            .iter()
            .filter(|p| matches!(p, Predicate::Equals(..)))
            .count()
    }

    /// Render as a SurrealQL select, newest first
    pub fn to_query(&self) -> SpotQuery {
        let mut clauses = Vec::with_capacity(self.predicates.len());
        let mut params = Vec::new();
        for predicate in &self.predicates {
            let column = predicate.field().column();
            match predicate {
                Predicate::Equals(_, value) => {
                    clauses.push(format!("{column} = ${column}"));
                    params.push((column.to_string(), value.to_json()));
                }
                Predicate::Exists(_) => clauses.push(format!("{column} != NONE")),
            }
        }
        let sql = format!(
            "SELECT * FROM spot WHERE {} ORDER BY created_at DESC",
            clauses.join(" AND ")
        );
        SpotQuery { sql, params }
    }

    /// Evaluate the same predicates in memory
    pub fn matches(&self, spot: &Spot) -> bool {
        self.predicates.iter().all(|p| p.matches(spot))
    }
}

/// Accumulates optional field values; unset or blank fields become
/// [`Predicate::Exists`]
#[derive(Debug, Clone, Default)]
pub struct SpotFilterBuilder {
    name: Option<String>,
    location: Option<String>,
    spot_type: Option<String>,
    purchase_required: Option<String>,
    noise_level: Option<String>,
}

fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ANY_PLACEHOLDER {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl SpotFilterBuilder {
    pub fn name(mut self, value: impl AsRef<str>) -> Self {
        self.name = present(value.as_ref());
        self
    }

    pub fn location(mut self, value: impl AsRef<str>) -> Self {
        self.location = present(value.as_ref());
        self
    }

    pub fn spot_type(mut self, value: impl AsRef<str>) -> Self {
        self.spot_type = present(value.as_ref());
        self
    }

    pub fn purchase_required(mut self, value: impl AsRef<str>) -> Self {
        self.purchase_required = present(value.as_ref());
        self
    }

    pub fn noise_level(mut self, value: impl AsRef<str>) -> Self {
        self.noise_level = present(value.as_ref());
        self
    }

    pub fn build(self) -> AppResult<SpotFilter> {
        let purchase = self
            .purchase_required
            .as_deref()
            .map(parse_purchase_required)
            .transpose()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let predicates = SpotField::ALL
            .iter()
            .map(|field| {
                let value = match field {
                    SpotField::Name => self.name.clone().map(FilterValue::Text),
                    SpotField::Location => self.location.clone().map(FilterValue::Text),
                    SpotField::SpotType => self.spot_type.clone().map(FilterValue::Text),
                    SpotField::NoiseLevel => self.noise_level.clone().map(FilterValue::Text),
                    SpotField::PurchaseRequired => purchase.map(FilterValue::Bool),
                };
                match value {
                    Some(v) => Predicate::Equals(*field, v),
                    None => Predicate::Exists(*field),
                }
            })
            .collect();

        Ok(SpotFilter { predicates })
    }
}
