//! Spot Model
//!
//! Enumerated spot attributes. Values travel and persist as their display
//! strings ("On campus", "Cafe/Restaurant", ...), which is also what search
//! predicates match against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected enumerated value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {field}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

macro_rules! display_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in form order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Display strings of [`Self::ALL`]
            pub fn options() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

display_enum! {
    /// Where the spot is relative to campus
    Location, "location" {
        OnCampus => "On campus",
        OffCampus => "Off campus",
    }
}

display_enum! {
    /// Kind of place
    SpotType, "type" {
        AcademicBuilding => "Academic building",
        CafeRestaurant => "Cafe/Restaurant",
        Library => "Library",
        NonRestaurantStore => "Non-restaurant store",
        Miscellaneous => "Miscellaneous",
    }
}

display_enum! {
    /// Typical noise level
    NoiseLevel, "noise level" {
        Silent => "Silent",
        Quiet => "Quiet",
        Conversational => "Conversational",
        Loud => "Loud",
    }
}

/// Parse the "purchase required" form value
///
/// Accepts `Yes`/`No` (the form's radio values) and `true`/`false`,
/// case-insensitively.
pub fn parse_purchase_required(value: &str) -> Result<bool, ParseEnumError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(ParseEnumError {
            field: "purchase required",
            value: value.to_string(),
        }),
    }
}

/// Enumerated values offered by the create/edit/search forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotFormOptions {
    pub locations: Vec<String>,
    pub types: Vec<String>,
    pub noise_levels: Vec<String>,
    pub purchase_required: Vec<String>,
}

impl Default for SpotFormOptions {
    fn default() -> Self {
        Self {
            locations: Location::options().into_iter().map(String::from).collect(),
            types: SpotType::options().into_iter().map(String::from).collect(),
            noise_levels: NoiseLevel::options().into_iter().map(String::from).collect(),
            purchase_required: vec!["Yes".to_string(), "No".to_string()],
        }
    }
}
