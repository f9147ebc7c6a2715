//! Demographic profile resolution and default score multipliers.
//!
//! A user profile is reduced to a normalized demographic profile (age
//! bracket, gender category, occupation) before scoring. Missing data falls
//! back to the `26-35` / `other` midpoint so the default multipliers stay
//! near 1.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Age bracket derived from a raw age. Upper edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "56+")]
    Over55,
}

impl AgeBracket {
    /// Bracket for a raw age in years.
    pub fn from_age(age: u32) -> Self {
        if age <= 25 {
            AgeBracket::From18To25
        } else if age <= 35 {
            AgeBracket::From26To35
        } else if age <= 45 {
            AgeBracket::From36To45
        } else if age <= 55 {
            AgeBracket::From46To55
        } else {
            AgeBracket::Over55
        }
    }

    /// Engine-wide default score multiplier for this bracket, used when a
    /// questionnaire does not declare its own modifier table.
    pub fn default_multiplier(self) -> f64 {
        match self {
            AgeBracket::From18To25 => 0.9,
            AgeBracket::From26To35 => 1.1,
            AgeBracket::From36To45 => 1.2,
            AgeBracket::From46To55 => 1.0,
            AgeBracket::Over55 => 0.8,
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeBracket::From18To25 => "18-25",
            AgeBracket::From26To35 => "26-35",
            AgeBracket::From36To45 => "36-45",
            AgeBracket::From46To55 => "46-55",
            AgeBracket::Over55 => "56+",
        };
        write!(f, "{label}")
    }
}

impl FromStr for AgeBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "18-25" => Ok(AgeBracket::From18To25),
            "26-35" => Ok(AgeBracket::From26To35),
            "36-45" => Ok(AgeBracket::From36To45),
            "46-55" => Ok(AgeBracket::From46To55),
            "56+" => Ok(AgeBracket::Over55),
            other => Err(format!("unknown age bracket: {other}")),
        }
    }
}

/// Gender category used for scoring adjustment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GenderCategory {
    Male,
    Female,
    #[default]
    Other,
}

impl GenderCategory {
    /// Engine-wide default score multiplier for this category.
    pub fn default_multiplier(self) -> f64 {
        match self {
            GenderCategory::Male => 0.95,
            GenderCategory::Female => 1.1,
            GenderCategory::Other => 1.15,
        }
    }
}

impl fmt::Display for GenderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenderCategory::Male => write!(f, "male"),
            GenderCategory::Female => write!(f, "female"),
            GenderCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for GenderCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(GenderCategory::Male),
            "female" => Ok(GenderCategory::Female),
            "other" => Ok(GenderCategory::Other),
            other => Err(format!("unknown gender category: {other}")),
        }
    }
}

/// Raw user data as provided by the demographics source. Every field may be
/// absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
}

/// Normalized demographic profile used by scoring and interpretation.
///
/// Derived, never authoritative: it is recomputed from the user profile at
/// the start of each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicProfile {
    pub age_bracket: AgeBracket,
    pub gender: GenderCategory,
    #[serde(default)]
    pub raw_age: Option<u32>,
    #[serde(default)]
    pub occupation: Option<String>,
}

impl Default for DemographicProfile {
    fn default() -> Self {
        Self {
            age_bracket: AgeBracket::From26To35,
            gender: GenderCategory::Other,
            raw_age: None,
            occupation: None,
        }
    }
}

/// Derive a normalized profile from user data.
///
/// An absent profile, or absent fields, fall back to the neutral defaults;
/// an unrecognized stored gender value resolves to `other`.
pub fn resolve(profile: Option<&UserProfile>) -> DemographicProfile {
    let Some(user) = profile else {
        return DemographicProfile::default();
    };

    let age_bracket = user
        .age
        .map(AgeBracket::from_age)
        .unwrap_or(AgeBracket::From26To35);
    let gender = user
        .gender
        .as_deref()
        .and_then(|g| g.parse().ok())
        .unwrap_or_default();

    DemographicProfile {
        age_bracket,
        gender,
        raw_age: user.age,
        occupation: user.occupation.clone(),
    }
}
