//! Wire DTOs for the recipe backend's JSON API.
//!
//! DESIGN
//! ======
//! Field names mirror the backend payloads so serde stays lossless. Optional
//! profile fields default to `None` when the backend omits them instead of
//! sending `null`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Minimal identity payload returned by `/account/verify`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Numeric user identifier.
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub uid: i32,
    pub username: String,
}

/// Full public record for a user, as returned by `/users/{id}`.
///
/// This is the value the session store holds for a signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub uid: i32,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Profile picture path, if one was uploaded.
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
}

/// Poster details embedded in a full recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalUserDetails {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub uid: i32,
    pub username: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Private account details returned by `/account/` for the bearer's own user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Unit attached to an ingredient amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measurement {
    Millilitre,
    Litre,
    Teaspoon,
    Tablespoon,
    FluidOz,
    Pint,
    Gallon,
    Milligram,
    Gram,
    Kilogram,
    Pound,
    Ounce,
    Celsius,
    Fahrenheit,
    Piece,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub ingredient: String,
    pub amount: f64,
    pub measurement: Measurement,
}

/// One instruction in a recipe; `order` is 1-based as sent by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub order: i32,
    pub step_details: String,
}

/// Title, description, ingredients and steps of a recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeBody {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A full recipe as returned by `/recipes/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub id: i32,
    pub poster: MinimalUserDetails,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    pub recipe: RecipeBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPoster {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub uid: i32,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSummary {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub id: i32,
    pub title: String,
    pub description: String,
}

/// Listing entry returned by `/recipes/all` and `/recipes/by/{uid}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePreview {
    pub poster: PreviewPoster,
    pub recipe: PreviewSummary,
}

/// Reply of `/recipes/{id}/edit`: whether the bearer may edit, and the recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeEditGrant {
    pub authorized: bool,
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

/// Server-reported failure, returned in place of a payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub error: String,
    pub description: String,
}

impl ResponseError {
    pub fn new(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self { error: error.into(), description: description.into() }
    }
}

/// Either the decoded payload or the backend's error envelope.
///
/// Serializes untagged, so page data looks exactly like the payload or the
/// envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Fetched<T> {
    Ok(T),
    Err(ResponseError),
}

impl<T> Fetched<T> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    #[must_use]
    pub fn err(&self) -> Option<&ResponseError> {
        match self {
            Self::Ok(_) => None,
            Self::Err(e) => Some(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Ok(value) => Fetched::Ok(f(value)),
            Self::Err(e) => Fetched::Err(e),
        }
    }
}

fn deserialize_i32_from_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let int = match &value {
        serde_json::Value::Number(number) => number.as_i64(),
        // Some routes echo ids back as strings.
        serde_json::Value::String(s) => Some(
            s.trim()
                .parse::<i64>()
                .map_err(|e| D::Error::custom(format!("invalid integer id {s:?}: {e}")))?,
        ),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("expected integer id, got {value}")))?;
    i32::try_from(int).map_err(|_| D::Error::custom(format!("value {int} out of range for i32")))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
