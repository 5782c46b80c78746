use crate::constants::{FIELD_PRODUCT_ID, FIELD_PRODUCT_NAME};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Master ingredient dictionary: ingredient slug -> opaque definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MasterIngredients(Map<String, Value>);

impl MasterIngredients {
    /// Parses the dictionary file. Anything but a JSON object is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.0.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MasterIngredients {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|slug| (slug.into(), Value::Object(Map::new()))).collect())
    }
}

/// Loosely typed product record as returned by the product API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProduct(Map<String, Value>);

impl RawProduct {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the field when it holds a non-empty string. Other value types
    /// count as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn product_id(&self) -> Option<&str> {
        self.text(FIELD_PRODUCT_ID)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.text(FIELD_PRODUCT_NAME)
    }
}

/// One guaranteed analysis row: nutrient label and value with its unit
pub type AnalysisRow = (String, String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingGuidelines {
    #[serde(rename = "for")]
    pub for_text: String,
    pub columns: Vec<String>,
    pub table_data: Vec<Vec<String>>,
}

impl Default for FeedingGuidelines {
    fn default() -> Self {
        Self {
            for_text: String::new(),
            columns: Vec::new(),
            table_data: vec![Vec::new()],
        }
    }
}

/// The document written for every product. All fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "featured-ingredients")]
    pub featured_ingredients: Vec<String>,
    #[serde(rename = "full-ingredients")]
    pub full_ingredients: Vec<String>,
    #[serde(rename = "guaranteed-analysis")]
    pub guaranteed_analysis: Vec<AnalysisRow>,
    #[serde(rename = "feeding-guidelines")]
    pub feeding_guidelines: FeedingGuidelines,
    #[serde(rename = "calorie-content")]
    pub calorie_content: String,
    pub aafco: String,
}

impl ProductDocument {
    /// Pretty printed JSON with two space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
