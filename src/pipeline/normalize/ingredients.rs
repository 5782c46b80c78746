use super::slug::slugify;
use crate::metrics::BatchMetrics;
use crate::types::{MasterIngredients, RawProduct};
use serde_json::Value;
use tracing::warn;

/// Which ingredient list a slug came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientList {
    Featured,
    Full,
}

impl IngredientList {
    pub fn label(self) -> &'static str {
        match self {
            IngredientList::Featured => "FEATURED",
            IngredientList::Full => "FULL",
        }
    }
}

/// Identifying metadata quoted in warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRef<'a> {
    pub name: Option<&'a str>,
    pub upc: Option<&'a str>,
}

impl<'a> ProductRef<'a> {
    pub fn of(raw: &'a RawProduct) -> Self {
        Self {
            name: raw.product_name(),
            upc: raw.product_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingIngredient {
    pub list: IngredientList,
    pub slug: String,
}

/// Reads an ingredient field as slugs. A string is split on commas, an array is
/// taken element by element; anything else, or an empty value, gives no slugs.
///
/// Every entry keeps its position, so a blank entry such as the gap in
/// `"Lamb,, Oats"` comes out as an empty slug for the validator to report.
pub fn extract_ingredients(raw: &RawProduct, field: &str) -> Vec<String> {
    match raw.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.split(',').map(slugify).collect(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(slugify).collect(),
        _ => Vec::new(),
    }
}

/// Logs one warning per slug that has no dictionary entry, duplicates included,
/// and hands the misses back to the caller.
pub fn validate_ingredients(
    slugs: &[String],
    list: IngredientList,
    dictionary: &MasterIngredients,
    product: ProductRef<'_>,
) -> Vec<MissingIngredient> {
    let mut missing = Vec::new();
    for slug in slugs {
        if dictionary.contains(slug) {
            continue;
        }
        let prefix = format!("{}:", list.label());
        warn!(
            "{:<9} ingredients.json is missing \"{}\" for Product: {}, UPC: {}",
            prefix,
            slug,
            product.name.unwrap_or("<unnamed>"),
            product.upc.unwrap_or("<none>")
        );
        BatchMetrics::record_missing_ingredient(list.label());
        missing.push(MissingIngredient {
            list,
            slug: slug.clone(),
        });
    }
    missing
}
