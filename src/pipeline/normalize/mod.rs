//! Turns raw product records into product documents.

pub mod aafco;
pub mod analysis;
pub mod ingredients;
pub mod slug;

use crate::constants::{
    FIELD_CALORIE_CONTENT, FIELD_FEATURED_INGREDIENTS, FIELD_FEEDING_GUIDELINES, FIELD_FORMULATION_STATEMENT,
    FIELD_GUARANTEED_ANALYSIS, FIELD_INGREDIENTS,
};
use crate::error::Result;
use crate::metrics::BatchMetrics;
use crate::types::{FeedingGuidelines, MasterIngredients, ProductDocument, RawProduct};
use aafco::{format_aafco, AafcoStatement};
use analysis::{parse_guaranteed_analysis, AnalysisPolicy};
use ingredients::{extract_ingredients, validate_ingredients, IngredientList, MissingIngredient, ProductRef};
use tracing::{debug, warn};

/// A finished document plus the data-quality findings made while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub document: ProductDocument,
    pub missing_ingredients: Vec<MissingIngredient>,
    pub skipped_analysis: Vec<String>,
    pub aafco_no_match: bool,
}

pub struct RecordNormalizer<'a> {
    dictionary: &'a MasterIngredients,
    policy: AnalysisPolicy,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(dictionary: &'a MasterIngredients, policy: AnalysisPolicy) -> Self {
        Self { dictionary, policy }
    }

    /// Builds the whole document in memory. Only a malformed guaranteed analysis
    /// under [`AnalysisPolicy::Strict`] fails.
    pub fn normalize(&self, raw: &RawProduct) -> Result<Normalization> {
        let product = ProductRef::of(raw);
        let mut missing_ingredients = Vec::new();

        let featured_ingredients = extract_ingredients(raw, FIELD_FEATURED_INGREDIENTS);
        missing_ingredients.extend(validate_ingredients(
            &featured_ingredients,
            IngredientList::Featured,
            self.dictionary,
            product,
        ));

        let full_ingredients = extract_ingredients(raw, FIELD_INGREDIENTS);
        missing_ingredients.extend(validate_ingredients(
            &full_ingredients,
            IngredientList::Full,
            self.dictionary,
            product,
        ));

        let analysis = match raw.text(FIELD_GUARANTEED_ANALYSIS) {
            Some(statement) => parse_guaranteed_analysis(statement, self.policy)?,
            None => Default::default(),
        };
        for fragment in &analysis.skipped {
            warn!(
                "Skipping guaranteed analysis fragment {:?} for UPC: {}",
                fragment,
                product.upc.unwrap_or("<none>")
            );
            BatchMetrics::record_analysis_fragment_skipped();
        }

        let aafco = format_aafco(raw.product_name(), raw.text(FIELD_FORMULATION_STATEMENT));
        let aafco_no_match = aafco == AafcoStatement::NoMatch;
        if aafco_no_match {
            debug!(upc = product.upc.unwrap_or("<none>"), "formulation statement lacks \"is formulated\"");
            BatchMetrics::record_aafco_no_match();
        }

        let document = ProductDocument {
            featured_ingredients,
            full_ingredients,
            guaranteed_analysis: analysis.rows,
            feeding_guidelines: feeding_guidelines(raw),
            calorie_content: calorie_content(raw),
            aafco: aafco.into_text(),
        };

        Ok(Normalization {
            document,
            missing_ingredients,
            skipped_analysis: analysis.skipped,
            aafco_no_match,
        })
    }
}

/// Only the audience text is filled; the table stays at its default.
pub fn feeding_guidelines(raw: &RawProduct) -> FeedingGuidelines {
    FeedingGuidelines {
        for_text: raw.text(FIELD_FEEDING_GUIDELINES).unwrap_or_default().to_string(),
        ..Default::default()
    }
}

pub fn calorie_content(raw: &RawProduct) -> String {
    raw.text(FIELD_CALORIE_CONTENT).unwrap_or_default().to_string()
}
