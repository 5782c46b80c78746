//! Fixed names shared by the driver, the extractors and the adapters

/// Location of the master ingredient dictionary inside the file store
pub const DICTIONARY_PATH: &str = "/content/pdp/ingredients/ingredients.json";

/// Default directory the documents are written to
pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Raw product record field names
pub const FIELD_PRODUCT_ID: &str = "Product ID (UPC)";
pub const FIELD_PRODUCT_NAME: &str = "Product Name";
pub const FIELD_FEATURED_INGREDIENTS: &str = "Featured Ingredients";
pub const FIELD_INGREDIENTS: &str = "Ingredients";
pub const FIELD_GUARANTEED_ANALYSIS: &str = "Guaranteed Analysis";
pub const FIELD_FEEDING_GUIDELINES: &str = "Feeding Guidelines";
pub const FIELD_CALORIE_CONTENT: &str = "Calorie Content";
pub const FIELD_FORMULATION_STATEMENT: &str = "Feeding Guide Pt. 3";

/// Fields a product identifier may appear in; every one of them is queried
pub const FILTER_FIELDS: [&str; 6] = [
    FIELD_PRODUCT_ID,
    "Individual Item #",
    "(FS) Individual Item #",
    "Case/Bale UPC",
    "(FS) Case/Bale UPC",
    "Old (Tuffy) Individual Item #",
];

const PRODUCTS_JSON: &str = include_str!("../products.json");

/// Product identifiers compiled into the binary from `products.json`
pub fn product_ids() -> crate::error::Result<Vec<String>> {
    Ok(serde_json::from_str(PRODUCTS_JSON)?)
}
