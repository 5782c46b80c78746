use anyhow::Result;
use async_trait::async_trait;
use pdp_builder::app::batch_use_case::{BatchUseCase, RecordOutcome, RunStage};
use pdp_builder::app::ports::{FileStorePort, ProductSourcePort};
use pdp_builder::infra::file_sink::FileDocumentSink;
use pdp_builder::infra::local_source::{LocalFileStore, LocalProductDump};
use pdp_builder::pipeline::query::ProductFilter;
use pdp_builder::types::RawProduct;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

struct StaticDictionary(Value);

#[async_trait]
impl FileStorePort for StaticDictionary {
    async fn get(&self, _path: &str) -> pdp_builder::error::Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }
}

struct StaticProducts(Vec<Value>);

#[async_trait]
impl ProductSourcePort for StaticProducts {
    async fn query(&self, _filter: &ProductFilter) -> pdp_builder::error::Result<Vec<RawProduct>> {
        let mut records = Vec::new();
        for value in &self.0 {
            records.push(serde_json::from_value(value.clone())?);
        }
        Ok(records)
    }
}

fn json_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn ids() -> Vec<String> {
    vec!["017800149846".to_string(), "017800149853".to_string()]
}

#[tokio::test]
async fn test_empty_query_writes_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("output");

    let use_case = BatchUseCase::new(
        Box::new(StaticDictionary(json!({ "lamb": {} }))),
        Box::new(StaticProducts(vec![])),
        Box::new(FileDocumentSink::new(&output)),
    );

    let summary = use_case.run(&ids()).await?;
    assert_eq!(summary.products_returned, 0);
    assert_eq!(summary.written(), 0);
    assert!(json_files(&output).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_one_failed_write_leaves_the_other_document() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().to_path_buf();
    // A directory squatting on the target name makes that write fail.
    fs::create_dir(output.join("017800149853.json"))?;

    let use_case = BatchUseCase::new(
        Box::new(StaticDictionary(json!({ "lamb": {} }))),
        Box::new(StaticProducts(vec![
            json!({ "Product ID (UPC)": "017800149846", "Ingredients": "Lamb" }),
            json!({ "Product ID (UPC)": "017800149853", "Ingredients": "Lamb" }),
        ])),
        Box::new(FileDocumentSink::new(&output)),
    );

    let summary = use_case.run(&ids()).await?;
    assert_eq!(summary.written(), 1);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        &summary.outcomes[1],
        RecordOutcome::Failed { product_id: Some(id), .. } if id == "017800149853"
    ));
    assert_eq!(json_files(&output), vec!["017800149846.json".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_offline_run_writes_expected_document() -> Result<()> {
    let temp_dir = tempdir()?;
    let dictionary = temp_dir.path().join("ingredients.json");
    let records = temp_dir.path().join("products.json");
    let output = temp_dir.path().join("output");

    fs::write(
        &dictionary,
        serde_json::to_string(&json!({
            "deboned-lamb": { "name": "Deboned Lamb" },
            "lamb-meal": { "name": "Lamb Meal" },
            "oatmeal": { "name": "Oatmeal" }
        }))?,
    )?;
    fs::write(
        &records,
        serde_json::to_string(&json!({
            "data": [
                {
                    "Product ID (UPC)": "017800149846",
                    "Product Name": "Lamb & Oatmeal",
                    "Featured Ingredients": "Deboned Lamb, Oatmeal",
                    "Ingredients": "Deboned Lamb, Lamb Meal, Oatmeal, Dried Kelp",
                    "Guaranteed Analysis": "Crude Protein (min) 26.0% Crude Fat (min) 15.0%",
                    "Feeding Guidelines": "Adult Dogs",
                    "Calorie Content": "3,650 kcal/kg",
                    "Feeding Guide Pt. 3": "Lamb & Oatmeal Formula is formulated to meet AAFCO Dog Food Nutrient Profiles."
                },
                { "Product ID (UPC)": "999999999999" }
            ]
        }))?,
    )?;

    let use_case = BatchUseCase::new(
        Box::new(LocalFileStore),
        Box::new(LocalProductDump::new(&records)),
        Box::new(FileDocumentSink::new(&output)),
    )
    .with_dictionary_path(dictionary.display().to_string());

    let summary = use_case.run(&ids()).await?;
    assert_eq!(summary.products_returned, 1);
    assert_eq!(summary.missing_ingredients, 1);
    assert_eq!(json_files(&output), vec!["017800149846.json".to_string()]);

    let written = fs::read_to_string(output.join("017800149846.json"))?;
    let expected = r#"{
  "featured-ingredients": [
    "deboned-lamb",
    "oatmeal"
  ],
  "full-ingredients": [
    "deboned-lamb",
    "lamb-meal",
    "oatmeal",
    "dried-kelp"
  ],
  "guaranteed-analysis": [
    [
      "Crude Protein (min)",
      "26.0%"
    ],
    [
      "Crude Fat (min)",
      "15.0%"
    ]
  ],
  "feeding-guidelines": {
    "for": "Adult Dogs",
    "columns": [],
    "table_data": [
      []
    ]
  },
  "calorie-content": "3,650 kcal/kg",
  "aafco": "<b>Lamb & Oatmeal Formula</b> is formulated to meet AAFCO Dog Food Nutrient Profiles."
}"#;
    assert_eq!(written, expected);
    Ok(())
}

#[tokio::test]
async fn test_missing_dictionary_file_aborts_before_writing() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("output");

    let use_case = BatchUseCase::new(
        Box::new(LocalFileStore),
        Box::new(StaticProducts(vec![json!({ "Product ID (UPC)": "017800149846" })])),
        Box::new(FileDocumentSink::new(&output)),
    )
    .with_dictionary_path(temp_dir.path().join("absent.json").display().to_string());

    let err = use_case.run(&ids()).await.unwrap_err();
    assert_eq!(err.stage(), RunStage::FetchDictionary);
    assert!(json_files(&output).is_empty());
    Ok(())
}
