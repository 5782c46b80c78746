use crate::app::ports::{DocumentSinkPort, FileStorePort, ProductSourcePort};
use crate::constants::{DICTIONARY_PATH, FIELD_PRODUCT_ID, FILTER_FIELDS};
use crate::error::{PdpError, Result};
use crate::metrics::BatchMetrics;
use crate::pipeline::normalize::analysis::AnalysisPolicy;
use crate::pipeline::normalize::RecordNormalizer;
use crate::pipeline::query::ProductFilter;
use crate::types::{MasterIngredients, ProductDocument, RawProduct};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Step of the run a fatal error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    FetchDictionary,
    QueryProducts,
    Normalize,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::FetchDictionary => "fetch dictionary",
            RunStage::QueryProducts => "query products",
            RunStage::Normalize => "normalize",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("run aborted at {stage}: {source}")]
    Aborted {
        stage: RunStage,
        #[source]
        source: PdpError,
    },
}

impl BatchError {
    pub fn stage(&self) -> RunStage {
        match self {
            BatchError::Aborted { stage, .. } => *stage,
        }
    }
}

/// What happened to a single product record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Written {
        product_id: String,
        destination: String,
    },
    Failed {
        product_id: Option<String>,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, RecordOutcome::Written { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub products_returned: usize,
    pub outcomes: Vec<RecordOutcome>,
    pub missing_ingredients: usize,
    pub aafco_no_match: usize,
    pub skipped_analysis_fragments: usize,
}

impl RunSummary {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            products_returned: 0,
            outcomes: Vec::new(),
            missing_ingredients: 0,
            aafco_no_match: 0,
            skipped_analysis_fragments: 0,
        }
    }

    fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Fetches the dictionary, queries the products and writes one document per
/// returned record, strictly one step after another.
pub struct BatchUseCase {
    file_store: Box<dyn FileStorePort>,
    products: Box<dyn ProductSourcePort>,
    sink: Box<dyn DocumentSinkPort>,
    dictionary_path: String,
    policy: AnalysisPolicy,
}

impl BatchUseCase {
    pub fn new(
        file_store: Box<dyn FileStorePort>,
        products: Box<dyn ProductSourcePort>,
        sink: Box<dyn DocumentSinkPort>,
    ) -> Self {
        Self {
            file_store,
            products,
            sink,
            dictionary_path: DICTIONARY_PATH.to_string(),
            policy: AnalysisPolicy::default(),
        }
    }

    pub fn with_dictionary_path(mut self, path: impl Into<String>) -> Self {
        self.dictionary_path = path.into();
        self
    }

    pub fn with_analysis_policy(mut self, policy: AnalysisPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self, product_ids: &[String]) -> std::result::Result<RunSummary, BatchError> {
        let mut summary = RunSummary::start();
        info!(run_id = %summary.run_id, "Starting document build for {} product ids", product_ids.len());

        let dictionary = self.fetch_dictionary().await.map_err(|source| {
            error!("Failed to load ingredient dictionary: {}", source);
            BatchError::Aborted {
                stage: RunStage::FetchDictionary,
                source,
            }
        })?;
        info!("Loaded {} dictionary entries", dictionary.len());

        let filter = ProductFilter::any_field_matches(FILTER_FIELDS, product_ids);
        if filter.is_empty() {
            info!("No product ids to query; nothing to do");
            return Ok(summary.finish());
        }

        let records = self.query_products(&filter).await.map_err(|source| {
            error!("Product query failed: {}", source);
            BatchError::Aborted {
                stage: RunStage::QueryProducts,
                source,
            }
        })?;
        summary.products_returned = records.len();
        BatchMetrics::record_products_returned(records.len());
        if records.is_empty() {
            info!("Product query returned no records");
            return Ok(summary.finish());
        }
        info!("Product query returned {} records", records.len());

        let normalizer = RecordNormalizer::new(&dictionary, self.policy);
        for raw in &records {
            let normalization = normalizer.normalize(raw).map_err(|source| {
                error!(
                    "Normalization failed for UPC {}: {}",
                    raw.product_id().unwrap_or("<none>"),
                    source
                );
                BatchError::Aborted {
                    stage: RunStage::Normalize,
                    source,
                }
            })?;
            summary.missing_ingredients += normalization.missing_ingredients.len();
            summary.skipped_analysis_fragments += normalization.skipped_analysis.len();
            summary.aafco_no_match += usize::from(normalization.aafco_no_match);

            let outcome = self.write_record(raw, &normalization.document).await;
            summary.outcomes.push(outcome);
        }

        let summary = summary.finish();
        info!(
            run_id = %summary.run_id,
            "Finished: {} written, {} failed",
            summary.written(),
            summary.failed()
        );
        Ok(summary)
    }

    #[instrument(skip(self), fields(path = %self.dictionary_path))]
    async fn fetch_dictionary(&self) -> Result<MasterIngredients> {
        let bytes = self.file_store.get(&self.dictionary_path).await?;
        debug!("Fetched {} dictionary bytes", bytes.len());
        // Invalid byte sequences become U+FFFD; only bad JSON fails the fetch.
        let text = String::from_utf8_lossy(&bytes);
        MasterIngredients::parse(&text)
    }

    #[instrument(skip(self, filter), fields(clauses = filter.clauses().len()))]
    async fn query_products(&self, filter: &ProductFilter) -> Result<Vec<RawProduct>> {
        self.products.query(filter).await
    }

    async fn write_record(&self, raw: &RawProduct, document: &ProductDocument) -> RecordOutcome {
        let Some(product_id) = raw.product_id() else {
            warn!("Record has no Product ID (UPC); not written");
            BatchMetrics::record_write_failure();
            return RecordOutcome::Failed {
                product_id: None,
                reason: PdpError::MissingField(FIELD_PRODUCT_ID.to_string()).to_string(),
            };
        };

        let written = match document.to_pretty_json() {
            Ok(json) => self.sink.write(product_id, &json).await,
            Err(e) => Err(e),
        };

        match written {
            Ok(destination) => {
                debug!("Wrote {}", destination);
                BatchMetrics::record_document_written();
                RecordOutcome::Written {
                    product_id: product_id.to_string(),
                    destination,
                }
            }
            Err(e) => {
                warn!("Failed to write document for UPC {}: {}", product_id, e);
                BatchMetrics::record_write_failure();
                RecordOutcome::Failed {
                    product_id: Some(product_id.to_string()),
                    reason: e.to_string(),
                }
            }
        }
    }
}
