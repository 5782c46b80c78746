use crate::app::ports::{FileStorePort, ProductSourcePort};
use crate::error::Result;
use crate::infra::product_api::ProductsResponse;
use crate::pipeline::query::ProductFilter;
use crate::types::RawProduct;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// Treats the local filesystem as the file store; paths are used as given.
pub struct LocalFileStore;

#[async_trait]
impl FileStorePort for LocalFileStore {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductDump {
    Body(ProductsResponse),
    Records(Vec<RawProduct>),
}

/// Serves records from a saved product API response (or a bare array of records),
/// applying the filter the way the API would.
pub struct LocalProductDump {
    path: PathBuf,
}

impl LocalProductDump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSourcePort for LocalProductDump {
    async fn query(&self, filter: &ProductFilter) -> Result<Vec<RawProduct>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records = match serde_json::from_slice::<ProductDump>(&bytes)? {
            ProductDump::Body(body) => body.data,
            ProductDump::Records(records) => records,
        };
        let total = records.len();
        let matching: Vec<RawProduct> = records.into_iter().filter(|r| filter.matches(r)).collect();
        debug!("{} of {} dumped records match the filter", matching.len(), total);
        Ok(matching)
    }
}
