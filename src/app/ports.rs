use crate::error::Result;
use crate::pipeline::query::ProductFilter;
use crate::types::RawProduct;
use async_trait::async_trait;

/// Key-value read access to the remote file store
#[async_trait]
pub trait FileStorePort: Send + Sync {
    async fn get(&self, path: &str) -> Result<Vec<u8>>;
}

/// The product-information API
#[async_trait]
pub trait ProductSourcePort: Send + Sync {
    async fn query(&self, filter: &ProductFilter) -> Result<Vec<RawProduct>>;
}

/// Destination for finished documents, keyed by product identifier.
/// Returns a description of where the document went.
#[async_trait]
pub trait DocumentSinkPort: Send + Sync {
    async fn write(&self, product_id: &str, contents: &str) -> Result<String>;
}
