use crate::app::ports::ProductSourcePort;
use crate::config::Config;
use crate::error::Result;
use crate::infra::http_client::ensure_success;
use crate::pipeline::query::ProductFilter;
use crate::types::RawProduct;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

/// Body of a `/products` response. A missing `data` key reads as no products.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub data: Vec<RawProduct>,
}

/// Product API client, bearer-token authenticated
pub struct ProductApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ProductApi {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn products_url(&self) -> String {
        products_url(&self.base_url)
    }
}

pub fn products_url(base_url: &str) -> String {
    format!("{}/products", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ProductSourcePort for ProductApi {
    async fn query(&self, filter: &ProductFilter) -> Result<Vec<RawProduct>> {
        let url = self.products_url();
        debug!("GET {} with {} filter clauses", url, filter.clauses().len());
        let resp = self
            .client
            .get(&url)
            .query(&[("filter", filter.to_string())])
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let body: ProductsResponse = resp.json().await?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_url() {
        assert_eq!(products_url("https://api.example.com/v1/orgs/acme/"), "https://api.example.com/v1/orgs/acme/products");
        assert_eq!(products_url("https://api.example.com"), "https://api.example.com/products");
    }

    #[test]
    fn test_response_without_data_is_empty() {
        let body: ProductsResponse = serde_json::from_str(r#"{"meta": {"total_entries": 0}}"#).unwrap();
        assert!(body.data.is_empty());
    }

    #[test]
    fn test_response_records_keep_their_fields() {
        let body: ProductsResponse = serde_json::from_str(
            r#"{"data": [{"Product ID (UPC)": "017800149846", "Ingredients": "Lamb, Oats"}]}"#,
        )
        .unwrap();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].product_id(), Some("017800149846"));
    }
}
