use crate::app::ports::FileStorePort;
use crate::config::Config;
use crate::error::Result;
use crate::infra::http_client::ensure_success;
use async_trait::async_trait;
use tracing::debug;

/// Reads files from a WebDAV share with HTTP basic auth
pub struct WebDavStore {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl WebDavStore {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.file_store_url.clone(),
            username: config.file_store_user.clone(),
            password: config.file_store_password.clone(),
        }
    }

    pub fn file_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl FileStorePort for WebDavStore {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.file_url(path);
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> WebDavStore {
        let config = Config {
            file_store_url: base.to_string(),
            file_store_user: "u".into(),
            file_store_password: "p".into(),
            api_base_url: String::new(),
            api_key: String::new(),
        };
        WebDavStore::new(reqwest::Client::new(), &config)
    }

    #[test]
    fn test_file_url_joins_with_single_slash() {
        let path = "/content/pdp/ingredients/ingredients.json";
        assert_eq!(
            store("https://dav.example.com/webdav/").file_url(path),
            "https://dav.example.com/webdav/content/pdp/ingredients/ingredients.json"
        );
        assert_eq!(
            store("https://dav.example.com/webdav").file_url(path),
            "https://dav.example.com/webdav/content/pdp/ingredients/ingredients.json"
        );
    }
}
