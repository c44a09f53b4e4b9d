use crate::domain::model::{Mark, Model, Specification, Volume};
use crate::domain::ports::{CatalogClient, ConfigProvider};
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("import-fee-calc/", env!("CARGO_PKG_VERSION"));

/// Catalog client for the single `/transport` style endpoint.
///
/// Which list comes back depends only on which of `mark`, `model` and
/// `volume` are sent.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    endpoint: Url,
}

impl HttpCatalogClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_options(endpoint, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    pub fn with_options(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_options(
            config.catalog_endpoint(),
            config.request_timeout(),
            config.user_agent(),
        )
    }

    fn query_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    async fn get_list<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<Vec<T>> {
        let url = self.query_url(params);
        tracing::debug!("Making catalog request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if !status.is_success() {
            return Err(CalcError::CatalogStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // 後端在沒有資料時可能回傳 null
        let items: Option<Vec<T>> = response.json().await?;
        Ok(items.unwrap_or_default())
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_marks(&self) -> Result<Vec<Mark>> {
        self.get_list(&[]).await
    }

    async fn list_models(&self, mark: &str) -> Result<Vec<Model>> {
        self.get_list(&[("mark", mark)]).await
    }

    async fn list_volumes(&self, mark: &str, model: &str) -> Result<Vec<Volume>> {
        self.get_list(&[("mark", mark), ("model", model)]).await
    }

    async fn list_specifications(
        &self,
        mark: &str,
        model: &str,
        volume: u32,
    ) -> Result<Vec<Specification>> {
        let volume = volume.to_string();
        self.get_list(&[("mark", mark), ("model", model), ("volume", volume.as_str())])
            .await
    }
}
