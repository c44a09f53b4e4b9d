use crate::domain::model::{
    FetchRequest, FetchResponse, Mark, Model, Specification, Tariff, Volume,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only narrowing queries over the vehicle catalog.
///
/// An empty list is a valid answer. Transport failures are returned as-is.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_marks(&self) -> Result<Vec<Mark>>;
    async fn list_models(&self, mark: &str) -> Result<Vec<Model>>;
    async fn list_volumes(&self, mark: &str, model: &str) -> Result<Vec<Volume>>;
    async fn list_specifications(
        &self,
        mark: &str,
        model: &str,
        volume: u32,
    ) -> Result<Vec<Specification>>;

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let response = match request {
            FetchRequest::Marks => FetchResponse::Marks(self.list_marks().await?),
            FetchRequest::Models { mark } => FetchResponse::Models(self.list_models(mark).await?),
            FetchRequest::Volumes { mark, model } => {
                FetchResponse::Volumes(self.list_volumes(mark, model).await?)
            }
            FetchRequest::Specifications {
                mark,
                model,
                volume,
            } => FetchResponse::Specifications(
                self.list_specifications(mark, model, *volume).await?,
            ),
        };
        Ok(response)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn tariff(&self) -> Tariff;
    fn currency_suffix(&self) -> &str;
}
