use async_trait::async_trait;
use crate::errors::BlackCardError;
use crate::models::NewBusiness;

/// One (city, category) lookup.
#[derive(Debug, Clone)]
pub struct PlacesQuery {
    pub city: String,
    pub category: String,
    pub limit: usize,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Businesses found for the query, ready to upsert by place id.
    async fn search(&self, query: &PlacesQuery) -> Result<Vec<NewBusiness>, BlackCardError>;

    fn provider_name(&self) -> &str;
}
