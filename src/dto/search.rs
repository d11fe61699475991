use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Merchant, Product, Service};

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchQueryEcho {
    pub q: String,
    pub city: Option<String>,
    pub category: Option<String>,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantHits {
    pub data: Vec<Merchant>,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductHits {
    pub data: Vec<Product>,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHits {
    pub data: Vec<Service>,
    pub count: i64,
}

/// Combined envelope for the three entity kinds, echoing the query.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResults {
    pub query: SearchQueryEcho,
    pub merchants: MerchantHits,
    pub products: ProductHits,
    pub services: ServiceHits,
}
