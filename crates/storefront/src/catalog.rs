//! Remote catalog API client.
//!
//! The remote REST API is an opaque external contract: this client fetches
//! products and drives the OTP endpoints, nothing more. Requests carry a
//! fixed timeout and are never retried; a failed or timed-out request
//! surfaces as an error for the caller to turn into a notice. Product reads
//! are cached with `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use url::Url;

use essenza_core::{CartItem, CurrencyCode, Price, ProductId, WishlistItem};

use crate::config::CatalogConfig;

/// Errors from the remote catalog API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request failed (network error, timeout, bad body).
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// A path segment could not be joined onto the base URL.
    #[error("invalid catalog url: {0}")]
    Url(#[from] url::ParseError),
}

/// A product as served by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: ProductId,
    pub name: String,
    /// Brand or fragrance family.
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub image_url: String,
    pub in_stock: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl RemoteProduct {
    /// Snapshot this product into a cart line with the given quantity.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            price: Price::new(self.price, self.currency),
            quantity,
            image_url: self.image_url.clone(),
        }
    }

    /// Snapshot this product into a wishlist entry, capturing the current
    /// in-stock state.
    #[must_use]
    pub fn to_wishlist_item(&self) -> WishlistItem {
        WishlistItem {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            price: Price::new(self.price, self.currency),
            image_url: self.image_url.clone(),
            in_stock: self.in_stock,
        }
    }
}

/// Result of an OTP verification call.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpVerification {
    pub verified: bool,
}

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<RemoteProduct>),
    Product(Box<RemoteProduct>),
}

/// Client for the remote catalog API.
///
/// Cheap to clone; product responses are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Fetch the full product list (cached).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on network failure, timeout, or a non-success
    /// status. Failures are never retried.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<RemoteProduct>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            return Ok(products);
        }

        let url = self.endpoint("products")?;
        let products: Vec<RemoteProduct> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch a single product by ID (cached).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Status` with 404 for an unknown product, and
    /// the usual network errors otherwise.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<RemoteProduct, CatalogError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let product: RemoteProduct = self.get_json(url).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Ask the API to send a one-time password to `phone`.
    ///
    /// Delivery is the remote side's concern; this call only reports whether
    /// the request was accepted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on failure; never retried.
    #[instrument(skip(self, phone))]
    pub async fn request_otp(&self, phone: &str) -> Result<(), CatalogError> {
        let url = self.endpoint("otp/request")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&json!({ "phone": phone }))
            .send()
            .await?;
        check_status(&response)?;
        Ok(())
    }

    /// Verify a one-time password.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on failure; never retried.
    #[instrument(skip(self, phone, code))]
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<OtpVerification, CatalogError> {
        let url = self.endpoint("otp/verify")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&json!({ "phone": phone, "code": code }))
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(path)?)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), CatalogError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(CatalogError::Status(status))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, in_stock: bool) -> RemoteProduct {
        RemoteProduct {
            id: ProductId::new(id),
            name: "Santal Dusk".to_owned(),
            category: "woody".to_owned(),
            price: Decimal::new(6450, 2),
            currency: CurrencyCode::USD,
            image_url: "https://img.example.com/santal.jpg".to_owned(),
            in_stock,
            description: None,
        }
    }

    #[test]
    fn test_to_cart_item_snapshots_price() {
        let item = product("p1", true).to_cart_item(2);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price.amount, Decimal::new(6450, 2));
        assert_eq!(item.id, ProductId::new("p1"));
    }

    #[test]
    fn test_to_wishlist_item_snapshots_availability() {
        let item = product("p1", false).to_wishlist_item();
        assert!(!item.in_stock);
        assert_eq!(item.name, "Santal Dusk");
    }

    #[test]
    fn test_remote_product_parse_defaults() {
        let json = r#"{
            "id": "p1",
            "name": "Santal Dusk",
            "category": "woody",
            "price": "64.50",
            "image_url": "https://img.example.com/santal.jpg",
            "in_stock": true
        }"#;
        let parsed: RemoteProduct = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.currency, CurrencyCode::USD);
        assert!(parsed.description.is_none());
    }
}
