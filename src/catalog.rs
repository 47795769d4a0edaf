use crate::config::{WC_API_URL, WC_KEY, WC_SECRET};
use crate::http::build_client;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("catalog api error: {0}")]
    Api(String),
}

/// The updatable target derived from a catalog search hit. A simple product
/// has `parent_id == variation_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogMatch {
    pub parent_id: u64,
    pub variation_id: u64,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    id: u64,
    #[serde(default)]
    parent_id: Option<u64>,
}

impl ProductEntry {
    fn into_match(self) -> CatalogMatch {
        let parent_id = match self.parent_id {
            Some(parent) if parent != 0 => parent,
            _ => self.id,
        };
        CatalogMatch {
            parent_id,
            variation_id: self.id,
        }
    }
}

/// Read/write surface of the remote catalog. Both operations are per-record
/// concerns; callers decide whether an error is fatal.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn find_product(&self, identity: &str) -> Result<Option<CatalogMatch>, CatalogError>;
    async fn update_stock(&self, target: &CatalogMatch, quantity: i32) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    key: String,
    secret: String,
    http: Client,
}

impl CatalogClient {
    pub fn from_env() -> Option<Self> {
        if WC_API_URL.is_empty() || WC_KEY.is_empty() || WC_SECRET.is_empty() {
            return None;
        }
        Some(Self {
            base_url: WC_API_URL.trim_end_matches('/').to_string(),
            key: WC_KEY.clone(),
            secret: WC_SECRET.clone(),
            http: build_client(),
        })
    }
}

impl Catalog for CatalogClient {
    /// Looks the identity up as the catalog's product code. The first search
    /// hit is authoritative; zero hits is not an error.
    async fn find_product(&self, identity: &str) -> Result<Option<CatalogMatch>, CatalogError> {
        let url = format!("{}/products", self.base_url);
        let response = self
            .http
            .get(url)
            .basic_auth(&self.key, Some(&self.secret))
            .query(&[("sku", identity)])
            .send()
            .await
            .map_err(|err| CatalogError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(error_detail(response).await));
        }

        let mut entries: Vec<ProductEntry> = response
            .json()
            .await
            .map_err(|err| CatalogError::Request(err.to_string()))?;
        if entries.is_empty() {
            Ok(None)
        } else {
            Ok(Some(entries.remove(0).into_match()))
        }
    }

    async fn update_stock(&self, target: &CatalogMatch, quantity: i32) -> Result<(), CatalogError> {
        let url = format!(
            "{}/products/{}/variations/{}",
            self.base_url, target.parent_id, target.variation_id
        );
        let body = json!({
            "manage_stock": true,
            "stock_quantity": quantity,
        });
        let response = self
            .http
            .put(url)
            .basic_auth(&self.key, Some(&self.secret))
            .json(&body)
            .send()
            .await
            .map_err(|err| CatalogError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(error_detail(response).await));
        }
        Ok(())
    }
}

/// Prefers the structured error body over a bare status line so the operator
/// sees what the API actually complained about.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<Value>().await {
        Ok(body) => match body.get("message").and_then(Value::as_str) {
            Some(message) => format!("HTTP {status}: {message}"),
            None => format!("HTTP {status}: {body}"),
        },
        Err(_) => format!("HTTP {status}"),
    }
}

/// Numeric interpretation of a feed quantity. Anything unparseable counts as
/// zero stock rather than aborting the record.
pub fn parse_quantity(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_without_parent_collapses_to_itself() {
        let entry = ProductEntry {
            id: 42,
            parent_id: None,
        };
        let matched = entry.into_match();
        assert_eq!(matched.parent_id, matched.variation_id);
        assert_eq!(matched.variation_id, 42);
    }

    #[test]
    fn zero_parent_counts_as_no_parent() {
        let entry = ProductEntry {
            id: 42,
            parent_id: Some(0),
        };
        assert_eq!(entry.into_match().parent_id, 42);
    }

    #[test]
    fn variation_keeps_its_parent() {
        let entry = ProductEntry {
            id: 42,
            parent_id: Some(7),
        };
        let matched = entry.into_match();
        assert_eq!(matched.parent_id, 7);
        assert_eq!(matched.variation_id, 42);
    }

    #[test]
    fn product_entry_ignores_unknown_fields() {
        let raw = r#"{"id": 9, "parent_id": 3, "name": "shoe", "price": "10.00"}"#;
        let entry: ProductEntry = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(entry.into_match().parent_id, 3);
    }

    #[test]
    fn quantity_parses_integers_and_coerces_garbage_to_zero() {
        assert_eq!(parse_quantity("5"), 5);
        assert_eq!(parse_quantity(" 7 "), 7);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("3.5"), 0);
    }
}
