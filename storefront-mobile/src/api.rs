//! Catalog fetch used by the mobile pages

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "/api";

/// API client for backend communication
pub struct ApiClient;

impl ApiClient {
    /// Make GET request and unwrap the `{ "data": ... }` envelope
    pub async fn get<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
        let url = format!("{}{}", API_BASE, path);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))?;

        Ok(envelope.data)
    }

    /// List catalog products
    pub async fn list_products() -> Result<Vec<Product>, String> {
        Self::get("/products").await
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

// API response types

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}
