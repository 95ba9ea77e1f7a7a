use serde::Deserialize;

/// A single catalog entry as served by the products API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub sku: String,
    #[serde(default)]
    pub brand: String,
    pub availability_status: String,
    pub stock: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub shipping_information: String,
    pub return_policy: String,
}

/// Customer review attached to a product. Only the count is displayed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub reviewer_name: String,
}

/// Envelope returned by `GET /products`. Paging fields are ignored; the
/// dashboard always requests the full list.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// Decode a product payload: the API envelope or a bare list.
///
/// The shape is picked up front so a bad product reports the field at fault.
pub fn decode_products(bytes: &[u8]) -> Result<Vec<Product>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<ProductsResponse>(value).map(|resp| resp.products)
    }
}

impl Product {
    /// Case-insensitive containment against title or description.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
