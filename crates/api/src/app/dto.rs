use serde::{Deserialize, Deserializer};

use stockpile_products::{NewProduct, Page, Product, ProductPatch, MAX_PAGE_LIMIT};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub min_threshold: Option<i32>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(body: CreateProductRequest) -> Self {
        let mut new = NewProduct::new(body.name, body.sku);
        new.description = body.description;
        if let Some(quantity) = body.quantity {
            new.quantity = quantity;
        }
        if let Some(min_threshold) = body.min_threshold {
            new.min_threshold = min_threshold;
        }
        new
    }
}

/// Partial update body. Absent fields (and `null` for non-nullable fields)
/// are left unchanged; `"description": null` clears the description.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub min_threshold: Option<i32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        ProductPatch {
            name: body.name,
            sku: body.sku,
            description: body.description,
            quantity: body.quantity,
            min_threshold: body.min_threshold,
        }
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`, via `default`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ListProductsQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip.unwrap_or(0), self.limit.unwrap_or(MAX_PAGE_LIMIT))
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed(),
        "name": p.name(),
        "sku": p.sku(),
        "description": p.description(),
        "quantity": p.quantity(),
        "min_threshold": p.min_threshold(),
        "created_at": p.created_at().to_rfc3339(),
        "updated_at": p.updated_at().map(|t| t.to_rfc3339()),
        "is_low_stock": p.is_low_stock(),
        "is_out_of_stock": p.is_out_of_stock(),
    })
}
