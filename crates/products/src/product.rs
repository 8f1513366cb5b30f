use chrono::{DateTime, Utc};

use stockpile_core::{DomainError, DomainResult, Entity, ProductId};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 200;
/// Longest accepted SKU, in characters.
pub const MAX_SKU_LEN: usize = 100;
/// Threshold applied when a create request omits `min_threshold`.
pub const DEFAULT_MIN_THRESHOLD: i32 = 10;

/// Stock level classification derived from quantity and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// A tracked product (the only stored entity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    description: Option<String>,
    quantity: i32,
    min_threshold: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Build a freshly created product. `updated_at` stays empty until the
    /// first applied patch.
    pub fn new(id: ProductId, fields: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self::restore(id, fields, created_at, None)
    }

    /// Rebuild a product from persisted state.
    pub fn restore(
        id: ProductId,
        fields: NewProduct,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let NewProduct {
            name,
            sku,
            description,
            quantity,
            min_threshold,
        } = fields;
        Self {
            id,
            name,
            sku,
            description,
            quantity,
            min_threshold,
            created_at,
            updated_at,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn min_threshold(&self) -> i32 {
        self.min_threshold
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Quantity is strictly below the minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Merge the fields present in `patch` into this product.
    ///
    /// Absent fields keep their stored value. Returns `true` when at least one
    /// field was applied, in which case `updated_at` becomes `now` (even if the
    /// applied value equals the current one).
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> bool {
        if patch.is_empty() {
            return false;
        }

        let ProductPatch {
            name,
            sku,
            description,
            quantity,
            min_threshold,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(sku) = sku {
            self.sku = sku;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(min_threshold) = min_threshold {
            self.min_threshold = min_threshold;
        }

        self.updated_at = Some(now);
        true
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub min_threshold: i32,
}

impl NewProduct {
    /// New product input with the default stock settings (`quantity = 0`,
    /// `min_threshold = 10`).
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            description: None,
            quantity: 0,
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_min_threshold(mut self, min_threshold: i32) -> Self {
        self.min_threshold = min_threshold;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_sku(&self.sku)?;
        validate_quantity(self.quantity)?;
        validate_min_threshold(self.min_threshold)
    }
}

/// Partial update: only `Some` fields are applied.
///
/// `description` is doubly optional so a caller can clear it:
/// `None` leaves it alone, `Some(None)` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<Option<String>>,
    pub quantity: Option<i32>,
    pub min_threshold: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.min_threshold.is_none()
    }

    /// Same rules as creation, applied to the fields that are present.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(min_threshold) = self.min_threshold {
            validate_min_threshold(min_threshold)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

fn validate_sku(sku: &str) -> DomainResult<()> {
    validate_text("sku", sku, MAX_SKU_LEN)
}

fn validate_quantity(quantity: i32) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity must be >= 0"));
    }
    Ok(())
}

fn validate_min_threshold(min_threshold: i32) -> DomainResult<()> {
    if min_threshold < 0 {
        return Err(DomainError::validation("min_threshold must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn widget() -> Product {
        Product::new(
            ProductId::from_i64(1),
            NewProduct::new("Widget", "W-1").with_quantity(10),
            test_time(),
        )
    }

    #[test]
    fn new_product_uses_default_stock_settings() {
        let input = NewProduct::new("Bolt", "B-100");
        assert_eq!(input.quantity, 0);
        assert_eq!(input.min_threshold, DEFAULT_MIN_THRESHOLD);
        assert_eq!(input.description, None);
    }

    #[test]
    fn created_product_has_no_updated_at() {
        let created_at = test_time();
        let product = Product::new(ProductId::from_i64(3), NewProduct::new("Bolt", "B-100"), created_at);
        assert_eq!(product.id(), ProductId::from_i64(3));
        assert_eq!(product.created_at(), created_at);
        assert_eq!(product.updated_at(), None);
    }

    #[test]
    fn low_stock_but_not_out_of_stock() {
        let product = Product::new(
            ProductId::from_i64(1),
            NewProduct::new("Nut", "N-1").with_quantity(3).with_min_threshold(10),
            test_time(),
        );
        assert!(product.is_low_stock());
        assert!(!product.is_out_of_stock());
        assert_eq!(product.stock_status(), StockStatus::LowStock);
    }

    #[test]
    fn zero_quantity_is_out_of_stock() {
        let product = Product::new(
            ProductId::from_i64(1),
            NewProduct::new("Nut", "N-1").with_quantity(0).with_min_threshold(0),
            test_time(),
        );
        assert!(product.is_out_of_stock());
        assert!(!product.is_low_stock());
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn quantity_at_threshold_is_in_stock() {
        let product = Product::new(
            ProductId::from_i64(1),
            NewProduct::new("Bolt", "B-100").with_quantity(50).with_min_threshold(20),
            test_time(),
        );
        assert!(!product.is_low_stock());
        assert_eq!(product.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut product = widget();
        let now = test_time() + Duration::seconds(5);

        let applied = product.apply_patch(
            ProductPatch {
                quantity: Some(5),
                ..ProductPatch::default()
            },
            now,
        );

        assert!(applied);
        assert_eq!(product.quantity(), 5);
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.sku(), "W-1");
        assert_eq!(product.updated_at(), Some(now));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut product = widget();
        let before = product.clone();

        assert!(!product.apply_patch(ProductPatch::default(), test_time()));
        assert_eq!(product, before);
    }

    #[test]
    fn patch_with_current_value_still_stamps_updated_at() {
        let mut product = widget();
        let now = test_time();

        assert!(product.apply_patch(
            ProductPatch {
                name: Some("Widget".to_string()),
                ..ProductPatch::default()
            },
            now,
        ));
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.updated_at(), Some(now));
    }

    #[test]
    fn patch_can_set_and_clear_description() {
        let mut product = widget();

        product.apply_patch(
            ProductPatch {
                description: Some(Some("zinc plated".to_string())),
                ..ProductPatch::default()
            },
            test_time(),
        );
        assert_eq!(product.description(), Some("zinc plated"));

        product.apply_patch(
            ProductPatch {
                description: Some(None),
                ..ProductPatch::default()
            },
            test_time(),
        );
        assert_eq!(product.description(), None);
    }

    #[test]
    fn validate_rejects_blank_name_and_sku() {
        let err = NewProduct::new("   ", "SKU-1").validate().unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));

        let err = NewProduct::new("Widget", "").validate().unwrap_err();
        assert_eq!(err, DomainError::validation("sku cannot be empty"));
    }

    #[test]
    fn validate_enforces_length_limits_in_characters() {
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(NewProduct::new(name, "SKU-1").validate().is_ok());

        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            NewProduct::new(name, "SKU-1").validate(),
            Err(DomainError::Validation(_))
        ));

        let sku = "S".repeat(MAX_SKU_LEN + 1);
        assert!(matches!(
            NewProduct::new("Widget", sku).validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_negative_stock_numbers() {
        let err = NewProduct::new("Widget", "W-1").with_quantity(-1).validate().unwrap_err();
        assert_eq!(err, DomainError::validation("quantity must be >= 0"));

        let err = NewProduct::new("Widget", "W-1").with_min_threshold(-1).validate().unwrap_err();
        assert_eq!(err, DomainError::validation("min_threshold must be >= 0"));
    }

    #[test]
    fn create_and_update_share_threshold_rule() {
        assert!(NewProduct::new("Widget", "W-1").with_min_threshold(0).validate().is_ok());
        let patch = ProductPatch {
            min_threshold: Some(0),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_validation_only_checks_present_fields() {
        assert!(ProductPatch::default().validate().is_ok());

        let patch = ProductPatch {
            sku: Some(" ".to_string()),
            ..ProductPatch::default()
        };
        assert_eq!(patch.validate().unwrap_err(), DomainError::validation("sku cannot be empty"));

        let patch = ProductPatch {
            quantity: Some(-5),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_patch() -> impl Strategy<Value = ProductPatch> {
            (
                proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,30}"),
                proptest::option::of("[A-Z0-9-]{1,20}"),
                proptest::option::of(proptest::option::of("[a-z ]{0,40}")),
                proptest::option::of(0i32..10_000),
                proptest::option::of(0i32..10_000),
            )
                .prop_map(|(name, sku, description, quantity, min_threshold)| ProductPatch {
                    name,
                    sku,
                    description,
                    quantity,
                    min_threshold,
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: fields absent from the patch keep their stored value.
            #[test]
            fn absent_fields_are_preserved(patch in arb_patch()) {
                let mut product = widget();
                let before = product.clone();
                let applied = product.apply_patch(patch.clone(), Utc::now());

                prop_assert_eq!(applied, !patch.is_empty());
                prop_assert!(product.is_same_record(&before));
                prop_assert_eq!(product.created_at(), before.created_at());

                prop_assert_eq!(product.name(), patch.name.as_deref().unwrap_or(before.name()));
                prop_assert_eq!(product.sku(), patch.sku.as_deref().unwrap_or(before.sku()));
                prop_assert_eq!(product.quantity(), patch.quantity.unwrap_or(before.quantity()));
                prop_assert_eq!(
                    product.min_threshold(),
                    patch.min_threshold.unwrap_or(before.min_threshold())
                );
                match &patch.description {
                    Some(d) => prop_assert_eq!(product.description(), d.as_deref()),
                    None => prop_assert_eq!(product.description(), before.description()),
                }
            }

            /// Property: applying the same patch twice is the same as applying it once.
            #[test]
            fn apply_patch_is_idempotent(patch in arb_patch()) {
                let now = Utc::now();
                let mut once = widget();
                once.apply_patch(patch.clone(), now);
                let mut twice = once.clone();
                twice.apply_patch(patch, now);

                prop_assert_eq!(once, twice);
            }

            /// Property: derived flags follow quantity and threshold exactly.
            #[test]
            fn derived_flags_match_definition(quantity in 0i32..1_000, min_threshold in 0i32..1_000) {
                let product = Product::new(
                    ProductId::from_i64(1),
                    NewProduct::new("Widget", "W-1")
                        .with_quantity(quantity)
                        .with_min_threshold(min_threshold),
                    Utc::now(),
                );

                prop_assert_eq!(product.is_low_stock(), quantity < min_threshold);
                prop_assert_eq!(product.is_out_of_stock(), quantity <= 0);
            }

            /// Property: non-negative stock numbers always pass validation.
            #[test]
            fn non_negative_numbers_validate(quantity in 0i32..=i32::MAX, min_threshold in 0i32..=i32::MAX) {
                let input = NewProduct::new("Widget", "W-1")
                    .with_quantity(quantity)
                    .with_min_threshold(min_threshold);
                prop_assert!(input.validate().is_ok());
            }
        }
    }
}
