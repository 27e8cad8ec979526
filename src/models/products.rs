use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Plant attributes ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    Tree,
    Shrub,
    Perennial,
    Annual,
    Houseplant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GrowthRate {
    Slow,
    Medium,
    Fast,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WaterNeeds {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SunRequirements {
    FullSun,
    PartialSun,
    PartialShade,
    FullShade,
}

// --- Catalog records ---

/// Category
///
/// Catalog tree node; `parent_id` is `None` for top-level categories.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Product
///
/// A sellable plant. Prices are in the default currency; the wholesale price applies
/// to B2B accounts when present.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Uuid,

    // Plant-specific attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub botanical_name: Option<String>,
    pub plant_type: PlantType,
    /// Centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mature_height_max: Option<u32>,
    pub growth_rate: GrowthRate,
    pub sun_requirements: Vec<SunRequirements>,
    pub water_needs: WaterNeeds,
    pub hardiness_zones: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_instructions: Option<String>,

    // Pricing
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wholesale_price: Option<f64>,

    // Status
    pub is_active: bool,
    pub is_featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Wholesale buyers get the wholesale price when one is set.
    pub fn price_for(&self, wholesale: bool) -> f64 {
        match (wholesale, self.wholesale_price) {
            (true, Some(price)) => price,
            _ => self.base_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_size: Option<String>,
    /// Added to the product price; may be negative.
    pub price_adjustment: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    pub display_order: i32,
    pub is_primary: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ProductWithDetails
///
/// Catalog view: the product flattened together with its category, variants, images
/// and stock totals.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ProductImage>,
    pub total_stock: u32,
    pub in_stock: bool,
}

impl ProductWithDetails {
    pub fn new(
        product: Product,
        category: Category,
        variants: Vec<ProductVariant>,
        mut images: Vec<ProductImage>,
        total_stock: u32,
    ) -> Self {
        images.sort_by_key(|image| image.display_order);
        Self {
            product,
            category,
            variants,
            images,
            total_stock,
            in_stock: total_stock > 0,
        }
    }

    /// The image flagged primary, else the first by display order.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}
