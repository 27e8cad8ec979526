//! Application-wide constants: metadata, route tables, defaults and upload limits.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{GrowthRate, PlantType, SunRequirements, UserRole, UserType, WaterNeeds};

/// Static application metadata. The public site URL is runtime configuration and
/// lives in `AppConfig::site_url`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct AppMetadata {
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub description: &'static str,
    #[schema(value_type = String)]
    pub version: &'static str,
    #[schema(value_type = String)]
    pub author: &'static str,
    #[schema(value_type = Vec<String>)]
    pub keywords: &'static [&'static str],
}

pub const APP_CONFIG: AppMetadata = AppMetadata {
    name: "Nursery Management System",
    description: "Modern nursery management for B2B and B2C customers",
    version: "1.0.0",
    author: "Nursery Team",
    keywords: &["nursery", "plants", "b2b", "e-commerce", "garden"],
};

/// JSON API endpoints. Everything under `/api` bypasses the route guard.
pub mod api_routes {
    pub const AUTH: &str = "/api/auth";
    pub const USERS: &str = "/api/users";
    pub const PRODUCTS: &str = "/api/products";
    pub const CATEGORIES: &str = "/api/categories";
    pub const ORDERS: &str = "/api/orders";
    pub const INVENTORY: &str = "/api/inventory";
    pub const UPLOAD: &str = "/api/upload";
    pub const ROLES: &str = "/api/roles";
    pub const CONFIG: &str = "/api/config";
}

/// Page routes.
pub mod routes {
    pub const HOME: &str = "/";

    // Auth routes
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";

    // Dashboard routes
    pub const DASHBOARD: &str = "/dashboard";

    // Product routes
    pub const PRODUCTS: &str = "/products";
    pub const CATEGORIES: &str = "/categories";

    // Order routes
    pub const CART: &str = "/cart";
    pub const CHECKOUT: &str = "/checkout";
    pub const ORDERS: &str = "/orders";

    // Account routes
    pub const PROFILE: &str = "/account/profile";
    pub const COMPANY: &str = "/account/company";
    pub const SETTINGS: &str = "/account/settings";

    // Admin routes
    pub const ADMIN: &str = "/admin";
    pub const ADMIN_USERS: &str = "/admin/users";
    pub const ADMIN_PRODUCTS: &str = "/admin/products";
    pub const ADMIN_ORDERS: &str = "/admin/orders";
    pub const ADMIN_INVENTORY: &str = "/admin/inventory";
    pub const ADMIN_SETTINGS: &str = "/admin/settings";

    pub fn product_detail(slug: &str) -> String {
        format!("{PRODUCTS}/{slug}")
    }

    pub fn order_detail(id: &str) -> String {
        format!("{ORDERS}/{id}")
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaginationDefaults {
    pub page: u32,
    pub limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DefaultValues {
    pub pagination: PaginationDefaults,
    pub user_type: UserType,
    pub user_role: UserRole,
    pub currency: &'static str,
    pub locale: &'static str,
}

pub const DEFAULT_VALUES: DefaultValues = DefaultValues {
    pagination: PaginationDefaults {
        page: 1,
        limit: 10,
        max_limit: 100,
    },
    user_type: UserType::B2C,
    user_role: UserRole::RetailCustomer,
    currency: "VND",
    locale: "vi-VN",
};

/// Size (bytes) and MIME allow-list for one upload kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UploadLimit {
    pub max_size: u64,
    pub allowed_types: &'static [&'static str],
}

impl UploadLimit {
    pub fn accepts(&self, content_type: &str, size: u64) -> bool {
        size <= self.max_size && self.allowed_types.contains(&content_type)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UploadLimits {
    pub image: UploadLimit,
    pub document: UploadLimit,
}

pub const UPLOAD_LIMITS: UploadLimits = UploadLimits {
    image: UploadLimit {
        max_size: 5 * 1024 * 1024,
        allowed_types: &["image/jpeg", "image/jpg", "image/png", "image/webp"],
    },
    document: UploadLimit {
        max_size: 10 * 1024 * 1024,
        allowed_types: &["application/pdf", "application/msword", "text/plain"],
    },
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlantConstants {
    pub hardiness_zones: &'static [u8],
    pub sun_requirements: &'static [SunRequirements],
    pub water_needs: &'static [WaterNeeds],
    pub growth_rates: &'static [GrowthRate],
    pub plant_types: &'static [PlantType],
    pub container_types: &'static [&'static str],
    pub size_categories: &'static [&'static str],
}

pub const PLANT_CONSTANTS: PlantConstants = PlantConstants {
    hardiness_zones: &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13],
    sun_requirements: &[
        SunRequirements::FullSun,
        SunRequirements::PartialSun,
        SunRequirements::PartialShade,
        SunRequirements::FullShade,
    ],
    water_needs: &[WaterNeeds::Low, WaterNeeds::Medium, WaterNeeds::High],
    growth_rates: &[GrowthRate::Slow, GrowthRate::Medium, GrowthRate::Fast],
    plant_types: &[
        PlantType::Tree,
        PlantType::Shrub,
        PlantType::Perennial,
        PlantType::Annual,
        PlantType::Houseplant,
    ],
    container_types: &[
        "plastic_pot",
        "terracotta_pot",
        "fabric_bag",
        "biodegradable_pot",
    ],
    size_categories: &[
        "seedling",
        "4_inch",
        "6_inch",
        "1_gallon",
        "2_gallon",
        "5_gallon",
        "10_gallon",
        "15_gallon",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_routes() {
        assert_eq!(routes::product_detail("rose-bush"), "/products/rose-bush");
        assert_eq!(routes::order_detail("42"), "/orders/42");
    }

    #[test]
    fn api_routes_are_outside_the_guard() {
        let guard = crate::guard::RouteGuard::default();
        for route in [
            api_routes::AUTH,
            api_routes::USERS,
            api_routes::PRODUCTS,
            api_routes::CATEGORIES,
            api_routes::ORDERS,
            api_routes::INVENTORY,
            api_routes::UPLOAD,
        ] {
            assert!(guard.is_excluded(route), "{route}");
        }
    }

    #[test]
    fn upload_limits() {
        assert!(UPLOAD_LIMITS.image.accepts("image/webp", 5 * 1024 * 1024));
        assert!(!UPLOAD_LIMITS.image.accepts("image/webp", 5 * 1024 * 1024 + 1));
        assert!(!UPLOAD_LIMITS.image.accepts("image/gif", 10));
        assert!(UPLOAD_LIMITS.document.accepts("application/pdf", 9 * 1024 * 1024));
    }

    #[test]
    fn hardiness_zones_cover_one_to_thirteen() {
        assert_eq!(PLANT_CONSTANTS.hardiness_zones.first(), Some(&1));
        assert_eq!(PLANT_CONSTANTS.hardiness_zones.len(), 13);
    }
}
