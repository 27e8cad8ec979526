//! Shared domain types for the storefront and back office.
//!
//! JSON field names are camelCase and enum values keep the strings the frontend and
//! the database already use.

pub mod auth;
pub mod common;
pub mod products;

pub use auth::{
    AccountStatus, ApprovalStatus, AuthState, CompanyProfile, LoginCredentials, RegisterData,
    UnknownRole, UserProfile, UserRole, UserType,
};
pub use common::{ApiResponse, PaginatedResponse, Pagination, Priority, Status};
pub use products::{
    Category, GrowthRate, PlantType, Product, ProductImage, ProductVariant, ProductWithDetails,
    SunRequirements, WaterNeeds,
};
