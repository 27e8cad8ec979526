use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

/// UserRole
///
/// The RBAC role carried on every profile. Serialized with the same snake_case
/// strings the profiles table stores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq, Hash)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    NurseryManager,
    SalesStaff,
    NurseryWorker,
    WholesaleCustomer,
    RetailCustomer,
    ContentEditor,
}

impl UserRole {
    pub const ALL: [UserRole; 7] = [
        UserRole::SuperAdmin,
        UserRole::NurseryManager,
        UserRole::SalesStaff,
        UserRole::NurseryWorker,
        UserRole::WholesaleCustomer,
        UserRole::RetailCustomer,
        UserRole::ContentEditor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::NurseryManager => "nursery_manager",
            UserRole::SalesStaff => "sales_staff",
            UserRole::NurseryWorker => "nursery_worker",
            UserRole::WholesaleCustomer => "wholesale_customer",
            UserRole::RetailCustomer => "retail_customer",
            UserRole::ContentEditor => "content_editor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// UserType
///
/// Customer segment: consumers (B2C), trade accounts (B2B), and internal users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    B2C,
    B2B,
    Admin,
    Staff,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// UserProfile
///
/// Mirror of the provider's auth user in the profiles table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub role: UserRole,
    pub status: AccountStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// CompanyProfile
///
/// Trade account details attached to B2B users. Credit limit is in the default
/// currency; payment terms are in days.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    pub credit_limit: f64,
    pub payment_terms: u32,
    pub discount_tier: String,
    pub approval_status: ApprovalStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// AuthState
///
/// Snapshot of the signed-in visitor handed to page renderers.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn signed_in(user: UserProfile, company: Option<CompanyProfile>) -> Self {
        Self {
            user: Some(user),
            company,
            is_loading: false,
            is_authenticated: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)
    }
}

/// RegisterData
///
/// Sign-up form payload. The password is forwarded to the identity provider and never
/// stored or logged here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl RegisterData {
    /// Trade (B2B) sign-ups must name their company.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)?;
        validation::validate_name("firstName", &self.first_name)?;
        validation::validate_name("lastName", &self.last_name)?;

        match (&self.user_type, &self.company_name) {
            (UserType::B2B, None) => Err(ValidationError::Required {
                field: "companyName",
            }),
            (_, Some(company)) => validation::validate_name("companyName", company),
            _ => Ok(()),
        }
    }
}
