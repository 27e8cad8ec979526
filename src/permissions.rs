//! Role permission table.
//!
//! A fixed lookup from `UserRole` to the capabilities the back office checks before
//! showing management screens. There is no rule engine: each role maps to one row.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageProducts,
    ManageOrders,
    ManageInventory,
    ManageSettings,
    ViewReports,
    ManageFinances,
}

/// One row of the permission table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub can_manage_users: bool,
    pub can_manage_products: bool,
    pub can_manage_orders: bool,
    pub can_manage_inventory: bool,
    pub can_manage_settings: bool,
    pub can_view_reports: bool,
    pub can_manage_finances: bool,
}

impl RolePermissions {
    pub const NONE: RolePermissions = RolePermissions {
        can_manage_users: false,
        can_manage_products: false,
        can_manage_orders: false,
        can_manage_inventory: false,
        can_manage_settings: false,
        can_view_reports: false,
        can_manage_finances: false,
    };

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManageUsers => self.can_manage_users,
            Permission::ManageProducts => self.can_manage_products,
            Permission::ManageOrders => self.can_manage_orders,
            Permission::ManageInventory => self.can_manage_inventory,
            Permission::ManageSettings => self.can_manage_settings,
            Permission::ViewReports => self.can_view_reports,
            Permission::ManageFinances => self.can_manage_finances,
        }
    }
}

impl UserRole {
    pub const fn permissions(self) -> RolePermissions {
        match self {
            UserRole::SuperAdmin => RolePermissions {
                can_manage_users: true,
                can_manage_products: true,
                can_manage_orders: true,
                can_manage_inventory: true,
                can_manage_settings: true,
                can_view_reports: true,
                can_manage_finances: true,
            },
            UserRole::NurseryManager => RolePermissions {
                can_manage_products: true,
                can_manage_orders: true,
                can_manage_inventory: true,
                can_view_reports: true,
                ..RolePermissions::NONE
            },
            UserRole::SalesStaff => RolePermissions {
                can_manage_orders: true,
                can_view_reports: true,
                ..RolePermissions::NONE
            },
            UserRole::NurseryWorker => RolePermissions {
                can_manage_inventory: true,
                ..RolePermissions::NONE
            },
            UserRole::ContentEditor => RolePermissions {
                can_manage_products: true,
                ..RolePermissions::NONE
            },
            UserRole::WholesaleCustomer | UserRole::RetailCustomer => RolePermissions::NONE,
        }
    }

    pub fn can(self, permission: Permission) -> bool {
        self.permissions().allows(permission)
    }
}
