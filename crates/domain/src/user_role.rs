// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::UserRoleId;
use crate::market_role::EicFunction;
use std::collections::BTreeSet;

code_enum! {
    /// A capability granted to users through user roles.
    pub enum Permission {
        OrganizationsView => "organizations:view",
        OrganizationsManage => "organizations:manage",
        GridAreasManage => "grid-areas:manage",
        ActorsManage => "actors:manage",
        UsersView => "users:view",
        UsersManage => "users:manage",
        UserRolesManage => "user-roles:manage",
        ActorCredentialsManage => "actor-credentials:manage",
        ActorMasterDataManage => "actor-master-data:manage",
        DelegationView => "delegation:view",
        DelegationManage => "delegation:manage",
        SettlementReportsManage => "settlement-reports:manage",
        CalculationsManage => "calculations:manage",
        ImbalancePricesManage => "imbalance-prices:manage",
    }
}

impl Permission {
    /// The functions a role must have to grant this permission.
    #[must_use]
    pub const fn assignable_to(&self) -> &'static [EicFunction] {
        match self {
            Self::OrganizationsView
            | Self::OrganizationsManage
            | Self::GridAreasManage
            | Self::ActorsManage
            | Self::UserRolesManage
            | Self::DelegationManage
            | Self::CalculationsManage
            | Self::ImbalancePricesManage => &[EicFunction::DataHubAdministrator],
            Self::SettlementReportsManage => &[
                EicFunction::DataHubAdministrator,
                EicFunction::EnergySupplier,
                EicFunction::GridAccessProvider,
                EicFunction::SystemOperator,
            ],
            Self::UsersView
            | Self::UsersManage
            | Self::ActorCredentialsManage
            | Self::ActorMasterDataManage
            | Self::DelegationView => EicFunction::ALL,
        }
    }

    /// Whether a role for `function` may grant this permission.
    #[must_use]
    pub fn is_assignable_to(&self, function: EicFunction) -> bool {
        self.assignable_to().contains(&function)
    }
}

/// Permission and function pairs that must always stay granted by an active role.
pub const REQUIRED_PERMISSIONS: &[(Permission, EicFunction)] = &[
    (Permission::UsersManage, EicFunction::DataHubAdministrator),
    (Permission::UserRolesManage, EicFunction::DataHubAdministrator),
];

code_enum! {
    /// Lifecycle of a user role.
    pub enum UserRoleStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

/// A named set of permissions for one market function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
    id: UserRoleId,
    name: String,
    description: Option<String>,
    status: UserRoleStatus,
    eic_function: EicFunction,
    permissions: BTreeSet<Permission>,
}

impl UserRole {
    /// Creates an active user role.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or a permission is not
    /// assignable to `eic_function`.
    pub fn new(
        name: &str,
        description: Option<String>,
        eic_function: EicFunction,
        permissions: BTreeSet<Permission>,
    ) -> Result<Self, DomainError> {
        Self::with_id(
            UserRoleId::new(),
            name,
            description,
            UserRoleStatus::Active,
            eic_function,
            permissions,
        )
    }

    /// Rebuilds a user role from its persisted parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or a permission is not
    /// assignable to `eic_function`.
    pub fn with_id(
        id: UserRoleId,
        name: &str,
        description: Option<String>,
        status: UserRoleStatus,
        eic_function: EicFunction,
        permissions: BTreeSet<Permission>,
    ) -> Result<Self, DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "User role name cannot be empty",
            )));
        }
        validate_assignable(eic_function, &permissions)?;

        Ok(Self {
            id,
            name: name.to_string(),
            description,
            status,
            eic_function,
            permissions,
        })
    }

    #[must_use]
    pub const fn id(&self) -> UserRoleId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> UserRoleStatus {
        self.status
    }

    #[must_use]
    pub const fn eic_function(&self) -> EicFunction {
        self.eic_function
    }

    #[must_use]
    pub const fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserRoleStatus::Active
    }

    /// Whether this role, while active, grants `permission` to `function`.
    #[must_use]
    pub fn grants(&self, permission: Permission, function: EicFunction) -> bool {
        self.is_active() && self.eic_function == function && self.permissions.contains(&permission)
    }

    /// Replaces the permission set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionNotAssignable` for permissions outside
    /// the role's function.
    pub fn set_permissions(&mut self, permissions: BTreeSet<Permission>) -> Result<(), DomainError> {
        validate_assignable(self.eic_function, &permissions)?;
        self.permissions = permissions;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.status = UserRoleStatus::Inactive;
    }
}

fn validate_assignable(
    function: EicFunction,
    permissions: &BTreeSet<Permission>,
) -> Result<(), DomainError> {
    if let Some(permission) = permissions
        .iter()
        .find(|permission| !permission.is_assignable_to(function))
    {
        return Err(DomainError::PermissionNotAssignable {
            permission: *permission,
            function,
        });
    }
    Ok(())
}
