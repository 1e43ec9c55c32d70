// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::OrganizationId;

code_enum! {
    /// Lifecycle of an organization.
    pub enum OrganizationStatus {
        New => "New",
        Active => "Active",
        Deleted => "Deleted",
    }
}

/// Business register identifier (e.g. a Danish CVR number).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessRegisterIdentifier(String);

impl BusinessRegisterIdentifier {
    /// Creates an identifier, normalizing surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains anything but ASCII
    /// letters and digits.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidBusinessRegisterIdentifier(
                value.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Email domain owned by an organization, e.g. `energinet.dk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrganizationDomain(String);

impl OrganizationDomain {
    /// Creates a domain, normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDomain` unless the value is a dotted DNS name.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_lowercase();
        let labels: Vec<&str> = normalized.split('.').collect();

        let valid_label = |label: &&str| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        };

        if labels.len() < 2 || !labels.iter().all(valid_label) {
            return Err(DomainError::InvalidDomain(value.to_string()));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Postal address of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street_name: Option<String>,
    pub number: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country: String,
}

/// A legal entity owning one or more actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    id: OrganizationId,
    name: String,
    business_register_identifier: BusinessRegisterIdentifier,
    address: Address,
    domains: Vec<OrganizationDomain>,
    status: OrganizationStatus,
}

impl Organization {
    /// Creates a new organization in status `New`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or no domain is given.
    pub fn new(
        name: &str,
        business_register_identifier: BusinessRegisterIdentifier,
        address: Address,
        domains: Vec<OrganizationDomain>,
    ) -> Result<Self, DomainError> {
        Self::with_id(
            OrganizationId::new(),
            name,
            business_register_identifier,
            address,
            domains,
            OrganizationStatus::New,
        )
    }

    /// Rebuilds an organization from its persisted parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or no domain is given.
    pub fn with_id(
        id: OrganizationId,
        name: &str,
        business_register_identifier: BusinessRegisterIdentifier,
        address: Address,
        mut domains: Vec<OrganizationDomain>,
        status: OrganizationStatus,
    ) -> Result<Self, DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Organization name cannot be empty",
            )));
        }
        domains.sort();
        domains.dedup();
        if domains.is_empty() {
            return Err(DomainError::MissingOrganizationDomain);
        }

        Ok(Self {
            id,
            name: name.to_string(),
            business_register_identifier,
            address,
            domains,
            status,
        })
    }

    #[must_use]
    pub const fn id(&self) -> OrganizationId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn business_register_identifier(&self) -> &BusinessRegisterIdentifier {
        &self.business_register_identifier
    }

    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub fn domains(&self) -> &[OrganizationDomain] {
        &self.domains
    }

    #[must_use]
    pub const fn status(&self) -> OrganizationStatus {
        self.status
    }

    /// Renames the organization.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if the name is blank.
    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Organization name cannot be empty",
            )));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    /// Replaces the set of domains.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingOrganizationDomain` if the set is empty.
    pub fn set_domains(&mut self, mut domains: Vec<OrganizationDomain>) -> Result<(), DomainError> {
        domains.sort();
        domains.dedup();
        if domains.is_empty() {
            return Err(DomainError::MissingOrganizationDomain);
        }
        self.domains = domains;
        Ok(())
    }

    /// Activates a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error unless the organization is `New`.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        self.transition(OrganizationStatus::New, OrganizationStatus::Active)
    }

    /// Marks a new or active organization as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is already deleted.
    pub fn delete(&mut self) -> Result<(), DomainError> {
        if self.status == OrganizationStatus::Deleted {
            return Err(DomainError::InvalidStatusTransition {
                entity: "Organization",
                from: self.status.as_str(),
                to: OrganizationStatus::Deleted.as_str(),
            });
        }
        self.status = OrganizationStatus::Deleted;
        Ok(())
    }

    fn transition(
        &mut self,
        expected: OrganizationStatus,
        target: OrganizationStatus,
    ) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::InvalidStatusTransition {
                entity: "Organization",
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        self.status = target;
        Ok(())
    }
}
