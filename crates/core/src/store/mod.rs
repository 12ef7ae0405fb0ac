//! Persistence seams of the onboarding core.
//!
//! The database crate implements these traits on Postgres; [`InMemoryStore`]
//! implements all of them for tests and local runs.
//!
//! Every status write is conditional: it names the version it expects to
//! replace and fails with [`StoreError::Conflict`] if another writer got there
//! first.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgdesk_shared::types::{ActivationId, CredentialId, OrganizationId, PageRequest};
use std::sync::Arc;
use thiserror::Error;

use crate::activation::EngagementActivation;
use crate::error::ErrorKind;
use crate::organization::OrganizationProfile;
use crate::payment::PaymentRecord;
use crate::pricing::{MembershipFeeRecord, PricingCatalog, PricingConfigRecord};
use crate::provisioning::AdministratorCredential;
use crate::validation::{ValidationEvent, ValidationStatus};

/// Errors reported by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A conditional write found a different version than expected.
    #[error("Concurrent update detected: {0}")]
    Conflict(String),

    /// A uniqueness constraint was violated.
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The record to update does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The backend failed.
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Conflict(_) | Self::Backend(_) => ErrorKind::Persistence,
            Self::Duplicate(_) => ErrorKind::Rejected,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "CONCURRENT_UPDATE",
            Self::Duplicate(_) => "DUPLICATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Backend(_) => "PERSISTENCE_ERROR",
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Registered organizations.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Stores a newly registered organization.
    async fn insert_organization(&self, profile: &OrganizationProfile) -> StoreResult<()>;

    /// Looks up an organization, active or not.
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> StoreResult<Option<OrganizationProfile>>;

    /// Writes the engagement selection (model, membership status, pricing
    /// tier) and the progress fields, but only while the organization is
    /// active. Returns `false` and writes nothing otherwise.
    async fn update_engagement(&self, profile: &OrganizationProfile) -> StoreResult<bool>;

    /// Clears the active flag. Returns `false` if the organization was
    /// already inactive.
    ///
    /// A missing organization is [`StoreError::NotFound`].
    async fn deactivate_organization(
        &self,
        id: OrganizationId,
        at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Writes only the progress fields: workflow step, approval status and
    /// completion flag.
    async fn update_progress(&self, profile: &OrganizationProfile) -> StoreResult<()>;
}

/// Pricing and membership fee records.
#[async_trait]
pub trait PricingCatalogStore: Send + Sync {
    /// Loads a snapshot of every record, in insertion order.
    async fn load_catalog(&self) -> StoreResult<PricingCatalog>;

    /// Appends a pricing record if the catalog is still at
    /// `expected_version`; otherwise nothing is written and the result is a
    /// conflict.
    async fn insert_pricing_config(
        &self,
        record: &PricingConfigRecord,
        expected_version: u64,
    ) -> StoreResult<()>;

    /// Appends a membership fee record under the same version check as
    /// [`PricingCatalogStore::insert_pricing_config`].
    async fn insert_membership_fee(
        &self,
        record: &MembershipFeeRecord,
        expected_version: u64,
    ) -> StoreResult<()>;
}

/// Append-only activation history.
#[async_trait]
pub trait ActivationLog: Send + Sync {
    /// Appends an activation.
    ///
    /// If the organization already has an activation with the same
    /// idempotency key, nothing is written and the stored one is returned.
    async fn append_activation(
        &self,
        activation: &EngagementActivation,
    ) -> StoreResult<EngagementActivation>;

    /// Looks up one activation of an organization.
    async fn find_activation(
        &self,
        organization_id: OrganizationId,
        id: ActivationId,
    ) -> StoreResult<Option<EngagementActivation>>;

    /// Looks up an activation by idempotency key.
    async fn find_activation_by_key(
        &self,
        organization_id: OrganizationId,
        key: &str,
    ) -> StoreResult<Option<EngagementActivation>>;

    /// True once the organization has at least one activation.
    async fn has_activation(&self, organization_id: OrganizationId) -> StoreResult<bool>;

    /// Lists one page of an organization's activations, oldest first, with
    /// the total count.
    async fn list_activations(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<EngagementActivation>, u64)>;
}

/// Payments, validation statuses and their audit trail.
#[async_trait]
pub trait ValidationStore: Send + Sync {
    /// Reads an organization's validation status.
    async fn find_validation_status(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<ValidationStatus>>;

    /// Records a payment together with the status it opens or reopens.
    ///
    /// With `expected_version` absent the status is inserted and an existing
    /// one is a conflict; otherwise the status is swapped conditionally.
    /// A receipt number already used by the organization is a duplicate.
    async fn record_payment(
        &self,
        payment: &PaymentRecord,
        status: &ValidationStatus,
        expected_version: Option<i64>,
        events: &[ValidationEvent],
    ) -> StoreResult<()>;

    /// Looks up a payment by receipt number.
    async fn find_payment_by_receipt(
        &self,
        organization_id: OrganizationId,
        receipt_number: &str,
    ) -> StoreResult<Option<PaymentRecord>>;

    /// Lists an organization's payments, oldest first.
    async fn list_payments(&self, organization_id: OrganizationId)
    -> StoreResult<Vec<PaymentRecord>>;

    /// Replaces the status if the stored version equals `expected_version`,
    /// appending the events in the same step.
    async fn compare_and_swap(
        &self,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()>;

    /// Lists one page of an organization's validation events, oldest first,
    /// with the total count.
    async fn list_validation_events(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<ValidationEvent>, u64)>;
}

/// Administrator credentials.
#[async_trait]
pub trait AdministratorStore: Send + Sync {
    /// Returns the organization's active credential.
    async fn find_active_administrator(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<AdministratorCredential>>;

    /// Looks up a credential by id.
    async fn find_administrator(
        &self,
        id: CredentialId,
    ) -> StoreResult<Option<AdministratorCredential>>;

    /// Inserts the credential and swaps the validation status in one atomic
    /// step. A second active credential is a duplicate; a stale version is a
    /// conflict. Either way nothing is written.
    async fn provision_administrator(
        &self,
        credential: &AdministratorCredential,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()>;

    /// Overwrites an existing credential.
    async fn update_administrator(&self, credential: &AdministratorCredential) -> StoreResult<()>;
}

/// The full set of stores the onboarding service works against.
#[derive(Clone)]
pub struct Stores {
    /// Organizations.
    pub organizations: Arc<dyn OrganizationDirectory>,
    /// Pricing catalog.
    pub catalog: Arc<dyn PricingCatalogStore>,
    /// Activations.
    pub activations: Arc<dyn ActivationLog>,
    /// Payments and validation.
    pub validation: Arc<dyn ValidationStore>,
    /// Administrators.
    pub administrators: Arc<dyn AdministratorStore>,
}

impl Stores {
    /// Uses one value for every store.
    #[must_use]
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: OrganizationDirectory
            + PricingCatalogStore
            + ActivationLog
            + ValidationStore
            + AdministratorStore
            + 'static,
    {
        Self {
            organizations: store.clone(),
            catalog: store.clone(),
            activations: store.clone(),
            validation: store.clone(),
            administrators: store,
        }
    }
}
