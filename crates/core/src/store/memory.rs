//! In-memory implementation of every store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgdesk_shared::types::{ActivationId, CredentialId, OrganizationId, PageRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::{
    ActivationLog, AdministratorStore, OrganizationDirectory, PricingCatalogStore, StoreError,
    StoreResult, ValidationStore,
};
use crate::activation::EngagementActivation;
use crate::organization::OrganizationProfile;
use crate::payment::PaymentRecord;
use crate::pricing::{MembershipFeeRecord, PricingCatalog, PricingConfigRecord};
use crate::provisioning::AdministratorCredential;
use crate::validation::{ValidationEvent, ValidationStatus};

#[derive(Default)]
struct State {
    organizations: HashMap<OrganizationId, OrganizationProfile>,
    configs: Vec<PricingConfigRecord>,
    membership_fees: Vec<MembershipFeeRecord>,
    catalog_version: u64,
    activations: Vec<EngagementActivation>,
    statuses: HashMap<OrganizationId, ValidationStatus>,
    payments: Vec<PaymentRecord>,
    events: Vec<ValidationEvent>,
    administrators: Vec<AdministratorCredential>,
}

impl State {
    fn check_version(
        &self,
        organization_id: OrganizationId,
        expected_version: Option<i64>,
    ) -> StoreResult<()> {
        let stored = self.statuses.get(&organization_id).map(|s| s.version);
        if stored == expected_version {
            Ok(())
        } else {
            Err(StoreError::Conflict(format!(
                "validation status of {organization_id} is at version {}, expected {}",
                stored.map_or_else(|| "none".to_string(), |v| v.to_string()),
                expected_version.map_or_else(|| "none".to_string(), |v| v.to_string()),
            )))
        }
    }

    fn check_catalog_version(&self, expected_version: u64) -> StoreResult<()> {
        if self.catalog_version == expected_version {
            Ok(())
        } else {
            Err(StoreError::Conflict(format!(
                "pricing catalog is at version {}, expected {expected_version}",
                self.catalog_version
            )))
        }
    }

    fn write_status(&mut self, status: &ValidationStatus, events: &[ValidationEvent]) {
        self.statuses.insert(status.organization_id, status.clone());
        self.events.extend_from_slice(events);
    }
}

/// Mutex-guarded in-memory store.
///
/// Each trait call takes the lock once, so conditional writes are atomic.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a backend error, or recover.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryStore {
    async fn insert_organization(&self, profile: &OrganizationProfile) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        if state.organizations.contains_key(&profile.id) {
            return Err(StoreError::Duplicate(format!("organization {}", profile.id)));
        }
        state.organizations.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> StoreResult<Option<OrganizationProfile>> {
        self.ensure_available()?;
        Ok(self.state.lock().await.organizations.get(&id).cloned())
    }

    async fn update_engagement(&self, profile: &OrganizationProfile) -> StoreResult<bool> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        match state.organizations.get_mut(&profile.id) {
            Some(stored) if stored.is_active => {
                stored.engagement_model = profile.engagement_model;
                stored.membership_status = profile.membership_status;
                stored.pricing_tier.clone_from(&profile.pricing_tier);
                stored.workflow_step = profile.workflow_step;
                stored.approval_status = profile.approval_status;
                stored.is_completed = profile.is_completed;
                stored.updated_at = profile.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate_organization(
        &self,
        id: OrganizationId,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        let stored = state
            .organizations
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("organization {id}")))?;
        if !stored.is_active {
            return Ok(false);
        }
        stored.is_active = false;
        stored.updated_at = at;
        Ok(true)
    }

    async fn update_progress(&self, profile: &OrganizationProfile) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        match state.organizations.get_mut(&profile.id) {
            Some(stored) => {
                stored.workflow_step = profile.workflow_step;
                stored.approval_status = profile.approval_status;
                stored.is_completed = profile.is_completed;
                stored.updated_at = profile.updated_at;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("organization {}", profile.id))),
        }
    }
}

#[async_trait]
impl PricingCatalogStore for InMemoryStore {
    async fn load_catalog(&self) -> StoreResult<PricingCatalog> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(PricingCatalog::new(
            state.catalog_version,
            state.configs.clone(),
            state.membership_fees.clone(),
        ))
    }

    async fn insert_pricing_config(
        &self,
        record: &PricingConfigRecord,
        expected_version: u64,
    ) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        state.check_catalog_version(expected_version)?;
        state.configs.push(record.clone());
        state.catalog_version += 1;
        Ok(())
    }

    async fn insert_membership_fee(
        &self,
        record: &MembershipFeeRecord,
        expected_version: u64,
    ) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        state.check_catalog_version(expected_version)?;
        state.membership_fees.push(record.clone());
        state.catalog_version += 1;
        Ok(())
    }
}

#[async_trait]
impl ActivationLog for InMemoryStore {
    async fn append_activation(
        &self,
        activation: &EngagementActivation,
    ) -> StoreResult<EngagementActivation> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        if let Some(key) = activation.idempotency_key.as_deref()
            && let Some(existing) = state.activations.iter().find(|a| {
                a.organization_id == activation.organization_id
                    && a.idempotency_key.as_deref() == Some(key)
            })
        {
            return Ok(existing.clone());
        }
        state.activations.push(activation.clone());
        Ok(activation.clone())
    }

    async fn find_activation(
        &self,
        organization_id: OrganizationId,
        id: ActivationId,
    ) -> StoreResult<Option<EngagementActivation>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .activations
            .iter()
            .find(|a| a.organization_id == organization_id && a.id == id)
            .cloned())
    }

    async fn find_activation_by_key(
        &self,
        organization_id: OrganizationId,
        key: &str,
    ) -> StoreResult<Option<EngagementActivation>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .activations
            .iter()
            .find(|a| a.organization_id == organization_id && a.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn has_activation(&self, organization_id: OrganizationId) -> StoreResult<bool> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .activations
            .iter()
            .any(|a| a.organization_id == organization_id))
    }

    async fn list_activations(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<EngagementActivation>, u64)> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        let all: Vec<_> = state
            .activations
            .iter()
            .filter(|a| a.organization_id == organization_id)
            .cloned()
            .collect();
        Ok((page.slice(&all), all.len() as u64))
    }
}

#[async_trait]
impl ValidationStore for InMemoryStore {
    async fn find_validation_status(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<ValidationStatus>> {
        self.ensure_available()?;
        Ok(self.state.lock().await.statuses.get(&organization_id).cloned())
    }

    async fn record_payment(
        &self,
        payment: &PaymentRecord,
        status: &ValidationStatus,
        expected_version: Option<i64>,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        let receipt_used = state.payments.iter().any(|p| {
            p.organization_id == payment.organization_id
                && p.receipt_number == payment.receipt_number
        });
        if receipt_used {
            return Err(StoreError::Duplicate(format!(
                "receipt {} for organization {}",
                payment.receipt_number, payment.organization_id
            )));
        }
        state.check_version(status.organization_id, expected_version)?;
        state.payments.push(payment.clone());
        state.write_status(status, events);
        Ok(())
    }

    async fn find_payment_by_receipt(
        &self,
        organization_id: OrganizationId,
        receipt_number: &str,
    ) -> StoreResult<Option<PaymentRecord>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .payments
            .iter()
            .find(|p| p.organization_id == organization_id && p.receipt_number == receipt_number)
            .cloned())
    }

    async fn list_payments(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Vec<PaymentRecord>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .payments
            .iter()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn compare_and_swap(
        &self,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        state.check_version(status.organization_id, Some(expected_version))?;
        state.write_status(status, events);
        Ok(())
    }

    async fn list_validation_events(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<ValidationEvent>, u64)> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        let all: Vec<_> = state
            .events
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect();
        Ok((page.slice(&all), all.len() as u64))
    }
}

#[async_trait]
impl AdministratorStore for InMemoryStore {
    async fn find_active_administrator(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<AdministratorCredential>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state
            .administrators
            .iter()
            .find(|c| c.organization_id == organization_id && c.is_active)
            .cloned())
    }

    async fn find_administrator(
        &self,
        id: CredentialId,
    ) -> StoreResult<Option<AdministratorCredential>> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        Ok(state.administrators.iter().find(|c| c.id == id).cloned())
    }

    async fn provision_administrator(
        &self,
        credential: &AdministratorCredential,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        let active_exists = state
            .administrators
            .iter()
            .any(|c| c.organization_id == credential.organization_id && c.is_active);
        if active_exists {
            return Err(StoreError::Duplicate(format!(
                "active administrator for organization {}",
                credential.organization_id
            )));
        }
        state.check_version(status.organization_id, Some(expected_version))?;
        state.administrators.push(credential.clone());
        state.write_status(status, events);
        Ok(())
    }

    async fn update_administrator(&self, credential: &AdministratorCredential) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        match state.administrators.iter_mut().find(|c| c.id == credential.id) {
            Some(stored) => {
                *stored = credential.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("administrator {}", credential.id))),
        }
    }
}
