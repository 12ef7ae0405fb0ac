//! Onboarding facade over the stores, the pricing cache and the notifier.
//!
//! Pure decisions are delegated to the stateless components
//! ([`PricingResolver`], [`ActivationRecorder`], [`ValidationWorkflow`],
//! [`AdministratorProvisioner`]); this service loads their inputs, commits
//! their outputs and retries conditional writes that lose a race.

use chrono::Utc;
use garde::Validate;
use orgdesk_shared::types::{
    ActivationId, CredentialId, OrganizationId, PageRequest, PageResponse, PaymentId,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::error::OnboardingError;
use crate::activation::{
    ActivationError, ActivationRecorder, ActivationRequest, EngagementActivation,
};
use crate::auth::Actor;
use crate::notification::{Notification, Notifier};
use crate::organization::{NewOrganization, OrganizationProfile};
use crate::payment::{PaymentError, PaymentRecord, PaymentSubmission};
use crate::pricing::{
    BillingFrequency, CatalogCache, EngagementModel, MembershipFeeRecord,
    MembershipFeeResolution, MembershipStatus, MembershipTerm, NewMembershipFee,
    NewPricingConfig, PriceResolution, PricingConfigRecord, PricingError, PricingResolver,
};
use crate::provisioning::{
    AdministratorCredential, AdministratorProvisioner, AdministratorUpdate, NewAdministrator,
    ProvisionedAdministrator, ProvisioningError,
};
use crate::store::{StoreError, Stores};
use crate::validation::{
    PaymentStatus, StageStatus, StageTransition, TransitionOutcome, ValidationEvent,
    ValidationStage, ValidationStatus, ValidationWorkflow, WorkflowError,
};

/// Attempts at a conditional write before giving up.
pub const MAX_CAS_ATTEMPTS: usize = 3;

/// Result alias for onboarding operations.
pub type OnboardingResult<T> = Result<T, OnboardingError>;

/// A recorded payment and the validation status it left behind.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    /// The payment.
    pub payment: PaymentRecord,
    /// Validation status after the submission.
    pub status: ValidationStatus,
    /// True if this was a replay of an earlier submission.
    pub replayed: bool,
}

/// The onboarding service.
#[derive(Clone)]
pub struct OnboardingService {
    stores: Stores,
    catalog: CatalogCache,
    notifier: Arc<dyn Notifier>,
}

impl OnboardingService {
    /// Creates the service. The pricing catalog snapshot is cached for
    /// `catalog_ttl`.
    #[must_use]
    pub fn new(stores: Stores, catalog_ttl: Duration, notifier: Arc<dyn Notifier>) -> Self {
        let catalog = CatalogCache::new(Arc::clone(&stores.catalog), catalog_ttl);
        Self {
            stores,
            catalog,
            notifier,
        }
    }

    // ========================================================================
    // Organizations
    // ========================================================================

    /// Registers a new organization.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for bad registration details, or a store failure.
    pub async fn register_organization(
        &self,
        input: NewOrganization,
    ) -> OnboardingResult<OrganizationProfile> {
        input
            .validate()
            .map_err(|report| OnboardingError::InvalidInput(report.to_string()))?;
        let profile = input.into_profile(Utc::now());
        self.stores.organizations.insert_organization(&profile).await?;
        Ok(profile)
    }

    /// Reads an organization with its progress fields brought up to date.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn get_organization(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> OnboardingResult<OrganizationProfile> {
        ensure_acts_for(actor, organization_id)?;
        self.refresh_progress(organization_id).await
    }

    /// Soft-deletes an organization. Reviewers only. Deactivating an
    /// inactive organization is a no-op.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn deactivate_organization(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> OnboardingResult<OrganizationProfile> {
        ensure_reviewer(actor, "deactivate organizations")?;
        match self
            .stores
            .organizations
            .deactivate_organization(organization_id, Utc::now())
            .await
        {
            Ok(_) => {}
            Err(StoreError::NotFound(_)) => {
                return Err(OnboardingError::OrganizationNotFound(organization_id));
            }
            Err(err) => return Err(err.into()),
        }
        self.load_organization(organization_id).await
    }

    /// Copies an activation's engagement model and membership status onto the
    /// organization profile.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, `OrganizationInactive`,
    /// `ActivationNotFound`, or a store failure.
    pub async fn apply_engagement_selection(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        activation_id: ActivationId,
        pricing_tier: Option<String>,
    ) -> OnboardingResult<OrganizationProfile> {
        ensure_acts_for(actor, organization_id)?;
        let mut profile = self.load_active_organization(organization_id).await?;
        let activation = self
            .stores
            .activations
            .find_activation(organization_id, activation_id)
            .await?
            .ok_or(ActivationError::ActivationNotFound(activation_id))?;

        let now = Utc::now();
        profile.engagement_model = Some(activation.engagement_model);
        profile.membership_status = activation.membership_status;
        profile.pricing_tier = pricing_tier
            .map(|tier| tier.trim().to_string())
            .filter(|tier| !tier.is_empty());
        profile.updated_at = now;

        let status = self
            .stores
            .validation
            .find_validation_status(organization_id)
            .await?;
        profile.sync_progress(status.as_ref(), now);
        if !self.stores.organizations.update_engagement(&profile).await? {
            return Err(OnboardingError::OrganizationInactive(organization_id));
        }
        Ok(profile)
    }

    // ========================================================================
    // Pricing
    // ========================================================================

    /// Resolves the price an organization would pay for a selection.
    ///
    /// Missing configuration is `PriceResolution::NotFound`, not an error.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn resolve_price(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        engagement_model: EngagementModel,
        membership_status: MembershipStatus,
        frequency: Option<BillingFrequency>,
    ) -> OnboardingResult<PriceResolution> {
        ensure_acts_for(actor, organization_id)?;
        let profile = self.load_organization(organization_id).await?;
        let catalog = self.catalog.snapshot().await?;
        Ok(PricingResolver::resolve(
            &catalog,
            &profile.classification,
            engagement_model,
            membership_status,
            frequency,
            Utc::now(),
        ))
    }

    /// Resolves the membership fee for a term.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn resolve_membership_fee(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        term: MembershipTerm,
    ) -> OnboardingResult<MembershipFeeResolution> {
        ensure_acts_for(actor, organization_id)?;
        let profile = self.load_organization(organization_id).await?;
        let catalog = self.catalog.snapshot().await?;
        Ok(PricingResolver::resolve_membership_fee(
            &catalog,
            &profile.classification,
            term,
        ))
    }

    /// Adds a pricing record. Reviewers only.
    ///
    /// The overlap check and the insert are tied to one catalog version, so
    /// two overlapping records written at once cannot both land.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `InvalidConfig`, `Overlap` with an active record for the
    /// same key, or a store failure.
    pub async fn create_pricing_config(
        &self,
        actor: &Actor,
        input: NewPricingConfig,
    ) -> OnboardingResult<PricingConfigRecord> {
        ensure_reviewer(actor, "write the pricing catalog")?;
        input.check().map_err(PricingError::InvalidConfig)?;
        let record = input.into_record(Utc::now());

        for _ in 0..MAX_CAS_ATTEMPTS {
            let current = self.stores.catalog.load_catalog().await?;
            current.check_overlap(&record)?;
            match self
                .catalog
                .insert_pricing_config(&record, current.version())
                .await
            {
                Ok(()) => return Ok(record),
                Err(StoreError::Conflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(catalog_contention())
    }

    /// Adds a membership fee record. Reviewers only.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `InvalidConfig` for bad or duplicate records, or a store
    /// failure.
    pub async fn create_membership_fee(
        &self,
        actor: &Actor,
        input: NewMembershipFee,
    ) -> OnboardingResult<MembershipFeeRecord> {
        ensure_reviewer(actor, "write the pricing catalog")?;
        input.check().map_err(PricingError::InvalidConfig)?;
        let record = input.into_record(Utc::now());

        for _ in 0..MAX_CAS_ATTEMPTS {
            let current = self.stores.catalog.load_catalog().await?;
            current.check_membership_fee_duplicate(&record)?;
            match self
                .catalog
                .insert_membership_fee(&record, current.version())
                .await
            {
                Ok(()) => return Ok(record),
                Err(StoreError::Conflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(catalog_contention())
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Activates an engagement model at the price resolved server-side.
    ///
    /// A request repeating an earlier idempotency key returns the earlier
    /// activation unchanged.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, any `ActivationError`, or a store
    /// failure.
    pub async fn activate_engagement(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        request: ActivationRequest,
    ) -> OnboardingResult<EngagementActivation> {
        ensure_acts_for(actor, organization_id)?;
        if let Some(key) = request
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            && let Some(existing) = self
                .stores
                .activations
                .find_activation_by_key(organization_id, key)
                .await?
        {
            return Ok(existing);
        }

        let profile = self.load_organization(organization_id).await?;
        let catalog = self.catalog.snapshot().await?;
        let now = Utc::now();
        let resolution = PricingResolver::resolve(
            &catalog,
            &profile.classification,
            request.engagement_model,
            request.membership_status,
            request.billing_frequency,
            now,
        );
        let activation = ActivationRecorder::activate(
            &profile,
            &resolution,
            request.billing_frequency,
            request.terms_accepted,
            actor,
            request.idempotency_key,
            now,
        )?;

        let stored = self.stores.activations.append_activation(&activation).await?;
        if stored.id == activation.id {
            self.notifier
                .notify(Notification::EngagementActivated {
                    organization_id,
                    activation_id: stored.id,
                    final_price: stored.final_price.clone(),
                })
                .await;
        }
        Ok(stored)
    }

    /// Lists one page of an organization's activations, oldest first.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn list_activations(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> OnboardingResult<PageResponse<EngagementActivation>> {
        ensure_acts_for(actor, organization_id)?;
        self.load_organization(organization_id).await?;
        let (items, total) = self
            .stores
            .activations
            .list_activations(organization_id, page)
            .await?;
        Ok(PageResponse::for_request(items, page, total))
    }

    // ========================================================================
    // Payment and validation
    // ========================================================================

    /// Records a payment and opens validation, or reopens it after a decline.
    ///
    /// Resubmitting a receipt number with the same amount and method returns
    /// the original payment.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, `OrganizationInactive`, any
    /// `PaymentError`, `Contention`, or a store failure.
    pub async fn submit_payment(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        submission: PaymentSubmission,
    ) -> OnboardingResult<PaymentReceipt> {
        ensure_acts_for(actor, organization_id)?;
        let receipt_number = submission.check().map_err(PaymentError::Invalid)?;

        for _ in 0..MAX_CAS_ATTEMPTS {
            let profile = self.load_active_organization(organization_id).await?;

            if let Some(existing) = self
                .stores
                .validation
                .find_payment_by_receipt(organization_id, &receipt_number)
                .await?
            {
                if !existing.matches(&submission) {
                    return Err(PaymentError::ReceiptReused(receipt_number).into());
                }
                let status = self.load_status(organization_id).await?;
                return Ok(PaymentReceipt {
                    payment: existing,
                    status,
                    replayed: true,
                });
            }

            if !self.stores.activations.has_activation(organization_id).await? {
                return Err(PaymentError::NoActivation.into());
            }

            let now = Utc::now();
            let current = self
                .stores
                .validation
                .find_validation_status(organization_id)
                .await?;
            let (outcome, expected_version) = match &current {
                None => (
                    ValidationWorkflow::open(
                        organization_id,
                        profile.classification.entity_kind,
                        actor.user_id,
                        now,
                    ),
                    None,
                ),
                Some(status) if status.payment.status == PaymentStatus::Declined => (
                    ValidationWorkflow::apply(
                        status,
                        StageTransition::ReopenPayment,
                        actor.user_id,
                        now,
                    )?,
                    Some(status.version),
                ),
                Some(status) => {
                    return Err(PaymentError::AlreadySubmitted(status.payment.status).into());
                }
            };

            let payment = PaymentRecord {
                id: PaymentId::new(),
                organization_id,
                amount: submission.amount.clone(),
                method: submission.method,
                receipt_number: receipt_number.clone(),
                submitted_by: actor.user_id,
                submitted_at: now,
            };

            match self
                .stores
                .validation
                .record_payment(&payment, &outcome.status, expected_version, &outcome.events)
                .await
            {
                Ok(()) => {
                    self.settle_progress(organization_id).await;
                    self.notifier
                        .notify(Notification::PaymentSubmitted {
                            organization_id,
                            payment_id: payment.id,
                            receipt_number: payment.receipt_number.clone(),
                        })
                        .await;
                    return Ok(PaymentReceipt {
                        payment,
                        status: outcome.status,
                        replayed: false,
                    });
                }
                // Lost a race; the next round sees the winner's write.
                Err(StoreError::Conflict(_) | StoreError::Duplicate(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(OnboardingError::Contention(organization_id))
    }

    /// Reads an organization's validation status and readiness.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, `StatusNotFound` before the first
    /// payment, or a store failure.
    pub async fn validation_status(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> OnboardingResult<ValidationStatus> {
        ensure_acts_for(actor, organization_id)?;
        self.load_organization(organization_id).await?;
        self.load_status(organization_id).await
    }

    /// Lists one page of the validation audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, or a store failure.
    pub async fn validation_events(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> OnboardingResult<PageResponse<ValidationEvent>> {
        ensure_acts_for(actor, organization_id)?;
        self.load_organization(organization_id).await?;
        let (items, total) = self
            .stores
            .validation
            .list_validation_events(organization_id, page)
            .await?;
        Ok(PageResponse::for_request(items, page, total))
    }

    /// Moves the payment or document stage to `new_status`. Reviewers only.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `DerivedStage` for the authorization stage,
    /// `UnknownStatus`, `OrganizationNotFound`, `StatusNotFound`,
    /// `InvalidTransition`, `ReasonRequired`, `Contention`, or a store
    /// failure.
    pub async fn set_validation_stage(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        stage: ValidationStage,
        new_status: &str,
        reason: Option<String>,
    ) -> OnboardingResult<TransitionOutcome> {
        ensure_reviewer(actor, "change validation stages")?;
        if stage == ValidationStage::AdminAuthorization {
            return Err(WorkflowError::DerivedStage.into());
        }
        let target =
            StageStatus::parse(stage, new_status).ok_or_else(|| WorkflowError::UnknownStatus {
                stage,
                value: new_status.to_string(),
            })?;
        self.load_organization(organization_id).await?;

        let outcome = self
            .apply_with_retry(organization_id, |status| {
                let transition = ValidationWorkflow::transition_for(status, target, reason.clone())?;
                ValidationWorkflow::apply(status, transition, actor.user_id, Utc::now())
            })
            .await?;

        self.settle_progress(organization_id).await;
        self.notifier
            .notify(Notification::StageChanged {
                organization_id,
                status: target,
                reason,
            })
            .await;
        if outcome.became_ready() {
            self.notifier
                .notify(Notification::AuthorizationReady { organization_id })
                .await;
        }
        Ok(outcome)
    }

    // ========================================================================
    // Administrator provisioning
    // ========================================================================

    /// Creates the organization's administrator and consumes the
    /// authorization gate in one atomic write.
    ///
    /// The initial secret is returned once and handed to the notifier.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `OrganizationNotFound`, `OrganizationInactive`, any
    /// `ProvisioningError`, `Contention`, or a store failure.
    pub async fn create_administrator(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        input: NewAdministrator,
    ) -> OnboardingResult<ProvisionedAdministrator> {
        ensure_acts_for(actor, organization_id)?;

        for _ in 0..MAX_CAS_ATTEMPTS {
            let profile = self.load_active_organization(organization_id).await?;
            let existing = self
                .stores
                .administrators
                .find_active_administrator(organization_id)
                .await?;
            let status = self
                .stores
                .validation
                .find_validation_status(organization_id)
                .await?;
            let expected_version = status.as_ref().map_or(0, |s| s.version);

            let provisioning = AdministratorProvisioner::provision(
                organization_id,
                status.as_ref(),
                existing.as_ref(),
                input.clone(),
                actor.user_id,
                Utc::now(),
            )?;

            match self
                .stores
                .administrators
                .provision_administrator(
                    &provisioning.credential,
                    &provisioning.transition.status,
                    expected_version,
                    &provisioning.transition.events,
                )
                .await
            {
                Ok(()) => {
                    self.settle_progress(organization_id).await;
                    let credential = provisioning.credential;
                    self.notifier
                        .notify(Notification::AdministratorProvisioned {
                            organization_id,
                            organization_name: profile.name,
                            credential_id: credential.id,
                            name: credential.name.clone(),
                            email: credential.email.clone(),
                            initial_secret: provisioning.initial_secret.clone(),
                        })
                        .await;
                    return Ok(ProvisionedAdministrator {
                        credential,
                        initial_secret: provisioning.initial_secret,
                    });
                }
                Err(StoreError::Duplicate(_)) => {
                    return Err(ProvisioningError::AlreadyExists(organization_id).into());
                }
                Err(StoreError::Conflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(OnboardingError::Contention(organization_id))
    }

    /// Updates an active administrator. The authorization gate is not
    /// consulted again.
    ///
    /// # Errors
    ///
    /// `CredentialNotFound`, `Forbidden`, `CredentialInactive`,
    /// `NothingToUpdate`, `InvalidInput`, or a store failure.
    pub async fn update_administrator(
        &self,
        actor: &Actor,
        credential_id: CredentialId,
        update: AdministratorUpdate,
    ) -> OnboardingResult<AdministratorCredential> {
        let credential = self
            .stores
            .administrators
            .find_administrator(credential_id)
            .await?
            .ok_or(ProvisioningError::CredentialNotFound(credential_id))?;
        ensure_acts_for(actor, credential.organization_id)?;

        let updated = AdministratorProvisioner::apply_update(&credential, update, Utc::now())?;
        self.stores
            .administrators
            .update_administrator(&updated)
            .await?;
        Ok(updated)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Loads the status, applies `transition` and swaps it in, reloading and
    /// re-applying when another writer wins.
    pub(super) async fn apply_with_retry<F>(
        &self,
        organization_id: OrganizationId,
        transition: F,
    ) -> OnboardingResult<TransitionOutcome>
    where
        F: Fn(&ValidationStatus) -> Result<TransitionOutcome, WorkflowError> + Send + Sync,
    {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let status = self.load_status(organization_id).await?;
            let outcome = transition(&status)?;
            match self
                .stores
                .validation
                .compare_and_swap(&outcome.status, status.version, &outcome.events)
                .await
            {
                Ok(()) => return Ok(outcome),
                Err(StoreError::Conflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(OnboardingError::Contention(organization_id))
    }

    async fn load_organization(
        &self,
        organization_id: OrganizationId,
    ) -> OnboardingResult<OrganizationProfile> {
        self.stores
            .organizations
            .find_organization(organization_id)
            .await?
            .ok_or(OnboardingError::OrganizationNotFound(organization_id))
    }

    async fn load_active_organization(
        &self,
        organization_id: OrganizationId,
    ) -> OnboardingResult<OrganizationProfile> {
        let profile = self.load_organization(organization_id).await?;
        if !profile.is_active {
            return Err(OnboardingError::OrganizationInactive(organization_id));
        }
        Ok(profile)
    }

    async fn load_status(&self, organization_id: OrganizationId) -> OnboardingResult<ValidationStatus> {
        self.stores
            .validation
            .find_validation_status(organization_id)
            .await?
            .ok_or_else(|| WorkflowError::StatusNotFound(organization_id).into())
    }

    /// Refreshes progress after a committed write.
    ///
    /// The write already stands, so a failure here is dropped and the next
    /// read of the organization repairs the progress fields.
    async fn settle_progress(&self, organization_id: OrganizationId) {
        let _ = self.refresh_progress(organization_id).await;
    }

    /// Recomputes the profile's progress fields from the validation status
    /// and writes them back if they moved.
    async fn refresh_progress(
        &self,
        organization_id: OrganizationId,
    ) -> OnboardingResult<OrganizationProfile> {
        let mut profile = self.load_organization(organization_id).await?;
        let status = self
            .stores
            .validation
            .find_validation_status(organization_id)
            .await?;
        if profile.sync_progress(status.as_ref(), Utc::now()) {
            self.stores.organizations.update_progress(&profile).await?;
        }
        Ok(profile)
    }
}

fn ensure_acts_for(actor: &Actor, organization_id: OrganizationId) -> OnboardingResult<()> {
    if actor.acts_for(organization_id) {
        Ok(())
    } else {
        Err(OnboardingError::Forbidden(format!(
            "caller may not act for organization {organization_id}"
        )))
    }
}

fn catalog_contention() -> OnboardingError {
    StoreError::Conflict("pricing catalog changed on every attempt; retry the request".to_string())
        .into()
}

fn ensure_reviewer(actor: &Actor, action: &str) -> OnboardingResult<()> {
    if actor.role.can_review() {
        Ok(())
    } else {
        Err(OnboardingError::Forbidden(format!("only reviewers may {action}")))
    }
}
