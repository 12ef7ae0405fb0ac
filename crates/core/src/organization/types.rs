//! Organization profile types.

use chrono::{DateTime, Utc};
use garde::Validate;
use orgdesk_shared::types::OrganizationId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricing::{EngagementModel, MembershipStatus};
use crate::validation::{AuthorizationStatus, DocumentStatus, PaymentStatus, ValidationStatus};

/// ISO 3166-1 country code (alpha-2 or alpha-3), stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses and normalizes a country code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is two or three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, String> {
        let code = code.trim();
        if (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(format!("Invalid country code: {code}"))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commercial organizations skip document validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// For-profit entity.
    Commercial,
    /// Trusts, societies and other non-profits. Documents are reviewed.
    NonCommercial,
}

impl EntityKind {
    /// Returns true if registration documents must be validated.
    #[must_use]
    pub const fn requires_document_validation(&self) -> bool {
        matches!(self, Self::NonCommercial)
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::NonCommercial => "non_commercial",
        }
    }
}

/// Attributes pricing is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrganizationClassification {
    /// Country of registration.
    #[garde(skip)]
    pub country: CountryCode,
    /// Organization type, e.g. "MSME".
    #[garde(length(min = 1, max = 100))]
    pub organization_type: String,
    /// Entity type, e.g. "Private Limited".
    #[garde(length(min = 1, max = 100))]
    pub entity_type: String,
    /// Commercial or non-commercial.
    #[garde(skip)]
    pub entity_kind: EntityKind,
    /// Industry segment, informational.
    #[garde(length(max = 100))]
    pub industry_segment: Option<String>,
}

/// Primary contact of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    /// Contact person.
    #[garde(length(min = 1, max = 200))]
    pub contact_name: String,
    /// Contact email.
    #[garde(email)]
    pub email: String,
    /// Phone number.
    #[garde(length(min = 5, max = 30))]
    pub phone: Option<String>,
    /// Postal address.
    #[garde(length(max = 500))]
    pub address: Option<String>,
}

/// Registration approval status shown to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting validation.
    Pending,
    /// Administrator authorized.
    Approved,
    /// Payment declined or documents invalid.
    Declined,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }
}

/// Onboarding step the organization has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    /// Registered, nothing selected yet.
    Registered,
    /// Engagement model applied to the profile.
    EngagementSelected,
    /// Payment submitted, validation running.
    UnderValidation,
    /// Administrator provisioned.
    AdministratorCreated,
}

impl WorkflowStep {
    /// Returns the string representation of the step.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::EngagementSelected => "engagement_selected",
            Self::UnderValidation => "under_validation",
            Self::AdministratorCreated => "administrator_created",
        }
    }
}

/// A registered organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Organization id.
    pub id: OrganizationId,
    /// Legal name.
    pub name: String,
    /// Pricing classification.
    pub classification: OrganizationClassification,
    /// Primary contact.
    pub contact: ContactInfo,
    /// Approval status.
    pub approval_status: ApprovalStatus,
    /// Membership status currently on the profile.
    pub membership_status: MembershipStatus,
    /// Pricing tier label chosen with the engagement.
    pub pricing_tier: Option<String>,
    /// Engagement model applied to the profile.
    pub engagement_model: Option<EngagementModel>,
    /// Onboarding step.
    pub workflow_step: WorkflowStep,
    /// True once an administrator exists.
    pub is_completed: bool,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl OrganizationProfile {
    /// Recomputes the progress fields from the validation status.
    ///
    /// Returns true if anything changed.
    pub fn sync_progress(
        &mut self,
        validation: Option<&ValidationStatus>,
        now: DateTime<Utc>,
    ) -> bool {
        let (step, approval, completed) = derive_progress(self.engagement_model, validation);
        let changed = step != self.workflow_step
            || approval != self.approval_status
            || completed != self.is_completed;
        if changed {
            self.workflow_step = step;
            self.approval_status = approval;
            self.is_completed = completed;
            self.updated_at = now;
        }
        changed
    }
}

/// Derives (step, approval status, completion) from the engagement applied to
/// the profile and the validation status.
#[must_use]
pub fn derive_progress(
    engagement_model: Option<EngagementModel>,
    validation: Option<&ValidationStatus>,
) -> (WorkflowStep, ApprovalStatus, bool) {
    let Some(status) = validation else {
        let step = if engagement_model.is_some() {
            WorkflowStep::EngagementSelected
        } else {
            WorkflowStep::Registered
        };
        return (step, ApprovalStatus::Pending, false);
    };

    if status.authorization.status == AuthorizationStatus::Authorized {
        return (WorkflowStep::AdministratorCreated, ApprovalStatus::Approved, true);
    }
    let declined = status.payment.status == PaymentStatus::Declined
        || status.document.status == DocumentStatus::Invalid;
    let approval = if declined {
        ApprovalStatus::Declined
    } else {
        ApprovalStatus::Pending
    };
    (WorkflowStep::UnderValidation, approval, false)
}

/// Registration input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrganization {
    /// Legal name.
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    /// Pricing classification.
    #[garde(dive)]
    pub classification: OrganizationClassification,
    /// Primary contact.
    #[garde(dive)]
    pub contact: ContactInfo,
    /// Membership status at registration.
    #[garde(skip)]
    pub membership_status: MembershipStatus,
}

impl NewOrganization {
    /// Builds the stored profile.
    #[must_use]
    pub fn into_profile(self, now: DateTime<Utc>) -> OrganizationProfile {
        OrganizationProfile {
            id: OrganizationId::new(),
            name: self.name.trim().to_string(),
            classification: self.classification,
            contact: self.contact,
            approval_status: ApprovalStatus::Pending,
            membership_status: self.membership_status,
            pricing_tier: None,
            engagement_model: None,
            workflow_step: WorkflowStep::Registered,
            is_completed: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationWorkflow;
    use fake::Fake;
    use fake::faker::company::en::CompanyName;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use orgdesk_shared::types::UserId;

    fn new_org(kind: EntityKind) -> NewOrganization {
        NewOrganization {
            name: CompanyName().fake(),
            classification: OrganizationClassification {
                country: CountryCode::parse("IN").unwrap(),
                organization_type: "MSME".to_string(),
                entity_type: "Trust".to_string(),
                entity_kind: kind,
                industry_segment: Some("Healthcare".to_string()),
            },
            contact: ContactInfo {
                contact_name: Name().fake(),
                email: SafeEmail().fake(),
                phone: None,
                address: None,
            },
            membership_status: MembershipStatus::Member,
        }
    }

    #[test]
    fn test_country_code_parse() {
        assert_eq!(CountryCode::parse(" in ").unwrap().as_str(), "IN");
        assert_eq!(CountryCode::parse("ind").unwrap().as_str(), "IND");
        assert!(CountryCode::parse("I").is_err());
        assert!(CountryCode::parse("I1").is_err());
    }

    #[test]
    fn test_new_organization_validates() {
        let input = new_org(EntityKind::Commercial);
        assert!(input.validate().is_ok());

        let mut bad_email = new_org(EntityKind::Commercial);
        bad_email.contact.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut blank_name = new_org(EntityKind::Commercial);
        blank_name.name = String::new();
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_into_profile_defaults() {
        let profile = new_org(EntityKind::NonCommercial).into_profile(Utc::now());
        assert!(profile.is_active);
        assert!(!profile.is_completed);
        assert_eq!(profile.workflow_step, WorkflowStep::Registered);
        assert_eq!(profile.approval_status, ApprovalStatus::Pending);
        assert!(profile.engagement_model.is_none());
    }

    #[test]
    fn test_sync_progress_follows_validation() {
        let now = Utc::now();
        let mut profile = new_org(EntityKind::Commercial).into_profile(now);
        assert!(!profile.sync_progress(None, now));

        profile.engagement_model = Some(EngagementModel::MarketPlace);
        assert!(profile.sync_progress(None, now));
        assert_eq!(profile.workflow_step, WorkflowStep::EngagementSelected);

        let status =
            ValidationWorkflow::open(profile.id, EntityKind::Commercial, UserId::new(), now).status;
        assert!(profile.sync_progress(Some(&status), now));
        assert_eq!(profile.workflow_step, WorkflowStep::UnderValidation);
        assert_eq!(profile.approval_status, ApprovalStatus::Pending);
    }
}
