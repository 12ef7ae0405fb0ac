//! Registered organizations and their classification.

pub mod types;

pub use types::{
    ApprovalStatus, ContactInfo, CountryCode, EntityKind, NewOrganization,
    OrganizationClassification, OrganizationProfile, WorkflowStep, derive_progress,
};
