//! Administrator provisioning.
//!
//! Exactly one active administrator credential per organization, created
//! only once validation reports the authorization gate open.

pub mod error;
pub mod provisioner;
pub mod types;

pub use error::ProvisioningError;
pub use provisioner::{AdministratorProvisioner, Provisioning};
pub use types::{
    AdministratorCredential, AdministratorUpdate, InitialSecret, NewAdministrator,
    ProvisionedAdministrator,
};
