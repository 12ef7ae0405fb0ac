//! Engagement pricing: the catalog, the resolver and catalog caching.
//!
//! # Modules
//!
//! - `types` - Catalog records and selection enums
//! - `catalog` - Versioned catalog snapshot and candidate lookup
//! - `resolver` - Record selection, discounting and rounding
//! - `cache` - TTL cache for catalog snapshots
//! - `error` - Catalog write errors

pub mod cache;
pub mod catalog;
pub mod error;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod resolver_props;

pub use cache::CatalogCache;
pub use catalog::{PricingCatalog, PricingQuery};
pub use error::PricingError;
pub use resolver::{
    MembershipFeeResolution, NotFoundReason, PriceResolution, PricingResolver,
    ResolvedMembershipFee, ResolvedPrice,
};
pub use types::{
    BillingFrequency, CountryScope, EngagementModel, FrequencyFees, MembershipFeeRecord,
    MembershipFees, MembershipStatus, MembershipTerm, NewMembershipFee, NewPricingConfig,
    PricingConfigRecord, PricingScope, PricingUnit,
};
