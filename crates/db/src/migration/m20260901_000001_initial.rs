//! Initial database migration.
//!
//! Creates the enums, tables and indexes backing organizations, the pricing
//! catalog, activations, payments, validation and administrators.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ORGANIZATIONS
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;

        // ============================================================
        // PART 3: PRICING CATALOG
        // ============================================================
        db.execute_unprepared(PRICING_CONFIGS_SQL).await?;
        db.execute_unprepared(MEMBERSHIP_FEES_SQL).await?;

        // ============================================================
        // PART 4: ACTIVATIONS & PAYMENTS
        // ============================================================
        db.execute_unprepared(ENGAGEMENT_ACTIVATIONS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 5: VALIDATION
        // ============================================================
        db.execute_unprepared(VALIDATION_STATUSES_SQL).await?;
        db.execute_unprepared(VALIDATION_EVENTS_SQL).await?;

        // ============================================================
        // PART 6: ADMINISTRATORS
        // ============================================================
        db.execute_unprepared(ADMINISTRATORS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE engagement_model AS ENUM ('market_place', 'platform_as_a_service');
CREATE TYPE membership_status AS ENUM ('member', 'not_a_member');
CREATE TYPE billing_frequency AS ENUM ('quarterly', 'half_yearly', 'annual');
CREATE TYPE pricing_unit_kind AS ENUM ('percentage', 'fixed_amount');
CREATE TYPE entity_kind AS ENUM ('commercial', 'non_commercial');
CREATE TYPE approval_status AS ENUM ('pending', 'approved', 'declined');
CREATE TYPE workflow_step AS ENUM (
    'registered', 'engagement_selected', 'under_validation', 'administrator_created'
);
CREATE TYPE payment_method AS ENUM ('bank_transfer', 'card', 'upi', 'cheque', 'cash');
CREATE TYPE payment_status AS ENUM ('pending', 'approved', 'declined');
CREATE TYPE document_status AS ENUM ('pending', 'valid', 'invalid', 'not_applicable');
CREATE TYPE authorization_status AS ENUM ('not_ready', 'ready', 'authorized');
CREATE TYPE validation_stage AS ENUM ('payment', 'document', 'admin_authorization');
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id                  UUID PRIMARY KEY,
    name                VARCHAR(255) NOT NULL,
    country             VARCHAR(3) NOT NULL,
    organization_type   VARCHAR(100) NOT NULL,
    entity_type         VARCHAR(100) NOT NULL,
    entity_kind         entity_kind NOT NULL,
    industry_segment    VARCHAR(100),
    contact_name        VARCHAR(200) NOT NULL,
    contact_email       VARCHAR(255) NOT NULL,
    contact_phone       VARCHAR(30),
    contact_address     VARCHAR(500),
    approval_status     approval_status NOT NULL DEFAULT 'pending',
    membership_status   membership_status NOT NULL,
    pricing_tier        VARCHAR(100),
    engagement_model    engagement_model,
    workflow_step       workflow_step NOT NULL DEFAULT 'registered',
    is_completed        BOOLEAN NOT NULL DEFAULT false,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_organizations_country ON organizations(country);
";

const PRICING_CONFIGS_SQL: &str = r"
CREATE TABLE pricing_configs (
    id                  UUID PRIMARY KEY,
    country             VARCHAR(10) NOT NULL,
    organization_type   VARCHAR(100) NOT NULL,
    entity_type         VARCHAR(100) NOT NULL,
    engagement_model    engagement_model NOT NULL,
    membership_status   membership_status NOT NULL,
    unit_kind           pricing_unit_kind NOT NULL,
    unit_value          NUMERIC(19, 4) NOT NULL CHECK (unit_value >= 0),
    discount_percentage NUMERIC(5, 2) CHECK (discount_percentage BETWEEN 0 AND 100),
    quarterly_fee       NUMERIC(19, 4) CHECK (quarterly_fee >= 0),
    half_yearly_fee     NUMERIC(19, 4) CHECK (half_yearly_fee >= 0),
    annual_fee          NUMERIC(19, 4) CHECK (annual_fee >= 0),
    currency            VARCHAR(3) NOT NULL,
    effective_from      TIMESTAMPTZ NOT NULL,
    effective_to        TIMESTAMPTZ,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_pricing_window CHECK (effective_to IS NULL OR effective_to >= effective_from)
);

CREATE INDEX idx_pricing_configs_lookup ON pricing_configs(
    country, engagement_model, membership_status
);
CREATE INDEX idx_pricing_configs_order ON pricing_configs(created_at, id);
";

const MEMBERSHIP_FEES_SQL: &str = r"
CREATE TABLE membership_fees (
    id                  UUID PRIMARY KEY,
    country             VARCHAR(10) NOT NULL,
    organization_type   VARCHAR(100) NOT NULL,
    entity_type         VARCHAR(100) NOT NULL,
    monthly_fee         NUMERIC(19, 4) CHECK (monthly_fee >= 0),
    quarterly_fee       NUMERIC(19, 4) CHECK (quarterly_fee >= 0),
    half_yearly_fee     NUMERIC(19, 4) CHECK (half_yearly_fee >= 0),
    annual_fee          NUMERIC(19, 4) CHECK (annual_fee >= 0),
    currency            VARCHAR(3) NOT NULL,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_membership_fees_order ON membership_fees(created_at, id);
";

const ENGAGEMENT_ACTIVATIONS_SQL: &str = r"
CREATE TABLE engagement_activations (
    id                  UUID PRIMARY KEY,
    organization_id     UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    engagement_model    engagement_model NOT NULL,
    membership_status   membership_status NOT NULL,
    billing_frequency   billing_frequency,
    unit_kind           pricing_unit_kind NOT NULL,
    original_value      NUMERIC(19, 4) NOT NULL,
    discount_percentage NUMERIC(5, 2),
    final_value         NUMERIC(19, 4) NOT NULL,
    currency            VARCHAR(3) NOT NULL,
    pricing_config_id   UUID NOT NULL REFERENCES pricing_configs(id),
    terms_accepted      BOOLEAN NOT NULL CHECK (terms_accepted),
    activated_by        UUID NOT NULL,
    idempotency_key     VARCHAR(128),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_activation_idempotency UNIQUE (organization_id, idempotency_key)
);

CREATE INDEX idx_activations_org ON engagement_activations(organization_id, created_at);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id                  UUID PRIMARY KEY,
    organization_id     UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    amount              NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    currency            VARCHAR(3) NOT NULL,
    method              payment_method NOT NULL,
    receipt_number      VARCHAR(64) NOT NULL,
    submitted_by        UUID NOT NULL,
    submitted_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_payment_receipt UNIQUE (organization_id, receipt_number)
);
";

const VALIDATION_STATUSES_SQL: &str = r"
CREATE TABLE validation_statuses (
    organization_id          UUID PRIMARY KEY REFERENCES organizations(id) ON DELETE CASCADE,
    payment_status           payment_status NOT NULL,
    payment_reason           TEXT,
    payment_actor            UUID,
    payment_updated_at       TIMESTAMPTZ NOT NULL,
    document_status          document_status NOT NULL,
    document_reason          TEXT,
    document_actor           UUID,
    document_updated_at      TIMESTAMPTZ NOT NULL,
    authorization_status     authorization_status NOT NULL,
    authorization_reason     TEXT,
    authorization_actor      UUID,
    authorization_updated_at TIMESTAMPTZ NOT NULL,
    version                  BIGINT NOT NULL CHECK (version > 0),
    created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at               TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const VALIDATION_EVENTS_SQL: &str = r"
CREATE TABLE validation_events (
    id                  UUID PRIMARY KEY,
    seq                 BIGSERIAL NOT NULL,
    organization_id     UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    stage               validation_stage NOT NULL,
    from_status         VARCHAR(32),
    to_status           VARCHAR(32) NOT NULL,
    reason              TEXT,
    actor               UUID,
    version             BIGINT NOT NULL,
    occurred_at         TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_validation_events_org ON validation_events(organization_id, seq);
";

const ADMINISTRATORS_SQL: &str = r"
CREATE TABLE administrators (
    id                  UUID PRIMARY KEY,
    organization_id     UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name                VARCHAR(200) NOT NULL,
    email               VARCHAR(255) NOT NULL,
    contact             VARCHAR(30),
    secret_hash         TEXT NOT NULL,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one active administrator per organization.
CREATE UNIQUE INDEX uq_administrators_active_org
    ON administrators(organization_id) WHERE is_active;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS administrators CASCADE;
DROP TABLE IF EXISTS validation_events CASCADE;
DROP TABLE IF EXISTS validation_statuses CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS engagement_activations CASCADE;
DROP TABLE IF EXISTS membership_fees CASCADE;
DROP TABLE IF EXISTS pricing_configs CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;

DROP TYPE IF EXISTS validation_stage CASCADE;
DROP TYPE IF EXISTS authorization_status CASCADE;
DROP TYPE IF EXISTS document_status CASCADE;
DROP TYPE IF EXISTS payment_status CASCADE;
DROP TYPE IF EXISTS payment_method CASCADE;
DROP TYPE IF EXISTS workflow_step CASCADE;
DROP TYPE IF EXISTS approval_status CASCADE;
DROP TYPE IF EXISTS entity_kind CASCADE;
DROP TYPE IF EXISTS pricing_unit_kind CASCADE;
DROP TYPE IF EXISTS billing_frequency CASCADE;
DROP TYPE IF EXISTS membership_status CASCADE;
DROP TYPE IF EXISTS engagement_model CASCADE;
";
