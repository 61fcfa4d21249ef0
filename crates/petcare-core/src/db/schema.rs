//! SQLite schema definition.

/// Complete database schema for petcare.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Accounts (vets and pet owners)
-- ============================================================================

CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL CHECK (kind IN ('VET', 'OWNER')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Bearer tokens, stored as SHA-256 hex digests only
CREATE TABLE IF NOT EXISTS api_tokens (
    token_hash TEXT PRIMARY KEY,
    account_id TEXT NOT NULL REFERENCES accounts(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_api_tokens_account ON api_tokens(account_id);

-- ============================================================================
-- Clinics and Membership
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT,
    phone TEXT,
    personal INTEGER NOT NULL DEFAULT 0,          -- auto-provisioned for a solo vet
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS clinic_members (
    id TEXT PRIMARY KEY,
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    vet_id TEXT NOT NULL REFERENCES accounts(id),
    role TEXT NOT NULL CHECK (role IN ('OWNER', 'ADMIN', 'VET')),
    status TEXT NOT NULL CHECK (status IN ('ACTIVE', 'INVITED', 'INACTIVE')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (clinic_id, vet_id)
);

CREATE INDEX IF NOT EXISTS idx_clinic_members_vet ON clinic_members(vet_id);

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES accounts(id),
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id);

-- ============================================================================
-- Appointments (never hard-deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    vet_id TEXT REFERENCES accounts(id),         -- NULL for unassigned requests
    pet_id TEXT NOT NULL REFERENCES pets(id),
    starts_at TEXT NOT NULL,
    ends_at TEXT NOT NULL,
    reason TEXT,
    notes TEXT,
    status TEXT NOT NULL CHECK (status IN (
        'PENDING_APPROVAL', 'CONFIRMED', 'COMPLETED', 'CANCELLED', 'NO_SHOW'
    )),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (starts_at < ends_at)
);

CREATE INDEX IF NOT EXISTS idx_appointments_vet ON appointments(vet_id, starts_at);
CREATE INDEX IF NOT EXISTS idx_appointments_clinic ON appointments(clinic_id, starts_at);
CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id);

-- No two schedule-occupying appointments of one vet in one clinic may overlap.
-- Half-open intervals: back-to-back bookings are allowed.
CREATE TRIGGER IF NOT EXISTS appointments_no_overlap_insert BEFORE INSERT ON appointments
WHEN new.vet_id IS NOT NULL AND new.status NOT IN ('CANCELLED', 'NO_SHOW')
BEGIN
    SELECT RAISE(ABORT, 'appointment overlaps an existing booking')
    WHERE EXISTS (
        SELECT 1 FROM appointments a
        WHERE a.vet_id = new.vet_id
          AND a.clinic_id = new.clinic_id
          AND a.status NOT IN ('CANCELLED', 'NO_SHOW')
          AND a.starts_at < new.ends_at
          AND a.ends_at > new.starts_at
    );
END;

CREATE TRIGGER IF NOT EXISTS appointments_no_overlap_update
BEFORE UPDATE OF vet_id, clinic_id, starts_at, ends_at, status ON appointments
WHEN new.vet_id IS NOT NULL AND new.status NOT IN ('CANCELLED', 'NO_SHOW')
BEGIN
    SELECT RAISE(ABORT, 'appointment overlaps an existing booking')
    WHERE EXISTS (
        SELECT 1 FROM appointments a
        WHERE a.id != new.id
          AND a.vet_id = new.vet_id
          AND a.clinic_id = new.clinic_id
          AND a.status NOT IN ('CANCELLED', 'NO_SHOW')
          AND a.starts_at < new.ends_at
          AND a.ends_at > new.starts_at
    );
END;
"#;
