//! # village-id
//!
//! The Village ID type: parsing, classification, and canonical encoding for
//! the village platform.
//!
//! ## Design Principles
//!
//! - Every trackable record gets exactly one Village ID at creation; IDs are
//!   immutable and never reused
//! - The ID alone tells you its hierarchy level (tenant, organization, or
//!   item) without consulting storage
//! - Strict parsing with a canonical string representation; parse → format →
//!   parse round-trips byte-for-byte
//! - Impossible IDs (zero tenant, item without an organization) are rejected
//!   at construction, so every `VillageId` value is classifiable
//!
//! ## ID Format
//!
//! A Village ID is a 64-bit value serialized as 18 ASCII characters:
//! `TTTT-OOOO-IIIIIIII`, with dashes fixed at positions 4 and 9 and the
//! remaining 16 characters hexadecimal (case-insensitive on input,
//! lowercase on output).
//!
//! - `TTTT` — 16-bit tenant segment, non-zero for every valid ID
//! - `OOOO` — 16-bit organization segment, zero only for tenant-level IDs
//! - `IIIIIIII` — 32-bit item segment, zero for tenant- and org-level IDs
//!
//! Examples:
//! - `a1b2-0000-00000000` — a tenant
//! - `a1b2-c3d4-00000000` — an organization under tenant `a1b2`
//! - `a1b2-c3d4-e5f67890` — an item under that organization
//!
//! Segment values are randomized at assignment, so IDs are not enumerable
//! and carry no ordering or timestamp information.

mod error;
mod id;
mod segment;

pub use error::IdError;
pub use id::{Kind, VillageId};
pub use segment::{ItemSegment, OrgSegment, TenantSegment};
