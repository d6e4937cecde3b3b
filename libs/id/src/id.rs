//! The Village ID: a 64-bit hierarchical identifier.
//!
//! The three-variant enum makes the classification partition structural:
//! a `VillageId` is exactly one of tenant, organization, or item, and the
//! impossible bit patterns (zero tenant, item without an organization)
//! cannot be represented. [`VillageId::parse`] and [`VillageId::from_bits`]
//! reject them at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::IdError;
use crate::segment::{ItemSegment, OrgSegment, TenantSegment};

/// The hierarchy level a Village ID names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A tenant-level ID: org and item segments are zero.
    Tenant,
    /// An organization-level ID: non-zero org segment, zero item segment.
    Organization,
    /// An item-level ID: all three segments non-zero.
    Item,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Tenant => "tenant",
            Kind::Organization => "organization",
            Kind::Item => "item",
        };
        f.write_str(s)
    }
}

/// A Village ID.
///
/// Canonically serialized as 18 characters, `TTTT-OOOO-IIIIIIII`, with
/// absent segments written as zeros. The variant is the classification:
/// which segments are present determines the kind, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VillageId {
    /// A tenant root, e.g. `a1b2-0000-00000000`.
    Tenant { tenant: TenantSegment },
    /// An organization under a tenant, e.g. `a1b2-c3d4-00000000`.
    Organization {
        tenant: TenantSegment,
        org: OrgSegment,
    },
    /// A trackable item under an organization, e.g. `a1b2-c3d4-e5f67890`.
    Item {
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    },
}

impl VillageId {
    /// Length of the canonical string encoding.
    pub const ENCODED_LEN: usize = 18;

    /// Builds a tenant-level ID.
    ///
    /// Infallible: segments are non-zero by type, so every combination
    /// the typed constructors accept is a valid ID.
    #[must_use]
    pub const fn tenant(tenant: TenantSegment) -> Self {
        VillageId::Tenant { tenant }
    }

    /// Builds an organization-level ID.
    #[must_use]
    pub const fn organization(tenant: TenantSegment, org: OrgSegment) -> Self {
        VillageId::Organization { tenant, org }
    }

    /// Builds an item-level ID.
    #[must_use]
    pub const fn item(tenant: TenantSegment, org: OrgSegment, item: ItemSegment) -> Self {
        VillageId::Item { tenant, org, item }
    }

    /// Builds an ID from raw segment values, rejecting impossible
    /// combinations.
    ///
    /// Zero means "absent" per segment: `(t, 0, 0)` is a tenant ID,
    /// `(t, o, 0)` an organization ID, `(t, o, i)` an item ID. A zero
    /// tenant is always an error, as is a non-zero item under a zero org.
    pub fn from_parts(tenant: u16, org: u16, item: u32) -> Result<Self, IdError> {
        let tenant = TenantSegment::from_raw(tenant).ok_or(IdError::ZeroTenant)?;
        match (OrgSegment::from_raw(org), ItemSegment::from_raw(item)) {
            (None, None) => Ok(VillageId::Tenant { tenant }),
            (Some(org), None) => Ok(VillageId::Organization { tenant, org }),
            (Some(org), Some(item)) => Ok(VillageId::Item { tenant, org, item }),
            (None, Some(_)) => Err(IdError::OrphanItem),
        }
    }

    /// Parses the canonical 18-character form.
    ///
    /// Dashes must sit at positions 4 and 9; the other 16 characters must
    /// be hex digits (either case). Shape errors are reported before the
    /// segment-level checks in [`VillageId::from_parts`].
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.len() != Self::ENCODED_LEN {
            return Err(IdError::InvalidLength { actual: s.len() });
        }

        for (i, b) in s.bytes().enumerate() {
            match i {
                4 | 9 => {
                    if b != b'-' {
                        return Err(IdError::MissingDash { position: i });
                    }
                }
                _ => {
                    if !b.is_ascii_hexdigit() {
                        return Err(IdError::InvalidHex {
                            segment: segment_name(i),
                        });
                    }
                }
            }
        }

        // The scan above guarantees all-ASCII input, so byte-range
        // slicing cannot split a character.
        let tenant = u16::from_str_radix(&s[0..4], 16)
            .map_err(|_| IdError::InvalidHex { segment: "tenant" })?;
        let org = u16::from_str_radix(&s[5..9], 16)
            .map_err(|_| IdError::InvalidHex { segment: "organization" })?;
        let item = u32::from_str_radix(&s[10..18], 16)
            .map_err(|_| IdError::InvalidHex { segment: "item" })?;

        Self::from_parts(tenant, org, item)
    }

    /// Returns the hierarchy level of this ID.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            VillageId::Tenant { .. } => Kind::Tenant,
            VillageId::Organization { .. } => Kind::Organization,
            VillageId::Item { .. } => Kind::Item,
        }
    }

    /// Returns the tenant segment. Present in every valid ID.
    #[must_use]
    pub const fn tenant_segment(&self) -> TenantSegment {
        match self {
            VillageId::Tenant { tenant }
            | VillageId::Organization { tenant, .. }
            | VillageId::Item { tenant, .. } => *tenant,
        }
    }

    /// Returns the organization segment, if this ID is scoped to one.
    #[must_use]
    pub const fn org_segment(&self) -> Option<OrgSegment> {
        match self {
            VillageId::Tenant { .. } => None,
            VillageId::Organization { org, .. } | VillageId::Item { org, .. } => Some(*org),
        }
    }

    /// Returns the item segment, if this is an item-level ID.
    #[must_use]
    pub const fn item_segment(&self) -> Option<ItemSegment> {
        match self {
            VillageId::Tenant { .. } | VillageId::Organization { .. } => None,
            VillageId::Item { item, .. } => Some(*item),
        }
    }

    /// Packs the ID into its 64-bit form: tenant in the top 16 bits, org
    /// in the next 16, item in the low 32.
    #[must_use]
    pub fn to_bits(&self) -> u64 {
        let tenant = u64::from(self.tenant_segment().get());
        let org = self.org_segment().map_or(0, |s| u64::from(s.get()));
        let item = self.item_segment().map_or(0, |s| u64::from(s.get()));
        (tenant << 48) | (org << 32) | item
    }

    /// Unpacks a 64-bit value, rejecting impossible bit patterns.
    pub fn from_bits(bits: u64) -> Result<Self, IdError> {
        Self::from_parts((bits >> 48) as u16, (bits >> 32) as u16, bits as u32)
    }
}

const fn segment_name(index: usize) -> &'static str {
    match index {
        0..=3 => "tenant",
        5..=8 => "organization",
        _ => "item",
    }
}

impl std::fmt::Display for VillageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VillageId::Tenant { tenant } => write!(f, "{tenant}-0000-00000000"),
            VillageId::Organization { tenant, org } => write!(f, "{tenant}-{org}-00000000"),
            VillageId::Item { tenant, org, item } => write!(f, "{tenant}-{org}-{item}"),
        }
    }
}

impl std::str::FromStr for VillageId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VillageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VillageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
