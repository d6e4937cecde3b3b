//! The registry contract between the ID core and persistence.
//!
//! The registry owns schema, transactions, and retention policy. This
//! crate only requires two capabilities from it: atomically claiming a
//! segment value within its scope, and looking records back up by their
//! segment tuple.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use village_id::{ItemSegment, OrgSegment, TenantSegment, VillageId};

use crate::error::RegistryError;

/// A stored tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// The tenant's Village ID.
    pub id: VillageId,

    /// Display name.
    pub name: String,
}

/// A stored organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRecord {
    /// The organization's Village ID.
    pub id: VillageId,

    /// Display name.
    pub name: String,
}

/// A stored item, with the concrete type discovered during lookup.
///
/// Items are heterogeneous: the same ID space covers servers, networks,
/// software, identities. The `type_tag` names which concrete store the
/// record came from; `payload` is that store's own representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// The item's Village ID.
    pub id: VillageId,

    /// Which concrete item store this record lives in, e.g. `"entity"`
    /// or `"resource"`.
    pub type_tag: String,

    /// The store's record, as reported by its probe.
    pub payload: serde_json::Value,
}

/// The persistence collaborator for Village IDs.
///
/// `reserve_*` must be atomic: return `true` only if the calling attempt
/// newly claimed the value. Two concurrent reservations of the same value
/// must not both see `true`. Backends typically implement this with a
/// unique constraint on the segment-scoped key; implementations whose
/// reservation is merely advisory must still carry that constraint on the
/// final insert, and callers must treat a generated ID as a candidate
/// that can lose the insert race (regenerate and retry on duplicate).
///
/// `lookup_*` return `Ok(None)` for absent records; `Err` is reserved for
/// backend failures.
#[async_trait]
pub trait ItemRegistry: Send + Sync {
    /// Atomically claims a tenant segment value.
    async fn reserve_tenant(&self, tenant: TenantSegment) -> Result<bool, RegistryError>;

    /// Atomically claims an org segment value within a tenant.
    async fn reserve_org(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
    ) -> Result<bool, RegistryError>;

    /// Atomically claims an item segment value within an organization.
    async fn reserve_item(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<bool, RegistryError>;

    /// Looks up a tenant by its segment value.
    async fn lookup_tenant(
        &self,
        tenant: TenantSegment,
    ) -> Result<Option<TenantRecord>, RegistryError>;

    /// Looks up an organization by its (tenant, org) segment pair.
    async fn lookup_org(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
    ) -> Result<Option<OrgRecord>, RegistryError>;

    /// Looks up an item by its full segment triple.
    ///
    /// Item IDs carry no type information, so the registry probes its
    /// concrete item stores for the triple and returns the first match
    /// together with the discovered type tag.
    async fn lookup_item(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<Option<ItemRecord>, RegistryError>;
}

/// One concrete item store the registry can probe for an item triple.
///
/// Registries that split items across per-type tables implement one probe
/// per table and try them in a fixed order; the first hit wins. This is
/// the mechanism behind type-agnostic resolution: the caller hands over a
/// bare ID, the probes discover what it names.
#[async_trait]
pub trait ItemProbe: Send + Sync {
    /// The type tag this probe reports for its hits.
    fn type_tag(&self) -> &str;

    /// Fetches this store's record for the triple, if present.
    async fn fetch(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<Option<serde_json::Value>, RegistryError>;
}

/// Probes stores in order and returns the first hit as an [`ItemRecord`].
///
/// Short-circuits on the first store that reports the triple; absence in
/// every store is `Ok(None)`.
pub(crate) async fn probe_item(
    probes: &[std::sync::Arc<dyn ItemProbe>],
    tenant: TenantSegment,
    org: OrgSegment,
    item: ItemSegment,
) -> Result<Option<ItemRecord>, RegistryError> {
    for probe in probes {
        if let Some(payload) = probe.fetch(tenant, org, item).await? {
            return Ok(Some(ItemRecord {
                id: VillageId::item(tenant, org, item),
                type_tag: probe.type_tag().to_string(),
                payload,
            }));
        }
    }
    Ok(None)
}
