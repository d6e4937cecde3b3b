//! Type-agnostic resolution of Village IDs.
//!
//! The defining property of the ID scheme: any consumer can hand over a
//! bare ID and learn what it names. Classification comes from the ID
//! itself; the registry supplies the record. Callers never declare an
//! expected type, and a miss reveals nothing beyond "no record at this
//! ID".

use serde::{Deserialize, Serialize};
use tracing::debug;
use village_id::{Kind, VillageId};

use crate::error::{RegistryError, ResolveError};
use crate::registry::{ItemRecord, ItemRegistry, OrgRecord, TenantRecord};

/// A record discovered for a Village ID, tagged with its kind.
///
/// Serializes with a `kind` discriminator alongside the record fields, so
/// an HTTP layer can return it as a JSON body unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolved {
    /// The ID names a tenant.
    Tenant(TenantRecord),
    /// The ID names an organization.
    Organization(OrgRecord),
    /// The ID names an item; `type_tag` carries the discovered type.
    Item(ItemRecord),
}

impl Resolved {
    /// The resolved record's Village ID.
    #[must_use]
    pub fn id(&self) -> VillageId {
        match self {
            Resolved::Tenant(record) => record.id,
            Resolved::Organization(record) => record.id,
            Resolved::Item(record) => record.id,
        }
    }

    /// The resolved record's kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Resolved::Tenant(_) => Kind::Tenant,
            Resolved::Organization(_) => Kind::Organization,
            Resolved::Item(_) => Kind::Item,
        }
    }
}

/// Resolves a Village ID to its record.
///
/// Dispatches on the ID's kind to the matching registry lookup. A missing
/// record is `Ok(None)` — an ordinary outcome (deleted, never existed, or
/// wrong tenant), not an error, and it is never retried here: callers
/// needing read-after-write consistency retry at a layer that knows the
/// registry's consistency model.
pub async fn resolve(
    id: VillageId,
    registry: &dyn ItemRegistry,
) -> Result<Option<Resolved>, RegistryError> {
    let resolved = match id {
        VillageId::Tenant { tenant } => registry
            .lookup_tenant(tenant)
            .await?
            .map(Resolved::Tenant),
        VillageId::Organization { tenant, org } => registry
            .lookup_org(tenant, org)
            .await?
            .map(Resolved::Organization),
        VillageId::Item { tenant, org, item } => registry
            .lookup_item(tenant, org, item)
            .await?
            .map(Resolved::Item),
    };

    if resolved.is_none() {
        debug!(%id, kind = %id.kind(), "no record for village ID");
    }
    Ok(resolved)
}

/// Parses an opaque ID string and resolves it.
///
/// The entry point for `/id/{village_id}`-style lookups: the caller holds
/// only a string of unknown provenance. Parse failures map to
/// [`ResolveError::Id`] (a 400-class condition); backend failures to
/// [`ResolveError::Registry`]; absence stays `Ok(None)` (404).
pub async fn resolve_str(
    s: &str,
    registry: &dyn ItemRegistry,
) -> Result<Option<Resolved>, ResolveError> {
    let id = VillageId::parse(s)?;
    Ok(resolve(id, registry).await?)
}
