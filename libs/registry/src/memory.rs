//! In-process registry implementation.
//!
//! Backs the full [`ItemRegistry`] contract with plain maps. Used by the
//! test suites and available to hosts for development setups; not a
//! durable store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use village_id::{ItemSegment, OrgSegment, TenantSegment, VillageId};

use crate::error::RegistryError;
use crate::registry::{
    probe_item, ItemProbe, ItemRecord, ItemRegistry, OrgRecord, TenantRecord,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// One concrete item store, keyed by the full segment triple.
struct MemoryItemStore {
    type_tag: String,
    rows: RwLock<HashMap<(u16, u16, u32), serde_json::Value>>,
}

#[async_trait]
impl ItemProbe for MemoryItemStore {
    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    async fn fetch(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<Option<serde_json::Value>, RegistryError> {
        Ok(read(&self.rows)
            .get(&(tenant.get(), org.get(), item.get()))
            .cloned())
    }
}

/// In-memory [`ItemRegistry`].
///
/// Reservation maps to map insertion under a write lock, which gives the
/// atomic true-if-newly-claimed semantics the contract requires. Item
/// records live in per-type stores probed in registration order, the same
/// dispatch a table-per-type database registry performs.
///
/// A reserved segment may exist without a record (claimed but not yet
/// written); lookups return `None` for it until the matching `insert_*`
/// fills it. Records are immutable once assigned: an insert for a
/// segment that already has a record is rejected, never replaced.
#[derive(Default)]
pub struct MemoryRegistry {
    tenants: RwLock<HashMap<u16, Option<TenantRecord>>>,
    orgs: RwLock<HashMap<(u16, u16), Option<OrgRecord>>>,
    reserved_items: RwLock<HashSet<(u16, u16, u32)>>,
    stores: RwLock<Vec<Arc<MemoryItemStore>>>,
}

impl MemoryRegistry {
    /// Creates an empty registry with no item stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item store for `type_tag` if one does not exist yet.
    ///
    /// Probe order is registration order.
    pub fn register_type(&self, type_tag: &str) {
        let mut stores = write(&self.stores);
        if stores.iter().any(|s| s.type_tag == type_tag) {
            return;
        }
        stores.push(Arc::new(MemoryItemStore {
            type_tag: type_tag.to_string(),
            rows: RwLock::new(HashMap::new()),
        }));
    }

    /// Stores a tenant record, claiming its segment (or filling an
    /// existing reservation).
    ///
    /// Returns false (and stores nothing) if `id` is not tenant-kind or
    /// the segment already has a record.
    pub fn insert_tenant(&self, id: VillageId, name: impl Into<String>) -> bool {
        let VillageId::Tenant { tenant } = id else {
            return false;
        };
        let mut tenants = write(&self.tenants);
        let slot = tenants.entry(tenant.get()).or_insert(None);
        if slot.is_some() {
            return false;
        }
        *slot = Some(TenantRecord {
            id,
            name: name.into(),
        });
        true
    }

    /// Stores an organization record, claiming its segment pair (or
    /// filling an existing reservation).
    ///
    /// Returns false (and stores nothing) if `id` is not org-kind or the
    /// pair already has a record.
    pub fn insert_org(&self, id: VillageId, name: impl Into<String>) -> bool {
        let VillageId::Organization { tenant, org } = id else {
            return false;
        };
        let mut orgs = write(&self.orgs);
        let slot = orgs.entry((tenant.get(), org.get())).or_insert(None);
        if slot.is_some() {
            return false;
        }
        *slot = Some(OrgRecord {
            id,
            name: name.into(),
        });
        true
    }

    /// Stores an item record in the store for `type_tag`, registering the
    /// store if needed and claiming the segment triple (or filling an
    /// existing reservation).
    ///
    /// Returns false (and stores nothing) if `id` is not item-kind or the
    /// triple already has a record in any store.
    pub fn insert_item(&self, id: VillageId, type_tag: &str, payload: serde_json::Value) -> bool {
        let VillageId::Item { tenant, org, item } = id else {
            return false;
        };
        let key = (tenant.get(), org.get(), item.get());

        self.register_type(type_tag);
        let stores = read(&self.stores);
        if stores.iter().any(|s| read(&s.rows).contains_key(&key)) {
            return false;
        }
        if let Some(store) = stores.iter().find(|s| s.type_tag == type_tag) {
            write(&store.rows).insert(key, payload);
        }
        write(&self.reserved_items).insert(key);
        true
    }
}

#[async_trait]
impl ItemRegistry for MemoryRegistry {
    async fn reserve_tenant(&self, tenant: TenantSegment) -> Result<bool, RegistryError> {
        let mut tenants = write(&self.tenants);
        if tenants.contains_key(&tenant.get()) {
            return Ok(false);
        }
        tenants.insert(tenant.get(), None);
        Ok(true)
    }

    async fn reserve_org(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
    ) -> Result<bool, RegistryError> {
        let mut orgs = write(&self.orgs);
        let key = (tenant.get(), org.get());
        if orgs.contains_key(&key) {
            return Ok(false);
        }
        orgs.insert(key, None);
        Ok(true)
    }

    async fn reserve_item(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<bool, RegistryError> {
        Ok(write(&self.reserved_items).insert((tenant.get(), org.get(), item.get())))
    }

    async fn lookup_tenant(
        &self,
        tenant: TenantSegment,
    ) -> Result<Option<TenantRecord>, RegistryError> {
        Ok(read(&self.tenants).get(&tenant.get()).cloned().flatten())
    }

    async fn lookup_org(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
    ) -> Result<Option<OrgRecord>, RegistryError> {
        Ok(read(&self.orgs)
            .get(&(tenant.get(), org.get()))
            .cloned()
            .flatten())
    }

    async fn lookup_item(
        &self,
        tenant: TenantSegment,
        org: OrgSegment,
        item: ItemSegment,
    ) -> Result<Option<ItemRecord>, RegistryError> {
        // Guard dropped before the await; probes hold their own locks.
        let stores: Vec<Arc<dyn ItemProbe>> = read(&self.stores)
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn ItemProbe>)
            .collect();
        probe_item(&stores, tenant, org, item).await
    }
}
