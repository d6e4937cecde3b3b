//! Collision-safe Village ID generation.
//!
//! Segment values are drawn uniformly at random and claimed through the
//! registry's `reserve_*` operations. With 16-bit tenant and org segments
//! the birthday bound makes collisions routine at scale, so generation is
//! a check-and-retry loop against live state, not a blind draw.

use rand::Rng;
use tracing::{debug, error};
use village_id::{ItemSegment, Kind, OrgSegment, TenantSegment, VillageId};

use crate::error::GenerateError;
use crate::registry::ItemRegistry;

/// Default retry bound per generated segment.
///
/// Chosen so that worst-case generation latency stays bounded against an
/// in-process registry; hitting the bound means the segment keyspace at
/// that level is close to saturated and widening the ID layout is due.
pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;

/// Generates Village IDs against an [`ItemRegistry`].
///
/// The generator holds no state besides the retry bound; every call is an
/// independent sequence of draw-and-reserve attempts. A returned ID has
/// been reserved through the registry, but with backends whose
/// reservation is advisory it is still a candidate: the final insert can
/// lose a race and fail on the storage unique constraint, in which case
/// the caller regenerates and retries.
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    max_attempts: u32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl IdGenerator {
    /// Creates a generator with the default retry bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with a custom retry bound.
    #[must_use]
    pub const fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Generates a fresh tenant ID.
    ///
    /// Fails with [`GenerateError::ExhaustedKeyspace`] once the retry
    /// bound is hit, which signals the 65,535-tenant ceiling is near.
    pub async fn tenant_id(
        &self,
        registry: &dyn ItemRegistry,
    ) -> Result<VillageId, GenerateError> {
        for attempt in 1..=self.max_attempts {
            let tenant = draw_tenant();
            if registry.reserve_tenant(tenant).await? {
                return Ok(VillageId::tenant(tenant));
            }
            debug!(attempt, "tenant segment collision, redrawing");
        }
        self.exhausted(Kind::Tenant)
    }

    /// Generates a fresh organization ID under `parent`.
    ///
    /// `parent` must be tenant-kind; the new ID inherits its tenant
    /// segment. Org segment uniqueness is scoped to the tenant, so the
    /// same value may exist under other tenants.
    pub async fn org_id(
        &self,
        parent: VillageId,
        registry: &dyn ItemRegistry,
    ) -> Result<VillageId, GenerateError> {
        let VillageId::Tenant { tenant } = parent else {
            return Err(GenerateError::InvalidParent {
                expected: Kind::Tenant,
                actual: parent.kind(),
            });
        };

        for attempt in 1..=self.max_attempts {
            let org = draw_org();
            if registry.reserve_org(tenant, org).await? {
                return Ok(VillageId::organization(tenant, org));
            }
            debug!(attempt, %tenant, "org segment collision, redrawing");
        }
        self.exhausted(Kind::Organization)
    }

    /// Generates a fresh item ID under `parent`.
    ///
    /// `parent` must be org-kind — items cannot parent items. The new ID
    /// inherits the parent's tenant and org segments.
    pub async fn item_id(
        &self,
        parent: VillageId,
        registry: &dyn ItemRegistry,
    ) -> Result<VillageId, GenerateError> {
        let VillageId::Organization { tenant, org } = parent else {
            return Err(GenerateError::InvalidParent {
                expected: Kind::Organization,
                actual: parent.kind(),
            });
        };

        for attempt in 1..=self.max_attempts {
            let item = draw_item();
            if registry.reserve_item(tenant, org, item).await? {
                return Ok(VillageId::item(tenant, org, item));
            }
            debug!(attempt, %tenant, %org, "item segment collision, redrawing");
        }
        self.exhausted(Kind::Item)
    }

    fn exhausted(&self, kind: Kind) -> Result<VillageId, GenerateError> {
        error!(
            %kind,
            attempts = self.max_attempts,
            "segment keyspace exhausted during ID generation"
        );
        Err(GenerateError::ExhaustedKeyspace {
            kind,
            attempts: self.max_attempts,
        })
    }
}

// The draw helpers rejection-sample zero so the distribution stays
// uniform over the non-zero values. The thread RNG must not live across
// an await, so each draw scopes its own handle.

fn draw_tenant() -> TenantSegment {
    let mut rng = rand::rng();
    loop {
        if let Some(segment) = TenantSegment::from_raw(rng.random()) {
            return segment;
        }
    }
}

fn draw_org() -> OrgSegment {
    let mut rng = rand::rng();
    loop {
        if let Some(segment) = OrgSegment::from_raw(rng.random()) {
            return segment;
        }
    }
}

fn draw_item() -> ItemSegment {
    let mut rng = rand::rng();
    loop {
        if let Some(segment) = ItemSegment::from_raw(rng.random()) {
            return segment;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::RegistryError;
    use crate::memory::MemoryRegistry;
    use crate::registry::{ItemRecord, OrgRecord, TenantRecord};

    /// Registry where every reservation collides. Counts reserve calls.
    #[derive(Default)]
    struct AlwaysCollide {
        reserve_calls: AtomicU32,
    }

    #[async_trait]
    impl crate::registry::ItemRegistry for AlwaysCollide {
        async fn reserve_tenant(&self, _: TenantSegment) -> Result<bool, RegistryError> {
            self.reserve_calls.fetch_add(1, Ordering::Relaxed);
            Ok(false)
        }

        async fn reserve_org(
            &self,
            _: TenantSegment,
            _: OrgSegment,
        ) -> Result<bool, RegistryError> {
            self.reserve_calls.fetch_add(1, Ordering::Relaxed);
            Ok(false)
        }

        async fn reserve_item(
            &self,
            _: TenantSegment,
            _: OrgSegment,
            _: ItemSegment,
        ) -> Result<bool, RegistryError> {
            self.reserve_calls.fetch_add(1, Ordering::Relaxed);
            Ok(false)
        }

        async fn lookup_tenant(
            &self,
            _: TenantSegment,
        ) -> Result<Option<TenantRecord>, RegistryError> {
            Ok(None)
        }

        async fn lookup_org(
            &self,
            _: TenantSegment,
            _: OrgSegment,
        ) -> Result<Option<OrgRecord>, RegistryError> {
            Ok(None)
        }

        async fn lookup_item(
            &self,
            _: TenantSegment,
            _: OrgSegment,
            _: ItemSegment,
        ) -> Result<Option<ItemRecord>, RegistryError> {
            Ok(None)
        }
    }

    fn id(s: &str) -> VillageId {
        VillageId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_tenant_id_against_empty_registry() {
        let registry = MemoryRegistry::new();
        let generated = IdGenerator::new().tenant_id(&registry).await.unwrap();

        assert_eq!(generated.kind(), Kind::Tenant);
        assert_eq!(generated.org_segment(), None);
        assert_eq!(generated.item_segment(), None);
        // The generator reserved the segment, so a second generation
        // cannot produce the same one.
        let second = IdGenerator::new().tenant_id(&registry).await.unwrap();
        assert_ne!(generated.tenant_segment(), second.tenant_segment());
    }

    #[tokio::test]
    async fn test_org_id_inherits_tenant_segment() {
        let registry = MemoryRegistry::new();
        let tenant_id = id("a1b2-0000-00000000");

        let org_id = IdGenerator::new()
            .org_id(tenant_id, &registry)
            .await
            .unwrap();

        assert_eq!(org_id.kind(), Kind::Organization);
        assert_eq!(org_id.tenant_segment(), tenant_id.tenant_segment());
        assert_eq!(org_id.item_segment(), None);
    }

    #[tokio::test]
    async fn test_item_id_inherits_tenant_and_org_segments() {
        let registry = MemoryRegistry::new();
        let org_id = id("a1b2-c3d4-00000000");

        let item_id = IdGenerator::new().item_id(org_id, &registry).await.unwrap();

        assert_eq!(item_id.kind(), Kind::Item);
        assert_eq!(item_id.tenant_segment(), org_id.tenant_segment());
        assert_eq!(item_id.org_segment(), org_id.org_segment());
        assert!(item_id.item_segment().is_some());
    }

    #[tokio::test]
    async fn test_org_id_rejects_org_parent() {
        let registry = MemoryRegistry::new();
        let err = IdGenerator::new()
            .org_id(id("a1b2-c3d4-00000000"), &registry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::InvalidParent {
                expected: Kind::Tenant,
                actual: Kind::Organization,
            }
        ));
    }

    #[tokio::test]
    async fn test_item_id_rejects_tenant_parent() {
        let registry = MemoryRegistry::new();
        let err = IdGenerator::new()
            .item_id(id("a1b2-0000-00000000"), &registry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::InvalidParent {
                expected: Kind::Organization,
                actual: Kind::Tenant,
            }
        ));
    }

    #[tokio::test]
    async fn test_item_id_rejects_item_parent() {
        // Items cannot parent items.
        let registry = MemoryRegistry::new();
        let err = IdGenerator::new()
            .item_id(id("a1b2-c3d4-e5f67890"), &registry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::InvalidParent {
                expected: Kind::Organization,
                actual: Kind::Item,
            }
        ));
    }

    #[tokio::test]
    async fn test_exhaustion_after_exactly_the_bound() {
        let registry = AlwaysCollide::default();
        let generator = IdGenerator::with_max_attempts(7);

        let err = generator.tenant_id(&registry).await.unwrap_err();

        assert!(err.is_exhausted());
        assert!(matches!(
            err,
            GenerateError::ExhaustedKeyspace {
                kind: Kind::Tenant,
                attempts: 7,
            }
        ));
        assert_eq!(registry.reserve_calls.load(Ordering::Relaxed), 7);
    }

    #[tokio::test]
    async fn test_exhaustion_for_items_reports_item_kind() {
        let registry = AlwaysCollide::default();
        let generator = IdGenerator::with_max_attempts(3);

        let err = generator
            .item_id(id("a1b2-c3d4-00000000"), &registry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::ExhaustedKeyspace {
                kind: Kind::Item,
                attempts: 3,
            }
        ));
    }

    #[tokio::test]
    async fn test_org_segment_may_repeat_across_tenants() {
        // Claim every org value but one under tenant A; generation under
        // tenant B is unconstrained by A's claims.
        let registry = MemoryRegistry::new();
        let tenant_a = id("a1b2-0000-00000000");
        let tenant_b = id("ffff-0000-00000000");

        let generator = IdGenerator::new();
        let org_a = generator.org_id(tenant_a, &registry).await.unwrap();

        let reused =
            VillageId::organization(tenant_b.tenant_segment(), org_a.org_segment().unwrap());
        assert!(registry
            .reserve_org(reused.tenant_segment(), reused.org_segment().unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_item_segment_may_repeat_across_orgs() {
        // Item uniqueness is scoped to the owning organization; a value
        // generated under org A stays claimable under org B.
        let registry = MemoryRegistry::new();
        let org_a = id("a1b2-c3d4-00000000");
        let org_b = id("a1b2-ffff-00000000");

        let generator = IdGenerator::new();
        let item_a = generator.item_id(org_a, &registry).await.unwrap();

        let reused = VillageId::item(
            org_b.tenant_segment(),
            org_b.org_segment().unwrap(),
            item_a.item_segment().unwrap(),
        );
        assert!(registry
            .reserve_item(
                reused.tenant_segment(),
                reused.org_segment().unwrap(),
                reused.item_segment().unwrap(),
            )
            .await
            .unwrap());
    }
}
