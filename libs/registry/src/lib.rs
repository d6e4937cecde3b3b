//! # village-registry
//!
//! The storage-facing half of the Village ID system: the registry contract,
//! collision-safe ID generation, and type-agnostic resolution.
//!
//! ## Architecture
//!
//! The ID core never talks to a database. Everything it needs from
//! persistence is the [`ItemRegistry`] trait: atomic segment reservation
//! plus lookups keyed by segment tuples. Hosts back it with whatever store
//! they run; [`MemoryRegistry`] is the in-process implementation used by
//! tests and development setups.
//!
//! Two operations sit on top of the contract:
//!
//! - [`IdGenerator`] draws random segment values and claims them through
//!   the registry, retrying on collision up to a bound. Segment widths are
//!   only 16/16/32 bits, so collisions are an expected, ordinary event at
//!   scale, not a bug.
//! - [`resolve`] takes a bare [`VillageId`](village_id::VillageId) and
//!   returns whatever record it names, dispatching on the ID's kind. The
//!   caller never supplies a type hint; for item IDs the registry probes
//!   its concrete item stores in order and reports the discovered type tag.
//!
//! Absence is an ordinary outcome throughout: lookups and resolution
//! return `Ok(None)` for records that do not exist, reserving `Err` for
//! backend failures.

mod error;
mod generate;
mod memory;
mod registry;
mod resolve;

pub use error::{GenerateError, RegistryError, ResolveError};
pub use generate::{IdGenerator, MAX_GENERATION_ATTEMPTS};
pub use memory::MemoryRegistry;
pub use registry::{ItemProbe, ItemRecord, ItemRegistry, OrgRecord, TenantRecord};
pub use resolve::{resolve, resolve_str, Resolved};
