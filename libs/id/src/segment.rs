//! Segment newtypes for the three levels of the Village ID hierarchy.
//!
//! Segments are non-zero by construction: a zero in the serialized form
//! means "not scoped to this level", never a segment value. Keeping the
//! zero-exclusion in the type means the rest of the crate never has to
//! re-check it.

use std::num::{NonZeroU16, NonZeroU32};

macro_rules! define_segment {
    ($(#[$meta:meta])* $name:ident, $nonzero:ty, $raw:ty, $width:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($nonzero);

        impl $name {
            /// Wraps a non-zero segment value.
            #[must_use]
            pub const fn new(value: $nonzero) -> Self {
                Self(value)
            }

            /// Builds a segment from a raw integer, returning `None` for
            /// zero.
            #[must_use]
            pub const fn from_raw(value: $raw) -> Option<Self> {
                match <$nonzero>::new(value) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// Returns the raw segment value.
            #[must_use]
            pub const fn get(&self) -> $raw {
                self.0.get()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!("{:0", $width, "x}"), self.0.get())
            }
        }

        impl From<$nonzero> for $name {
            fn from(value: $nonzero) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $raw {
            fn from(segment: $name) -> Self {
                segment.get()
            }
        }
    };
}

define_segment!(
    /// The 16-bit tenant segment. Unique among all tenants.
    TenantSegment,
    NonZeroU16,
    u16,
    4
);

define_segment!(
    /// The 16-bit organization segment. Unique within its owning tenant;
    /// the same value may appear under different tenants.
    OrgSegment,
    NonZeroU16,
    u16,
    4
);

define_segment!(
    /// The 32-bit item segment. Unique within its owning organization.
    ItemSegment,
    NonZeroU32,
    u32,
    8
);
