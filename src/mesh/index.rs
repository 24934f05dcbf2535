//! Index types for mesh elements.
//!
//! Vertices, half-edges, and faces live in arenas owned by the
//! [`TopologyTable`](super::TopologyTable) and are addressed by these
//! type-safe slot indices rather than by references.

use std::fmt::{self, Debug};

/// Sentinel raw value for a null index.
const INVALID: u32 = u32::MAX;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a slot number.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the slot number.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert!(!VertexId::invalid().is_valid());
        assert_eq!(VertexId::default(), VertexId::invalid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(42)), "V(42)");
        assert_eq!(format!("{:?}", HalfEdgeId::new(7)), "HE(7)");
        assert_eq!(format!("{:?}", FaceId::invalid()), "F(INVALID)");
    }

    #[test]
    fn test_ordering_follows_slot() {
        assert!(VertexId::new(1) < VertexId::new(2));
        assert_eq!(FaceId::from(3usize).index(), 3);
    }
}
