//! Index types for mesh elements.
//!
//! Vertices, edges, and faces are addressed through type-safe index wrappers.
//! The wrappers are generic over the underlying integer type so that small
//! meshes can use `u16` and very large scans can use `u64`.
//!
//! The largest value of each integer type is reserved as the invalid id, so a
//! `u16` mesh holds at most 65535 elements of each kind. [`EditMesh`] refuses
//! to grow past [`MeshIndex::capacity`] instead of wrapping ids.
//!
//! [`EditMesh`]: super::EditMesh

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as mesh indices.
///
/// Implemented for `u16`, `u32`, and `u64`.
pub trait MeshIndex: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Sentinel for "no element". Never a valid index.
    const INVALID: Self;

    /// Number of distinct elements this type can address.
    fn capacity() -> usize;

    /// Convert from `usize`, or `None` if `v` does not fit or is the sentinel.
    fn try_from_usize(v: usize) -> Option<Self>;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {
        $(
            impl MeshIndex for $t {
                const INVALID: Self = <$t>::MAX;

                #[inline]
                fn capacity() -> usize {
                    usize::try_from(<$t>::MAX).unwrap_or(usize::MAX)
                }

                #[inline]
                fn try_from_usize(v: usize) -> Option<Self> {
                    <$t>::try_from(v).ok().filter(|&i| i != Self::INVALID)
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32, u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an index from a raw value.
            ///
            /// A value the index type cannot hold becomes the invalid id.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self::try_new(index).unwrap_or_else(Self::invalid)
            }

            /// Create an index, or `None` if the index type cannot hold it.
            #[inline]
            pub fn try_new(index: usize) -> Option<Self> {
                I::try_from_usize(index).map(Self)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(EdgeId, "E");
impl_index_type!(FaceId, "F");
