use std::fmt;
use std::hash::Hash;

/// An opaque identifier for an object living in an arena.
///
/// Handles are minted from a monotonically increasing counter and are never
/// reused, even when the slot behind them is.
pub trait Handle: Copy + Eq + Hash + Ord + fmt::Debug {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

/// Declares a `u64` handle newtype implementing [`Handle`].
#[macro_export]
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub struct $name(pub u64);

        impl $crate::Handle for $name {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_handle!(
    /// Handle of an actor in a scene.
    ActorHandle
);
define_handle!(
    /// Handle of a component inside its component system.
    ComponentHandle
);
define_handle!(
    /// Handle of a shader resource.
    ShaderHandle
);
define_handle!(
    /// Handle of a material resource.
    MaterialHandle
);
define_handle!(
    /// Handle of a mesh resource.
    MeshHandle
);
