//! Virtual desktop navigation on top of the shell's capability interfaces.
//!
//! The navigator holds no state of its own beyond the injected shell; see
//! [`shell`] for the capabilities it consumes.

mod navigate;
pub mod shell;
mod strategy;

#[cfg(test)]
pub(crate) mod fake;

pub use navigate::DesktopNavigator;
pub use shell::{
    DesktopCatalog, DesktopNaming, DesktopSwitching, OwnerLookup, ViewCollection, ViewPinning, ViewPlacement,
    VirtualDesktopShell, WindowMembership,
};
