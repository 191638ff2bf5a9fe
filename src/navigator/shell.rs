//! Capabilities the navigator needs from the shell.
//!
//! Each trait covers one narrow slice of the virtual-desktop surface so a test
//! can fake exactly what it exercises. Handles returned through the associated
//! types are transient: they are released when dropped, and the navigator never
//! keeps one past the call that produced it.

use crate::error::Result;
use crate::types::{DesktopId, Direction, WindowHandle};

/// Read access to the shell's ordered desktop list.
pub trait DesktopCatalog {
    type Desktop;

    fn desktop_count(&self) -> Result<usize>;

    /// Desktop at `index` in a single snapshot of the list, or `None` when the
    /// list is shorter than that.
    fn desktop_at(&self, index: usize) -> Result<Option<Self::Desktop>>;

    fn current_desktop(&self) -> Result<Self::Desktop>;

    /// Neighbor of `from`; `None` at the relevant end of the list.
    fn adjacent_desktop(&self, from: &Self::Desktop, direction: Direction) -> Result<Option<Self::Desktop>>;

    fn desktop_id(&self, desktop: &Self::Desktop) -> Result<DesktopId>;
}

pub trait DesktopSwitching: DesktopCatalog {
    fn switch_desktop(&self, desktop: &Self::Desktop) -> Result<()>;
}

/// Optional capability: renaming desktops.
pub trait DesktopNaming: DesktopCatalog {
    /// Whether the backing interface exists on this system. Callers check this
    /// before calling `rename_desktop`.
    fn supports_naming(&self) -> bool;

    fn rename_desktop(&self, desktop: &Self::Desktop, name: &str) -> Result<()>;
}

/// Lookup of the shell's view objects for window handles.
pub trait ViewCollection {
    type View;

    /// `None` when the shell has no view for the handle (hidden, child, tool
    /// windows and the like).
    fn view_for_window(&self, window: WindowHandle) -> Result<Option<Self::View>>;
}

pub trait ViewPlacement: ViewCollection + DesktopCatalog {
    fn move_view_to_desktop(&self, view: &Self::View, desktop: &Self::Desktop) -> Result<()>;
}

pub trait ViewPinning: ViewCollection {
    /// Same contract as [`DesktopNaming::supports_naming`], for the pinning
    /// calls below.
    fn supports_pinning(&self) -> bool;
    fn is_view_pinned(&self, view: &Self::View) -> Result<bool>;
    fn pin_view(&self, view: &Self::View) -> Result<()>;
    fn unpin_view(&self, view: &Self::View) -> Result<()>;
}

pub trait WindowMembership {
    fn is_window_on_current_desktop(&self, window: WindowHandle) -> Result<bool>;
}

pub trait OwnerLookup {
    /// Main window of the process that owns `window`, if it has one.
    fn owner_main_window(&self, window: WindowHandle) -> Result<Option<WindowHandle>>;
}

/// Everything the full navigator surface uses.
pub trait VirtualDesktopShell:
    DesktopSwitching + DesktopNaming + ViewPlacement + ViewPinning + WindowMembership + OwnerLookup
{
}

impl<T> VirtualDesktopShell for T where
    T: DesktopSwitching + DesktopNaming + ViewPlacement + ViewPinning + WindowMembership + OwnerLookup
{
}
