//! Live shell services implementing the navigator's capability traits.

use std::mem;

use log::{debug, info, trace};
use windows::Win32::Foundation::TYPE_E_ELEMENTNOTFOUND;
use windows::Win32::System::Com::{CLSCTX_ALL, CLSCTX_LOCAL_SERVER, CoCreateInstance, IServiceProvider};
use windows::Win32::UI::Shell::Common::IObjectArray;
use windows::Win32::UI::Shell::{IVirtualDesktopManager, VirtualDesktopManager};
use windows::core::{BOOL, GUID, HSTRING, Interface};

use crate::error::{Error, Result};
use crate::navigator::{
    DesktopCatalog, DesktopNaming, DesktopSwitching, OwnerLookup, ViewCollection, ViewPinning, ViewPlacement,
    WindowMembership,
};
use crate::types::{DesktopId, Direction, WindowHandle};
use crate::win::com::{
    CLSID_IMMERSIVE_SHELL, IApplicationView, IApplicationViewCollection, IVirtualDesktop, IVirtualDesktop2,
    IVirtualDesktopManagerInternal, IVirtualDesktopManagerInternal2, IVirtualDesktopPinnedApps,
    SID_VIRTUAL_DESKTOP_MANAGER_INTERNAL, SID_VIRTUAL_DESKTOP_PINNED_APPS,
};
use crate::win::window;

/// Connected set of shell services. Must stay on the thread that created it.
pub struct ShellServices {
    manager: IVirtualDesktopManager,
    internal: IVirtualDesktopManagerInternal,
    internal2: Option<IVirtualDesktopManagerInternal2>,
    views: IApplicationViewCollection,
    pinned: Option<IVirtualDesktopPinnedApps>,
}

impl ShellServices {
    /// Connects to the immersive shell. The calling thread must already be in
    /// a COM apartment.
    pub fn connect() -> Result<Self> {
        let shell: IServiceProvider = unsafe { CoCreateInstance(&CLSID_IMMERSIVE_SHELL, None, CLSCTX_LOCAL_SERVER)? };
        let internal: IVirtualDesktopManagerInternal =
            unsafe { shell.QueryService(&SID_VIRTUAL_DESKTOP_MANAGER_INTERNAL)? };
        let views: IApplicationViewCollection = unsafe { shell.QueryService(&IApplicationViewCollection::IID)? };
        let manager: IVirtualDesktopManager = unsafe { CoCreateInstance(&VirtualDesktopManager, None, CLSCTX_ALL)? };

        let internal2 = optional_service::<IVirtualDesktopManagerInternal2>(
            &shell,
            &SID_VIRTUAL_DESKTOP_MANAGER_INTERNAL,
            "desktop naming",
        );
        let pinned = optional_service::<IVirtualDesktopPinnedApps>(&shell, &SID_VIRTUAL_DESKTOP_PINNED_APPS, "pinning");

        info!(
            "Connected to shell services (naming: {}, pinning: {})",
            internal2.is_some(),
            pinned.is_some()
        );
        Ok(ShellServices { manager, internal, internal2, views, pinned })
    }

    fn pinned_apps(&self) -> Result<&IVirtualDesktopPinnedApps> {
        self.pinned.as_ref().ok_or(Error::Unsupported("pinned apps"))
    }

    fn desktops(&self) -> Result<IObjectArray> {
        let mut desktops = None;
        unsafe { self.internal.GetDesktops(&mut desktops).ok()? };
        desktops.ok_or_else(|| Error::rejected("enumerate desktops", "shell returned no array"))
    }
}

fn optional_service<T: Interface>(shell: &IServiceProvider, service: &GUID, capability: &str) -> Option<T> {
    match unsafe { shell.QueryService::<T>(service) } {
        Ok(interface) => Some(interface),
        Err(e) => {
            info!("Shell capability '{}' unavailable: {}", capability, e);
            None
        }
    }
}

impl DesktopCatalog for ShellServices {
    type Desktop = IVirtualDesktop;

    fn desktop_count(&self) -> Result<usize> {
        let mut count = 0u32;
        unsafe { self.internal.GetCount(&mut count).ok()? };
        Ok(count as usize)
    }

    fn desktop_at(&self, index: usize) -> Result<Option<IVirtualDesktop>> {
        let desktops = self.desktops()?;
        let count = unsafe { desktops.GetCount()? } as usize;
        if index >= count {
            trace!("Desktop index {} outside snapshot of {}", index, count);
            return Ok(None);
        }
        Ok(Some(unsafe { desktops.GetAt::<IVirtualDesktop>(index as u32)? }))
    }

    fn current_desktop(&self) -> Result<IVirtualDesktop> {
        let mut desktop = None;
        unsafe { self.internal.GetCurrentDesktop(&mut desktop).ok()? };
        desktop.ok_or_else(|| Error::rejected("current desktop", "shell returned no desktop"))
    }

    fn adjacent_desktop(&self, from: &IVirtualDesktop, direction: Direction) -> Result<Option<IVirtualDesktop>> {
        let mut desktop = None;
        let hr = unsafe { self.internal.GetAdjacentDesktop(from.as_raw(), direction.shell_code(), &mut desktop) };
        // Any failure counts as "no neighbor".
        if hr.is_err() {
            trace!("No desktop {:?} of the given one ({:?})", direction, hr);
            return Ok(None);
        }
        Ok(desktop)
    }

    fn desktop_id(&self, desktop: &IVirtualDesktop) -> Result<DesktopId> {
        let mut id = GUID::zeroed();
        unsafe { desktop.GetId(&mut id).ok()? };
        Ok(id.into())
    }
}

impl DesktopSwitching for ShellServices {
    fn switch_desktop(&self, desktop: &IVirtualDesktop) -> Result<()> {
        unsafe { self.internal.SwitchDesktop(desktop.as_raw()).ok()? };
        Ok(())
    }
}

impl DesktopNaming for ShellServices {
    fn supports_naming(&self) -> bool {
        self.internal2.is_some()
    }

    fn rename_desktop(&self, desktop: &IVirtualDesktop, name: &str) -> Result<()> {
        let internal2 = self.internal2.as_ref().ok_or(Error::Unsupported("desktop naming"))?;
        let desktop: IVirtualDesktop2 = desktop.cast()?;
        let name = HSTRING::from(name);
        debug!("Renaming desktop to {:?}", name);
        // The shell only borrows the string; `name` outlives the call.
        unsafe {
            let raw: *mut std::ffi::c_void = mem::transmute_copy(&name);
            internal2.SetName(desktop.as_raw(), raw).ok()?;
        }
        Ok(())
    }
}

impl ViewCollection for ShellServices {
    type View = IApplicationView;

    fn view_for_window(&self, window: WindowHandle) -> Result<Option<IApplicationView>> {
        let mut view = None;
        let hr = unsafe { self.views.GetViewForHwnd(window.into(), &mut view) };
        if hr == TYPE_E_ELEMENTNOTFOUND {
            trace!("Shell has no view for window {}", window);
            return Ok(None);
        }
        hr.ok()?;
        Ok(view)
    }
}

impl ViewPlacement for ShellServices {
    fn move_view_to_desktop(&self, view: &IApplicationView, desktop: &IVirtualDesktop) -> Result<()> {
        unsafe { self.internal.MoveViewToDesktop(view.as_raw(), desktop.as_raw()).ok()? };
        Ok(())
    }
}

impl ViewPinning for ShellServices {
    fn supports_pinning(&self) -> bool {
        self.pinned.is_some()
    }

    fn is_view_pinned(&self, view: &IApplicationView) -> Result<bool> {
        let mut pinned = BOOL(0);
        unsafe { self.pinned_apps()?.IsViewPinned(view.as_raw(), &mut pinned).ok()? };
        Ok(pinned.as_bool())
    }

    fn pin_view(&self, view: &IApplicationView) -> Result<()> {
        unsafe { self.pinned_apps()?.PinView(view.as_raw()).ok()? };
        Ok(())
    }

    fn unpin_view(&self, view: &IApplicationView) -> Result<()> {
        unsafe { self.pinned_apps()?.UnpinView(view.as_raw()).ok()? };
        Ok(())
    }
}

impl WindowMembership for ShellServices {
    fn is_window_on_current_desktop(&self, window: WindowHandle) -> Result<bool> {
        let on_current = unsafe { self.manager.IsWindowOnCurrentVirtualDesktop(window.into())? };
        Ok(on_current.as_bool())
    }
}

impl OwnerLookup for ShellServices {
    fn owner_main_window(&self, window: WindowHandle) -> Result<Option<WindowHandle>> {
        window::process_main_window(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::DesktopNavigator;
    use crate::win::com::ComApartment;

    #[test]
    #[ignore = "talks to the live shell"]
    fn live_shell_reports_current_desktop() {
        let _com = ComApartment::enter().unwrap();
        let navigator = DesktopNavigator::new(ShellServices::connect().unwrap());
        let count = navigator.desktop_count();
        assert!(count >= 1);
        assert!(navigator.current_desktop_index().is_some_and(|i| i < count));
    }
}
