//! Shell COM interfaces behind virtual desktops.
//!
//! These interfaces are undocumented; the vtables below match the Windows 10
//! shell (builds 10240 through 19045). Only the methods this crate calls, and
//! everything before them in the vtable, are declared.

#![allow(non_snake_case)]

use std::ffi::c_void;
use std::marker::PhantomData;

use log::{debug, warn};
use windows::Win32::Foundation::{HWND, RPC_E_CHANGED_MODE};
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize};
use windows::Win32::UI::Shell::Common::IObjectArray;
use windows::core::{BOOL, GUID, HRESULT, IUnknown, IUnknown_Vtbl, PCWSTR};
use windows_core::interface;

use crate::error::Result;

pub const CLSID_IMMERSIVE_SHELL: GUID = GUID::from_u128(0xC2F03A33_21F5_47FA_B4BB_156362A2F239);
pub const SID_VIRTUAL_DESKTOP_MANAGER_INTERNAL: GUID = GUID::from_u128(0xC5E0CDCA_7B6E_41B2_9FC4_D93975CC467B);
pub const SID_VIRTUAL_DESKTOP_PINNED_APPS: GUID = GUID::from_u128(0xB5A399E7_1C87_46B8_88E9_FC5747B171BD);

/// The shell's per-window view object. Opaque here: it is only ever handed
/// back to the shell.
#[interface("372E1D3B-38D3-42E4-A15B-8AB2B178F513")]
pub unsafe trait IApplicationView: IUnknown {}

#[interface("1841C6D7-4F9D-42C0-AF41-8747538F10E5")]
pub unsafe trait IApplicationViewCollection: IUnknown {
    pub unsafe fn GetViews(&self, views: *mut Option<IObjectArray>) -> HRESULT;
    pub unsafe fn GetViewsByZOrder(&self, views: *mut Option<IObjectArray>) -> HRESULT;
    pub unsafe fn GetViewsByAppUserModelId(&self, id: PCWSTR, views: *mut Option<IObjectArray>) -> HRESULT;
    pub unsafe fn GetViewForHwnd(&self, hwnd: HWND, view: *mut Option<IApplicationView>) -> HRESULT;
    pub unsafe fn GetViewForApplication(&self, application: *mut c_void, view: *mut Option<IApplicationView>) -> HRESULT;
    pub unsafe fn GetViewForAppUserModelId(&self, id: PCWSTR, view: *mut Option<IApplicationView>) -> HRESULT;
    pub unsafe fn GetViewInFocus(&self, view: *mut Option<IApplicationView>) -> HRESULT;
}

#[interface("FF72FFDD-BE7E-43FC-9C03-AD81681E88E4")]
pub unsafe trait IVirtualDesktop: IUnknown {
    pub unsafe fn IsViewVisible(&self, view: *mut c_void, visible: *mut BOOL) -> HRESULT;
    pub unsafe fn GetId(&self, id: *mut GUID) -> HRESULT;
}

/// Desktop interface accepted by `SetName`.
#[interface("31EBDE3F-6EC3-4CBD-B9FB-0EF6D09B41F4")]
pub unsafe trait IVirtualDesktop2: IUnknown {
    pub unsafe fn IsViewVisible(&self, view: *mut c_void, visible: *mut BOOL) -> HRESULT;
    pub unsafe fn GetId(&self, id: *mut GUID) -> HRESULT;
    pub unsafe fn GetName(&self, name: *mut *mut c_void) -> HRESULT;
}

#[interface("F31574D6-B682-4CDC-BD56-1827860ABEC6")]
pub unsafe trait IVirtualDesktopManagerInternal: IUnknown {
    pub unsafe fn GetCount(&self, count: *mut u32) -> HRESULT;
    pub unsafe fn MoveViewToDesktop(&self, view: *mut c_void, desktop: *mut c_void) -> HRESULT;
    pub unsafe fn CanViewMoveDesktops(&self, view: *mut c_void, can_move: *mut BOOL) -> HRESULT;
    pub unsafe fn GetCurrentDesktop(&self, desktop: *mut Option<IVirtualDesktop>) -> HRESULT;
    pub unsafe fn GetDesktops(&self, desktops: *mut Option<IObjectArray>) -> HRESULT;
    /// `direction`: 3 = left, 4 = right. Fails at either end of the list,
    /// usually with `TYPE_E_OUTOFBOUNDS`.
    pub unsafe fn GetAdjacentDesktop(&self, from: *mut c_void, direction: u32, desktop: *mut Option<IVirtualDesktop>) -> HRESULT;
    pub unsafe fn SwitchDesktop(&self, desktop: *mut c_void) -> HRESULT;
    pub unsafe fn CreateDesktop(&self, desktop: *mut Option<IVirtualDesktop>) -> HRESULT;
    pub unsafe fn RemoveDesktop(&self, desktop: *mut c_void, fallback: *mut c_void) -> HRESULT;
    pub unsafe fn FindDesktop(&self, id: *const GUID, desktop: *mut Option<IVirtualDesktop>) -> HRESULT;
}

/// Same service, later revision: adds desktop names. Missing on older builds.
#[interface("0F3A72B0-4566-487E-9A33-4ED302F6D6CE")]
pub unsafe trait IVirtualDesktopManagerInternal2: IVirtualDesktopManagerInternal {
    pub unsafe fn GetDesktopSwitchIncludeExcludeViews(
        &self,
        desktop: *mut c_void,
        include: *mut *mut c_void,
        exclude: *mut *mut c_void,
    ) -> HRESULT;
    /// `name` is a borrowed `HSTRING`.
    pub unsafe fn SetName(&self, desktop: *mut c_void, name: *mut c_void) -> HRESULT;
}

#[interface("4CE81583-1E4C-4632-A621-07A53543148F")]
pub unsafe trait IVirtualDesktopPinnedApps: IUnknown {
    pub unsafe fn IsAppIdPinned(&self, app_id: PCWSTR, pinned: *mut BOOL) -> HRESULT;
    pub unsafe fn PinAppID(&self, app_id: PCWSTR) -> HRESULT;
    pub unsafe fn UnpinAppID(&self, app_id: PCWSTR) -> HRESULT;
    pub unsafe fn IsViewPinned(&self, view: *mut c_void, pinned: *mut BOOL) -> HRESULT;
    pub unsafe fn PinView(&self, view: *mut c_void) -> HRESULT;
    pub unsafe fn UnpinView(&self, view: *mut c_void) -> HRESULT;
}

/// Keeps the calling thread in a single-threaded COM apartment until dropped.
///
/// If the thread already lives in a multithreaded apartment, that one is
/// used as-is and nothing is undone on drop.
pub struct ComApartment {
    owned: bool,
    _not_send: PhantomData<*const ()>,
}

impl ComApartment {
    pub fn enter() -> Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            warn!("Thread already in a multithreaded COM apartment, reusing it");
            return Ok(ComApartment { owned: false, _not_send: PhantomData });
        }
        hr.ok()?;
        debug!("Entered COM apartment");
        Ok(ComApartment { owned: true, _not_send: PhantomData })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            debug!("Leaving COM apartment");
            unsafe { CoUninitialize() };
        }
    }
}
