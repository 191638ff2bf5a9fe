//! Window-station desktop objects (`CreateDesktop`/`OpenDesktop` and friends).
//!
//! These are the kernel desktop objects that separate e.g. the secure desktop
//! from the interactive one. They are unrelated to the shell's virtual
//! desktops.

use std::ffi::c_void;

use log::{debug, warn};
use windows::Win32::Foundation::{HANDLE, LPARAM, TRUE};
use windows::Win32::System::StationsAndDesktops::*;
use windows::core::{BOOL, HSTRING, PCWSTR, PWSTR};

use crate::error::Result;
use crate::types::WindowHandle;

/// `DESKTOP_ALL_ACCESS`: every desktop-specific right plus the standard
/// required rights.
pub const DESKTOP_ALL_ACCESS: u32 = 0x000F_01FF;

/// An open desktop object. Handles this crate opened are closed on drop;
/// handles borrowed from a thread are left alone.
pub struct DesktopObject {
    handle: HDESK,
    owned: bool,
}

extern "system" fn collect_names(name: PWSTR, lparam: LPARAM) -> BOOL {
    let names = unsafe { &mut *(lparam.0 as *mut Vec<String>) };
    match unsafe { name.to_string() } {
        Ok(name) => names.push(name),
        Err(e) => warn!("Skipping desktop with undecodable name: {}", e),
    }
    TRUE
}

extern "system" fn collect_windows(hwnd: windows::Win32::Foundation::HWND, lparam: LPARAM) -> BOOL {
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowHandle>) };
    windows.push(hwnd.into());
    TRUE
}

/// Names of the desktops in the calling process's window station.
pub fn station_desktop_names() -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    unsafe {
        let station = GetProcessWindowStation()?;
        EnumDesktopsW(Some(station), Some(collect_names), LPARAM(&mut names as *mut _ as isize))?;
    }
    Ok(names)
}

impl DesktopObject {
    pub fn create(name: &str, access: u32) -> Result<Self> {
        let handle = unsafe {
            CreateDesktopW(&HSTRING::from(name), PCWSTR::null(), None, DESKTOP_CONTROL_FLAGS(0), access, None)?
        };
        debug!("Created desktop object {}", name);
        Ok(DesktopObject { handle, owned: true })
    }

    pub fn open(name: &str, access: u32) -> Result<Self> {
        let handle = unsafe { OpenDesktopW(&HSTRING::from(name), DESKTOP_CONTROL_FLAGS(0), false, access)? };
        Ok(DesktopObject { handle, owned: true })
    }

    /// The desktop currently receiving user input.
    pub fn open_input(access: u32) -> Result<Self> {
        let handle = unsafe { OpenInputDesktop(DESKTOP_CONTROL_FLAGS(0), false, DESKTOP_ACCESS_FLAGS(access))? };
        Ok(DesktopObject { handle, owned: true })
    }

    /// Desktop assigned to `thread_id`. Not closed on drop.
    pub fn of_thread(thread_id: u32) -> Result<Self> {
        let handle = unsafe { GetThreadDesktop(thread_id)? };
        Ok(DesktopObject { handle, owned: false })
    }

    /// Makes this desktop visible and gives it user input.
    pub fn switch_to(&self) -> Result<()> {
        unsafe { SwitchDesktop(self.handle)? };
        Ok(())
    }

    /// Assigns this desktop to the calling thread, which must own no windows
    /// or hooks yet.
    pub fn set_for_current_thread(&self) -> Result<()> {
        unsafe { SetThreadDesktop(self.handle)? };
        Ok(())
    }

    /// Top-level windows on this desktop.
    pub fn windows(&self) -> Result<Vec<WindowHandle>> {
        let mut windows: Vec<WindowHandle> = Vec::new();
        unsafe {
            EnumDesktopWindows(Some(self.handle), Some(collect_windows), LPARAM(&mut windows as *mut _ as isize))?
        };
        Ok(windows)
    }

    pub fn name(&self) -> Result<String> {
        let object = HANDLE(self.handle.0);
        let mut needed = 0u32;
        // First call only sizes the buffer.
        let _ = unsafe { GetUserObjectInformationW(object, UOI_NAME, None, 0, Some(&mut needed)) };
        let mut buf = vec![0u16; (needed as usize).div_ceil(2).max(1)];
        unsafe {
            GetUserObjectInformationW(
                object,
                UOI_NAME,
                Some(buf.as_mut_ptr() as *mut c_void),
                (buf.len() * 2) as u32,
                Some(&mut needed),
            )?
        };
        let len = buf.iter().position(|c| *c == 0).unwrap_or(buf.len());
        Ok(String::from_utf16_lossy(&buf[..len]))
    }
}

impl Drop for DesktopObject {
    fn drop(&mut self) {
        if self.owned && let Err(e) = unsafe { CloseDesktop(self.handle) } {
            warn!("Failed to close desktop object: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_session_has_default_desktop() {
        let names = station_desktop_names().unwrap();
        assert!(names.iter().any(|n| n.eq_ignore_ascii_case("Default")));
    }

    #[test]
    fn thread_desktop_has_a_name() {
        let tid = unsafe { windows::Win32::System::Threading::GetCurrentThreadId() };
        let desktop = DesktopObject::of_thread(tid).unwrap();
        assert!(!desktop.name().unwrap().is_empty());
        assert!(!desktop.windows().unwrap().is_empty());
    }
}
