//! Monitor and display device enumeration.

use std::mem;

use log::{trace, warn};
use windows::Win32::Foundation::{LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    DISPLAY_DEVICEW, EnumDisplayDevicesW, EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
    MONITORINFOEXW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, MONITORINFOF_PRIMARY, SM_CMONITORS, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};
use windows::core::{BOOL, PCWSTR};

use crate::error::Result;
use crate::monitor::{MonitorInfo, assign_display_indices};
use crate::types::{Rect, WindowHandle};
use crate::win::window;

pub const DISPLAY_DEVICE_ATTACHED_TO_DESKTOP: u32 = 0x0000_0001;
pub const DISPLAY_DEVICE_PRIMARY_DEVICE: u32 = 0x0000_0004;

/// A display adapter output as reported by `EnumDisplayDevicesW`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayDevice {
    pub name: String,
    pub description: String,
    pub state_flags: u32,
    pub id: String,
    pub key: String,
}

impl DisplayDevice {
    pub fn is_attached(&self) -> bool {
        self.state_flags & DISPLAY_DEVICE_ATTACHED_TO_DESKTOP != 0
    }

    pub fn is_primary(&self) -> bool {
        self.state_flags & DISPLAY_DEVICE_PRIMARY_DEVICE != 0
    }
}

fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|c| *c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

extern "system" fn collect_monitors(hmonitor: HMONITOR, _hdc: HDC, _rect: *mut RECT, lparam: LPARAM) -> BOOL {
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<MonitorInfo>) };
    match describe(hmonitor) {
        Some(info) => {
            trace!("Enumerating monitor: handle={:#x}, device={}, bounds={:?}", info.handle, info.device_name, info.bounds);
            monitors.push(info);
        }
        None => warn!("GetMonitorInfoW failed for monitor {:?}", hmonitor),
    }
    TRUE
}

fn describe(hmonitor: HMONITOR) -> Option<MonitorInfo> {
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if !ok.as_bool() {
        return None;
    }
    Some(MonitorInfo {
        handle: hmonitor.0 as isize,
        index: 0,
        device_name: wide_to_string(&info.szDevice),
        bounds: info.monitorInfo.rcMonitor.into(),
        work_area: info.monitorInfo.rcWork.into(),
        primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
    })
}

/// All monitors, ordered and numbered by display number.
pub fn monitors() -> Result<Vec<MonitorInfo>> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();
    unsafe {
        EnumDisplayMonitors(None, None, Some(collect_monitors), LPARAM(&mut monitors as *mut _ as isize)).ok()?;
    }
    assign_display_indices(&mut monitors);
    Ok(monitors)
}

/// Monitor the window mostly lies on.
pub fn monitor_for_window(window: WindowHandle) -> Result<Option<MonitorInfo>> {
    let handle = window::monitor_handle(window);
    Ok(monitors()?.into_iter().find(|m| m.handle == handle))
}

pub fn display_devices() -> Vec<DisplayDevice> {
    let mut devices = Vec::new();
    for index in 0.. {
        let mut raw = DISPLAY_DEVICEW { cb: mem::size_of::<DISPLAY_DEVICEW>() as u32, ..Default::default() };
        if !unsafe { EnumDisplayDevicesW(PCWSTR::null(), index, &mut raw, 0) }.as_bool() {
            break;
        }
        devices.push(DisplayDevice {
            name: wide_to_string(&raw.DeviceName),
            description: wide_to_string(&raw.DeviceString),
            state_flags: raw.StateFlags.0,
            id: wide_to_string(&raw.DeviceID),
            key: wide_to_string(&raw.DeviceKey),
        });
    }
    devices
}

/// Rectangle spanning every monitor.
pub fn virtual_screen() -> Rect {
    unsafe {
        let left = GetSystemMetrics(SM_XVIRTUALSCREEN);
        let top = GetSystemMetrics(SM_YVIRTUALSCREEN);
        Rect::new(
            left,
            top,
            left + GetSystemMetrics(SM_CXVIRTUALSCREEN),
            top + GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    }
}

pub fn monitor_count() -> i32 {
    unsafe { GetSystemMetrics(SM_CMONITORS) }
}
