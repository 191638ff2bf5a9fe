//! Window enumeration, queries and manipulation.

use std::mem;

use log::{trace, warn};
use windows::Win32::Foundation::{HWND, LPARAM, RECT, TRUE, WPARAM};
use windows::Win32::Graphics::Dwm::{DWMWA_CLOAKED, DwmGetWindowAttribute};
use windows::Win32::Graphics::Gdi::{MONITOR_DEFAULTTONEAREST, MonitorFromWindow};
use windows::Win32::System::Threading::AttachThreadInput;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetActiveWindow, SetActiveWindow, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::BOOL;

use crate::error::{Result, check_bool};
use crate::types::{Point, Rect, WindowHandle};
use crate::window::WindowInfo;

/// Saved show state and positions of a window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowPlacement {
    pub show_command: u32,
    pub min_position: Point,
    pub max_position: Point,
    pub normal_position: Rect,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShowCommand {
    Hide,
    Normal,
    Minimize,
    Maximize,
    Restore,
    ShowNoActivate,
}

impl ShowCommand {
    fn raw(self) -> SHOW_WINDOW_CMD {
        match self {
            ShowCommand::Hide => SW_HIDE,
            ShowCommand::Normal => SW_SHOWNORMAL,
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Maximize => SW_MAXIMIZE,
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::ShowNoActivate => SW_SHOWNOACTIVATE,
        }
    }
}

extern "system" fn collect_windows(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowHandle>) };
    windows.push(hwnd.into());
    TRUE
}

/// All top-level windows, in z-order.
pub fn root_windows() -> Result<Vec<WindowHandle>> {
    let mut windows: Vec<WindowHandle> = Vec::new();
    unsafe { EnumWindows(Some(collect_windows), LPARAM(&mut windows as *mut _ as isize))? };
    trace!("Enumerated {} top-level windows", windows.len());
    Ok(windows)
}

pub fn child_windows(parent: WindowHandle) -> Vec<WindowHandle> {
    let mut windows: Vec<WindowHandle> = Vec::new();
    // The return value carries no meaning for EnumChildWindows.
    let _ = unsafe { EnumChildWindows(Some(parent.into()), Some(collect_windows), LPARAM(&mut windows as *mut _ as isize)) };
    windows
}

pub fn desktop_window() -> WindowHandle {
    unsafe { GetDesktopWindow() }.into()
}

pub fn foreground_window() -> WindowHandle {
    unsafe { GetForegroundWindow() }.into()
}

/// Active window of the calling thread's message queue.
pub fn active_window() -> WindowHandle {
    unsafe { GetActiveWindow() }.into()
}

pub fn parent(window: WindowHandle) -> Option<WindowHandle> {
    unsafe { GetParent(window.into()) }.ok().map(WindowHandle::from).filter(|h| !h.is_null())
}

pub fn owner(window: WindowHandle) -> Option<WindowHandle> {
    unsafe { GetWindow(window.into(), GW_OWNER) }.ok().map(WindowHandle::from).filter(|h| !h.is_null())
}

/// `(thread id, process id)` of the thread that created the window; zeros
/// for a stale handle.
pub fn thread_process_id(window: WindowHandle) -> (u32, u32) {
    let mut pid = 0u32;
    let tid = unsafe { GetWindowThreadProcessId(window.into(), Some(&mut pid)) };
    (tid, pid)
}

pub fn window_rect(window: WindowHandle) -> Result<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(window.into(), &mut rect)? };
    Ok(rect.into())
}

pub fn client_rect(window: WindowHandle) -> Result<Rect> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(window.into(), &mut rect)? };
    Ok(rect.into())
}

pub fn is_window(window: WindowHandle) -> bool {
    unsafe { IsWindow(Some(window.into())) }.as_bool()
}

pub fn is_visible(window: WindowHandle) -> bool {
    unsafe { IsWindowVisible(window.into()) }.as_bool()
}

pub fn is_minimized(window: WindowHandle) -> bool {
    unsafe { IsIconic(window.into()) }.as_bool()
}

/// Whether DWM hides the window, which is how windows on other virtual
/// desktops are kept off screen.
pub fn is_cloaked(window: WindowHandle) -> bool {
    let mut cloaked = 0u32;
    let hr = unsafe {
        DwmGetWindowAttribute(
            window.into(),
            DWMWA_CLOAKED,
            &mut cloaked as *mut _ as *mut _,
            mem::size_of::<u32>() as u32,
        )
    };
    hr.is_ok() && cloaked != 0
}

pub fn text(window: WindowHandle) -> String {
    let len = unsafe { GetWindowTextLengthW(window.into()) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(window.into(), &mut buf) };
    String::from_utf16_lossy(&buf[..copied.max(0) as usize])
}

pub fn class_name(window: WindowHandle) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetClassNameW(window.into(), &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

pub fn placement(window: WindowHandle) -> Result<WindowPlacement> {
    let mut raw = WINDOWPLACEMENT { length: mem::size_of::<WINDOWPLACEMENT>() as u32, ..Default::default() };
    unsafe { GetWindowPlacement(window.into(), &mut raw)? };
    Ok(WindowPlacement {
        show_command: raw.showCmd,
        min_position: raw.ptMinPosition.into(),
        max_position: raw.ptMaxPosition.into(),
        normal_position: raw.rcNormalPosition.into(),
    })
}

/// Moves and resizes without touching z-order or activation.
pub fn move_window(window: WindowHandle, bounds: Rect) -> Result<()> {
    unsafe {
        SetWindowPos(
            window.into(),
            None,
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            SWP_NOZORDER | SWP_NOACTIVATE,
        )?
    };
    Ok(())
}

/// Raw `SetWindowPos`; `insert_after` of `None` leaves z-order to `flags`.
pub fn set_window_pos(
    window: WindowHandle,
    insert_after: Option<WindowHandle>,
    bounds: Rect,
    flags: SET_WINDOW_POS_FLAGS,
) -> Result<()> {
    unsafe {
        SetWindowPos(
            window.into(),
            insert_after.map(HWND::from),
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            flags,
        )?
    };
    Ok(())
}

/// Posts the show command without waiting on the window's thread.
pub fn show(window: WindowHandle, command: ShowCommand) -> bool {
    unsafe { ShowWindowAsync(window.into(), command.raw()) }.as_bool()
}

pub fn set_foreground(window: WindowHandle) -> bool {
    unsafe { SetForegroundWindow(window.into()) }.as_bool()
}

/// Returns the previously active window.
pub fn set_active(window: WindowHandle) -> Result<WindowHandle> {
    Ok(unsafe { SetActiveWindow(window.into())? }.into())
}

/// Returns the window that previously had keyboard focus.
pub fn set_focus(window: WindowHandle) -> Result<WindowHandle> {
    Ok(unsafe { SetFocus(Some(window.into()))? }.into())
}

pub fn attach_thread_input(thread_id: u32, to_thread_id: u32, attach: bool) -> Result<()> {
    check_bool(unsafe { AttachThreadInput(thread_id, to_thread_id, attach) }.as_bool())
}

/// Brings `window` to the foreground from a thread that does not own the
/// current foreground window, by briefly sharing input state with it.
pub fn activate(window: WindowHandle) -> bool {
    let foreground = foreground_window();
    let (foreground_thread, _) = thread_process_id(foreground);
    let current_thread = unsafe { windows::Win32::System::Threading::GetCurrentThreadId() };

    let attached = foreground_thread != 0
        && foreground_thread != current_thread
        && attach_thread_input(current_thread, foreground_thread, true).is_ok();

    if is_minimized(window) {
        show(window, ShowCommand::Restore);
    }
    let activated = set_foreground(window);
    if let Err(e) = set_focus(window) {
        trace!("SetFocus failed for {}: {}", window, e);
    }

    if attached && let Err(e) = attach_thread_input(current_thread, foreground_thread, false) {
        warn!("Failed to detach thread input from {}: {}", foreground_thread, e);
    }
    activated
}

pub fn style(window: WindowHandle) -> u32 {
    unsafe { GetWindowLongW(window.into(), GWL_STYLE) as u32 }
}

pub fn ex_style(window: WindowHandle) -> u32 {
    unsafe { GetWindowLongW(window.into(), GWL_EXSTYLE) as u32 }
}

/// Raw `HMONITOR` of the monitor the window mostly lies on.
pub fn monitor_handle(window: WindowHandle) -> isize {
    unsafe { MonitorFromWindow(window.into(), MONITOR_DEFAULTTONEAREST) }.0 as isize
}

/// Raw `HICON` the window shows in Alt+Tab; 0 when it has none.
pub fn icon(window: WindowHandle) -> isize {
    let sent = unsafe { SendMessageW(window.into(), WM_GETICON, Some(WPARAM(ICON_BIG as usize)), Some(LPARAM(0))) };
    if sent.0 != 0 {
        return sent.0;
    }
    class_icon(window)
}

#[cfg(target_pointer_width = "64")]
fn class_icon(window: WindowHandle) -> isize {
    unsafe { GetClassLongPtrW(window.into(), GCLP_HICON) as isize }
}

#[cfg(not(target_pointer_width = "64"))]
fn class_icon(window: WindowHandle) -> isize {
    unsafe { GetClassLongW(window.into(), GCLP_HICON) as isize }
}

pub fn info(window: WindowHandle) -> Result<WindowInfo> {
    let (thread_id, process_id) = thread_process_id(window);
    Ok(WindowInfo {
        handle: window,
        title: text(window),
        class_name: class_name(window),
        process_id,
        thread_id,
        owner: owner(window).unwrap_or(WindowHandle::NULL),
        bounds: window_rect(window)?,
        style: style(window),
        ex_style: ex_style(window),
        visible: is_visible(window),
        minimized: is_minimized(window),
        cloaked: is_cloaked(window),
    })
}

/// Snapshots of the windows a user would switch between.
pub fn task_windows() -> Result<Vec<WindowInfo>> {
    let mut windows = Vec::new();
    for handle in root_windows()? {
        match info(handle) {
            Ok(info) if info.is_task_window() => windows.push(info),
            Ok(_) => {}
            Err(e) => trace!("Skipping window {} that vanished: {}", handle, e),
        }
    }
    Ok(windows)
}

struct MainWindowSearch {
    process_id: u32,
    found: Option<WindowHandle>,
}

extern "system" fn find_main_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let search = unsafe { &mut *(lparam.0 as *mut MainWindowSearch) };
    let handle = WindowHandle::from(hwnd);
    let (_, pid) = thread_process_id(handle);
    if pid == search.process_id && is_visible(handle) && owner(handle).is_none() {
        search.found = Some(handle);
        return BOOL(0);
    }
    TRUE
}

/// First visible, unowned top-level window of the process that created
/// `window`.
pub fn process_main_window(window: WindowHandle) -> Result<Option<WindowHandle>> {
    let (_, process_id) = thread_process_id(window);
    if process_id == 0 {
        trace!("Window {} has no owning process", window);
        return Ok(None);
    }
    let mut search = MainWindowSearch { process_id, found: None };
    // Stopping early makes EnumWindows report failure; the search result is
    // what counts.
    let _ = unsafe { EnumWindows(Some(find_main_window), LPARAM(&mut search as *mut _ as isize)) };
    trace!("Main window of process {}: {:?}", process_id, search.found);
    Ok(search.found)
}
