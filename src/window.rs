//! Snapshot of a top-level window's properties.

use crate::types::{Rect, WindowHandle};

pub const WS_CHILD: u32 = 0x4000_0000;
pub const WS_EX_TRANSPARENT: u32 = 0x0000_0020;
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;
pub const WS_EX_LAYERED: u32 = 0x0008_0000;
pub const WS_EX_NOACTIVATE: u32 = 0x0800_0000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub class_name: String,
    pub process_id: u32,
    pub thread_id: u32,
    pub owner: WindowHandle,
    pub bounds: Rect,
    pub style: u32,
    pub ex_style: u32,
    pub visible: bool,
    pub minimized: bool,
    pub cloaked: bool,
}

impl WindowInfo {
    /// Whether the window would show up in the taskbar / Alt+Tab, which is
    /// what hosts list when offering windows to move between desktops.
    pub fn is_task_window(&self) -> bool {
        if !self.visible || self.cloaked || self.style & WS_CHILD != 0 {
            return false;
        }
        if self.class_name == "Progman" || self.class_name.starts_with("Shell_") {
            return false;
        }
        if self.ex_style & WS_EX_APPWINDOW != 0 {
            return true;
        }
        self.owner.is_null() && self.ex_style & (WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE) == 0 && !self.title.is_empty()
    }

    /// Whether the window paints over what's below it on screen.
    pub fn is_obscuring(&self) -> bool {
        self.visible && !self.minimized && !self.cloaked && self.ex_style & WS_EX_TRANSPARENT == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(title: &str, class_name: &str) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle(0x10),
            title: title.to_string(),
            class_name: class_name.to_string(),
            process_id: 42,
            thread_id: 7,
            owner: WindowHandle::NULL,
            bounds: Rect::new(0, 0, 800, 600),
            style: 0,
            ex_style: 0,
            visible: true,
            minimized: false,
            cloaked: false,
        }
    }

    #[test]
    fn plain_titled_window_is_a_task_window() {
        assert!(window("Notes", "Notepad").is_task_window());
    }

    #[test]
    fn shell_and_hidden_windows_are_not() {
        assert!(!window("Program Manager", "Progman").is_task_window());
        assert!(!window("", "Shell_TrayWnd").is_task_window());
        assert!(!WindowInfo { cloaked: true, ..window("Notes", "Notepad") }.is_task_window());
        assert!(!WindowInfo { visible: false, ..window("Notes", "Notepad") }.is_task_window());
        assert!(!window("", "Untitled").is_task_window());
    }

    #[test]
    fn owned_and_tool_windows_need_app_window_style() {
        let owned = WindowInfo { owner: WindowHandle(0x20), ..window("Find", "#32770") };
        assert!(!owned.is_task_window());
        assert!(WindowInfo { ex_style: WS_EX_APPWINDOW, ..owned.clone() }.is_task_window());

        let tool = WindowInfo { ex_style: WS_EX_TOOLWINDOW, ..window("Palette", "ToolWnd") };
        assert!(!tool.is_task_window());
    }

    #[test]
    fn minimized_and_transparent_windows_do_not_obscure() {
        assert!(window("Notes", "Notepad").is_obscuring());
        assert!(!WindowInfo { minimized: true, ..window("Notes", "Notepad") }.is_obscuring());
        assert!(!WindowInfo { ex_style: WS_EX_TRANSPARENT | WS_EX_LAYERED, ..window("Overlay", "Ov") }.is_obscuring());
    }
}
