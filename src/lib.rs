//! Virtual desktop navigation for Windows hosts.
//!
//! [`DesktopNavigator`] switches between the shell's virtual desktops and
//! moves windows across them. It works against narrow capability traits
//! ([`navigator::shell`]); on Windows, [`win::ShellServices`] implements them
//! on top of the shell's COM interfaces and [`DeskNavInstance`] wires
//! everything up for hosts, including a C ABI.

pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod navigator;
pub mod types;
pub mod window;

#[cfg(windows)]
mod ffi;
#[cfg(windows)]
mod instance;
#[cfg(windows)]
pub mod win;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::monitor::MonitorInfo;
pub use crate::navigator::{DesktopNavigator, VirtualDesktopShell};
pub use crate::types::{
    DesktopId, DesktopTarget, Direction, EventCallback, EventRange, Outcome, Point, Rect, SendablePtr, Size,
    ViewSource, WinEvent, WinEventKind, WindowHandle,
};
pub use crate::window::WindowInfo;

#[cfg(windows)]
pub use crate::ffi::{
    LIBDESKNAV_INVALID_ARGUMENT, LIBDESKNAV_TARGET_INDEX, LIBDESKNAV_TARGET_NEXT, LIBDESKNAV_TARGET_PREVIOUS,
};
#[cfg(windows)]
pub use crate::instance::DeskNavInstance;
