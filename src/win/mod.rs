//! Win32 and shell bindings.
//!
//! Thin safe wrappers: marshalling and error translation only. Decisions
//! about desktops and windows live in the navigator.

pub mod com;
pub mod desktop;
pub mod events;
pub mod monitor;
pub mod mouse;
pub mod process;
pub mod shell;
pub mod thumbnail;
pub mod window;

pub use com::ComApartment;
pub use events::{EventHook, EventWatcher, WatchOptions};
pub use shell::ShellServices;
