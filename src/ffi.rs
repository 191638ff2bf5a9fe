use std::ffi::{CStr, c_char, c_void};

use log::warn;

use crate::types::{DesktopTarget, EventRange, SendablePtr, WinEvent, WindowHandle};
use crate::win::WatchOptions;
use crate::{Config, DeskNavInstance};

/// Returned in place of an outcome code when the handle or an argument is
/// unusable.
pub const LIBDESKNAV_INVALID_ARGUMENT: i32 = -100;

pub const LIBDESKNAV_TARGET_INDEX: i32 = 0;
pub const LIBDESKNAV_TARGET_PREVIOUS: i32 = 1;
pub const LIBDESKNAV_TARGET_NEXT: i32 = 2;

fn target_from_raw(kind: i32, index: i64) -> Option<DesktopTarget> {
    match kind {
        LIBDESKNAV_TARGET_INDEX => Some(DesktopTarget::Index(index)),
        LIBDESKNAV_TARGET_PREVIOUS => Some(DesktopTarget::Previous),
        LIBDESKNAV_TARGET_NEXT => Some(DesktopTarget::Next),
        _ => None,
    }
}

fn instance<'a>(handle: *const DeskNavInstance) -> Option<&'a DeskNavInstance> {
    unsafe { handle.as_ref() }
}

/// Null when the shell could not be reached; see the log for why.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_init() -> *mut DeskNavInstance {
    match DeskNavInstance::new(Config::from_env()) {
        Ok(instance) => Box::into_raw(Box::new(instance)),
        Err(e) => {
            warn!("Failed to create DeskNavInstance: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_destroy(handle: *mut DeskNavInstance) {
    if handle.is_null() {
        return;
    }

    let mut state = unsafe { Box::from_raw(handle) };
    state.deinit();
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_switch_to_desktop(handle: *const DeskNavInstance, index: i64) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().switch_to_desktop(index);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_switch_to_previous_desktop(handle: *const DeskNavInstance, wrap_around: i32) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().switch_to_previous_desktop(wrap_around != 0);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_switch_to_next_desktop(handle: *const DeskNavInstance, wrap_around: i32) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().switch_to_next_desktop(wrap_around != 0);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_move_window_to_desktop_at(
    handle: *const DeskNavInstance,
    window: isize,
    index: i64,
) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().move_window_to_desktop_at(WindowHandle(window), index);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_move_window_to_previous_desktop(
    handle: *const DeskNavInstance,
    window: isize,
    wrap_around: i32,
) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().move_window_to_previous_desktop(WindowHandle(window), wrap_around != 0);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_move_window_to_next_desktop(
    handle: *const DeskNavInstance,
    window: isize,
    wrap_around: i32,
) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().move_window_to_next_desktop(WindowHandle(window), wrap_around != 0);
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_is_window_on_current_desktop(handle: *const DeskNavInstance, window: isize) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().is_window_on_current_desktop(WindowHandle(window)) as i32
}

/// Outcome code of the switch, or `LIBDESKNAV_INVALID_ARGUMENT`.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_switch(
    handle: *const DeskNavInstance,
    target_kind: i32,
    index: i64,
    wrap_around: i32,
) -> i32 {
    let (Some(state), Some(target)) = (instance(handle), target_from_raw(target_kind, index)) else {
        return LIBDESKNAV_INVALID_ARGUMENT;
    };
    state.navigator().switch(target, wrap_around != 0).code()
}

/// Outcome code of the move, or `LIBDESKNAV_INVALID_ARGUMENT`.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_reassign(
    handle: *const DeskNavInstance,
    window: isize,
    target_kind: i32,
    index: i64,
    wrap_around: i32,
) -> i32 {
    let (Some(state), Some(target)) = (instance(handle), target_from_raw(target_kind, index)) else {
        return LIBDESKNAV_INVALID_ARGUMENT;
    };
    state.navigator().reassign(WindowHandle(window), target, wrap_around != 0).code()
}

/// -1 for a null handle.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_desktop_count(handle: *const DeskNavInstance) -> i64 {
    instance(handle).map_or(-1, |state| state.navigator().desktop_count() as i64)
}

/// -1 when unknown.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_current_desktop_index(handle: *const DeskNavInstance) -> i64 {
    instance(handle)
        .and_then(|state| state.navigator().current_desktop_index())
        .map_or(-1, |index| index as i64)
}

/// `name` is a NUL-terminated UTF-8 string.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_rename_desktop(handle: *const DeskNavInstance, index: i64, name: *const c_char) -> i32 {
    let Some(state) = instance(handle) else { return LIBDESKNAV_INVALID_ARGUMENT };
    if name.is_null() {
        return LIBDESKNAV_INVALID_ARGUMENT;
    }
    let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else {
        warn!("Desktop name is not valid UTF-8");
        return LIBDESKNAV_INVALID_ARGUMENT;
    };
    state.navigator().rename_desktop(index, name).code()
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_pin_window(handle: *const DeskNavInstance, window: isize) -> i32 {
    instance(handle).map_or(LIBDESKNAV_INVALID_ARGUMENT, |state| {
        state.navigator().pin_window(WindowHandle(window)).code()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_unpin_window(handle: *const DeskNavInstance, window: isize) -> i32 {
    instance(handle).map_or(LIBDESKNAV_INVALID_ARGUMENT, |state| {
        state.navigator().unpin_window(WindowHandle(window)).code()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_is_window_pinned(handle: *const DeskNavInstance, window: isize) -> i32 {
    let Some(state) = instance(handle) else { return 0 };
    state.navigator().is_window_pinned(WindowHandle(window)) as i32
}

/// Calls `callback` on a background thread for every top-level window event
/// in `event_min..=event_max` raised by other processes.
#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_watch_window_events(
    handle: *mut DeskNavInstance,
    callback: Option<extern "C" fn(*const WinEvent, *mut c_void)>,
    event_min: u32,
    event_max: u32,
    user_data: *mut c_void,
) -> i32 {
    let Some(callback) = callback else { return 0 };
    if handle.is_null() || event_min > event_max {
        return 0;
    }

    let state = unsafe { &mut *handle };
    let user_data = SendablePtr(user_data);
    let options = WatchOptions { range: EventRange { min: event_min, max: event_max }, ..WatchOptions::default() };

    let rust_callback = move |event: &WinEvent| {
        // Capture the whole wrapper, not its non-Send field.
        let user_data = &user_data;
        callback(event as *const WinEvent, user_data.0);
    };

    if state.watch_window_events(options, rust_callback) { 1 } else { 0 }
}

#[unsafe(no_mangle)]
pub extern "C" fn libdesknav_stop_watch_window_events(handle: *mut DeskNavInstance) -> i32 {
    if handle.is_null() {
        return 0;
    }

    let state = unsafe { &mut *handle };

    if state.stop_watch_window_events() { 1 } else { 0 }
}
