//! Window-event hooks.
//!
//! [`EventHook`] is a bare registration. [`EventWatcher`] owns a thread with a
//! message loop, installs an out-of-context hook on it and hands every event
//! to a callback until stopped.

use std::cell::RefCell;
use std::mem;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, trace, warn};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent, WINEVENTPROC};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PM_NOREMOVE, PeekMessageW, PostThreadMessageW, TranslateMessage,
    WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS, WM_QUIT, WM_USER,
};

use crate::error::{Error, Result};
use crate::types::{EventCallback, EventRange, WinEvent};

const OBJID_WINDOW: i32 = 0;
const CHILDID_SELF: i32 = 0;

/// A registered event hook; unhooked on drop.
pub struct EventHook(HWINEVENTHOOK);

impl EventHook {
    /// Registers `callback` for `range`. For out-of-context hooks the
    /// callback runs on this thread, which must pump messages.
    ///
    /// # Safety
    ///
    /// `callback` must stay valid for as long as the hook is installed.
    pub unsafe fn install(range: EventRange, callback: WINEVENTPROC, process_id: u32, thread_id: u32, flags: u32) -> Result<Self> {
        let hook = unsafe { SetWinEventHook(range.min, range.max, None, callback, process_id, thread_id, flags) };
        if hook.is_invalid() {
            return Err(Error::rejected("install event hook", format!("range {:#x}..={:#x}", range.min, range.max)));
        }
        Ok(EventHook(hook))
    }
}

impl Drop for EventHook {
    fn drop(&mut self) {
        if !unsafe { UnhookWinEvent(self.0) }.as_bool() {
            warn!("Failed to unhook WinEventHook");
        }
    }
}

/// What the watcher forwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WatchOptions {
    pub range: EventRange,
    /// Drop events raised by this process's own windows.
    pub skip_own_process: bool,
    /// Only forward events about whole windows, not their child objects.
    pub windows_only: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        WatchOptions { range: EventRange::ALL, skip_own_process: true, windows_only: true }
    }
}

impl WatchOptions {
    fn hook_flags(&self) -> u32 {
        let mut flags = WINEVENT_OUTOFCONTEXT;
        if self.skip_own_process {
            flags |= WINEVENT_SKIPOWNPROCESS;
        }
        flags
    }

    fn accepts(&self, event: &WinEvent) -> bool {
        self.range.contains(event.event)
            && (!self.windows_only || (event.object_id == OBJID_WINDOW && event.child_id == CHILDID_SELF))
    }
}

struct WatcherThread {
    options: WatchOptions,
    callback: EventCallback,
}

thread_local! {
    static WATCHER: RefCell<Option<WatcherThread>> = const { RefCell::new(None) };
}

extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    object_id: i32,
    child_id: i32,
    thread_id: u32,
    timestamp: u32,
) {
    let event = WinEvent { event, window: hwnd.into(), object_id, child_id, thread_id, timestamp };
    WATCHER.with(|w| match w.borrow().as_ref() {
        Some(watcher) if watcher.options.accepts(&event) => {
            trace!("Forwarding event {:?} for {}", event.kind(), event.window);
            (watcher.callback)(&event);
        }
        Some(_) => {}
        None => warn!("Event {:#x} arrived with no watcher installed", event.event),
    });
}

#[derive(Default)]
struct WatcherState {
    thread_id: Option<u32>,
    thread: Option<JoinHandle<()>>,
}

/// Background thread forwarding window events to a callback.
pub struct EventWatcher(Arc<Mutex<WatcherState>>);

impl EventWatcher {
    /// Starts the watcher thread and waits until its hook is installed.
    pub fn start(options: WatchOptions, callback: EventCallback) -> Result<Self> {
        let state = Arc::new(Mutex::new(WatcherState::default()));
        let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<(), String>>();

        let thread_state = Arc::clone(&state);
        let th = thread::spawn(move || {
            info!("Spawned event watcher thread");
            let tid = unsafe { GetCurrentThreadId() };

            // Create the message queue before anyone can post WM_QUIT to it.
            let mut msg = unsafe { mem::zeroed::<MSG>() };
            let _ = unsafe { PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE) };
            if let Ok(mut state) = thread_state.lock() {
                state.thread_id = Some(tid);
            }

            WATCHER.with(|w| *w.borrow_mut() = Some(WatcherThread { options, callback }));
            let hook = match unsafe { EventHook::install(options.range, Some(win_event_proc), 0, 0, options.hook_flags()) } {
                Ok(hook) => hook,
                Err(e) => {
                    error!("Failed to set WinEventHook: {}", e);
                    WATCHER.with(|w| *w.borrow_mut() = None);
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            debug!("WinEventHook set for {:#x}..={:#x}", options.range.min, options.range.max);
            let _ = ready_tx.send(Ok(()));

            loop {
                let got = unsafe { GetMessageW(&mut msg, None, 0, 0) };
                if got.0 == 0 || got.0 == -1 {
                    debug!("Received quit message or error, exiting loop");
                    break;
                }
                unsafe {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            }

            drop(hook);
            WATCHER.with(|w| *w.borrow_mut() = None);
            info!("Event watcher thread exiting");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => {
                if let Ok(mut state) = state.lock() {
                    state.thread = Some(th);
                }
                Ok(EventWatcher(state))
            }
            Ok(Err(reason)) => {
                let _ = th.join();
                Err(Error::rejected("watch window events", reason))
            }
            Err(_) => {
                let _ = th.join();
                Err(Error::rejected("watch window events", "watcher thread exited during startup"))
            }
        }
    }

    /// Ends the message loop and joins the thread. Idempotent.
    pub fn stop(&mut self) {
        let (tid, th) = match self.0.lock() {
            Ok(mut state) => (state.thread_id.take(), state.thread.take()),
            Err(e) => {
                error!("Event watcher state poisoned: {}", e);
                return;
            }
        };

        if let Some(tid) = tid
            && let Err(e) = unsafe { PostThreadMessageW(tid, WM_QUIT, WPARAM(0), LPARAM(0)) }
        {
            warn!("Failed to post quit message to watcher thread: {}", e);
        }

        if let Some(th) = th {
            if let Err(e) = th.join() {
                error!("Failed to join watcher thread: {:?}", e);
            } else {
                debug!("Watcher thread joined successfully");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.0.lock().map(|s| s.thread.is_some()).unwrap_or(false)
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
