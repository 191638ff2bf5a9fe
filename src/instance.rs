//! Core DeskNavInstance implementation.
//!
//! The instance is what hosts hold on to: it sets up logging, DPI awareness
//! and COM for the calling thread, connects to the shell and owns the event
//! watcher. It must be used from the thread that created it.

use log::{debug, error, info, warn};
use windows::Win32::UI::HiDpi::{DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext};

use crate::config::Config;
use crate::error::Result;
use crate::logging;
use crate::monitor::MonitorInfo;
use crate::navigator::DesktopNavigator;
use crate::types::{EventCallback, WinEvent};
use crate::win::{self, ComApartment, EventWatcher, ShellServices, WatchOptions};
use crate::window::WindowInfo;

pub struct DeskNavInstance {
    config: Config,
    watcher: Option<EventWatcher>,
    // Drops before the apartment it was created in.
    navigator: DesktopNavigator<ShellServices>,
    _com: ComApartment,
}

impl DeskNavInstance {
    pub fn new(config: Config) -> Result<Self> {
        if let Err(e) = logging::init(&config) {
            error!("Logging to stderr instead of the configured file: {}", e);
        }

        if config.dpi_aware {
            let res = unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) };
            if let Err(e) = res {
                warn!("Failed to set DPI awareness context: {}", e);
            }
        }

        let com = ComApartment::enter()?;
        let shell = ShellServices::connect()?;
        let navigator = DesktopNavigator::new(shell);

        info!("Created new DeskNavInstance ({} desktops)", navigator.desktop_count());
        Ok(DeskNavInstance { config, watcher: None, navigator, _com: com })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigator(&self) -> &DesktopNavigator<ShellServices> {
        &self.navigator
    }

    pub fn monitors(&self) -> Result<Vec<MonitorInfo>> {
        win::monitor::monitors()
    }

    pub fn task_windows(&self) -> Result<Vec<WindowInfo>> {
        win::window::task_windows()
    }

    /// Starts forwarding window events to `callback` on a background thread.
    /// Returns `false` if a watcher is already running or the hook could not
    /// be installed.
    pub fn watch_window_events(
        &mut self,
        options: WatchOptions,
        callback: impl Fn(&WinEvent) + Send + 'static,
    ) -> bool {
        if self.watcher.as_ref().is_some_and(EventWatcher::is_running) {
            warn!("Watcher thread already running, cannot start new one");
            return false;
        }
        let callback: EventCallback = Box::new(callback);
        match EventWatcher::start(options, callback) {
            Ok(watcher) => {
                info!("Started watching window events");
                self.watcher = Some(watcher);
                true
            }
            Err(e) => {
                warn!("Failed to start window event watcher: {}", e);
                false
            }
        }
    }

    /// Returns `false` when no watcher was running.
    pub fn stop_watch_window_events(&mut self) -> bool {
        match self.watcher.take() {
            Some(mut watcher) => {
                info!("Stopping window event watcher");
                watcher.stop();
                true
            }
            None => {
                debug!("No window event watcher to stop");
                false
            }
        }
    }

    pub fn deinit(&mut self) {
        let _ = self.stop_watch_window_events();
    }
}

impl Drop for DeskNavInstance {
    fn drop(&mut self) {
        self.deinit();
    }
}
