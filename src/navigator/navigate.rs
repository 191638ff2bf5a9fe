//! Desktop indexing, adjacency navigation and window reassignment.

use log::{debug, trace, warn};

use crate::error::Result;
use crate::navigator::shell::{
    DesktopCatalog, DesktopNaming, DesktopSwitching, OwnerLookup, ViewCollection, ViewPinning, ViewPlacement,
    WindowMembership,
};
use crate::navigator::strategy::VIEW_STRATEGIES;
use crate::types::{DesktopTarget, Direction, Outcome, ViewSource, WindowHandle};

/// Request/response facade over the shell's virtual desktops.
///
/// Holds only the injected shell services. Every operation re-reads the
/// desktop list, and every desktop or view handle it obtains is dropped
/// (released) before the operation returns.
///
/// The shell objects are not re-entrant; callers serialize access.
pub struct DesktopNavigator<S> {
    shell: S,
}

impl<S> DesktopNavigator<S> {
    pub fn new(shell: S) -> Self {
        DesktopNavigator { shell }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn into_inner(self) -> S {
        self.shell
    }
}

impl<S: DesktopCatalog> DesktopNavigator<S> {
    /// Number of desktops right now, `0` if the shell can't say.
    pub fn desktop_count(&self) -> usize {
        match self.shell.desktop_count() {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to query desktop count: {}", e);
                0
            }
        }
    }

    /// Desktop at a zero-based position. Out-of-range input (including
    /// negative) yields `None`: the count can change under us at any time.
    pub fn desktop_at(&self, index: i64) -> Result<Option<S::Desktop>> {
        let Ok(index) = usize::try_from(index) else {
            trace!("Negative desktop index {}", index);
            return Ok(None);
        };
        self.shell.desktop_at(index)
    }

    /// Neighbor of the current desktop in `direction`.
    pub fn adjacent(&self, direction: Direction) -> Result<Option<S::Desktop>> {
        let current = self.shell.current_desktop()?;
        self.shell.adjacent_desktop(&current, direction)
    }

    fn first_desktop(&self) -> Result<Option<S::Desktop>> {
        self.shell.desktop_at(0)
    }

    fn last_desktop(&self) -> Result<Option<S::Desktop>> {
        match self.shell.desktop_count()? {
            0 => Ok(None),
            count => self.shell.desktop_at(count - 1),
        }
    }

    /// Resolves a target to a desktop. With `wrap_around`, "previous" from
    /// the first desktop lands on the last one and "next" from the last lands
    /// on the first; without it those resolve to `None`.
    pub fn resolve(&self, target: DesktopTarget, wrap_around: bool) -> Result<Option<S::Desktop>> {
        match target {
            DesktopTarget::Index(index) => self.desktop_at(index),
            DesktopTarget::Previous => match self.adjacent(Direction::Previous)? {
                Some(desktop) => Ok(Some(desktop)),
                None if wrap_around => {
                    debug!("No previous desktop, wrapping to last");
                    self.last_desktop()
                }
                None => Ok(None),
            },
            DesktopTarget::Next => match self.adjacent(Direction::Next)? {
                Some(desktop) => Ok(Some(desktop)),
                None if wrap_around => {
                    debug!("No next desktop, wrapping to first");
                    self.first_desktop()
                }
                None => Ok(None),
            },
        }
    }

    /// Position of the active desktop in the current list.
    pub fn current_desktop_index(&self) -> Option<usize> {
        let lookup = || -> Result<Option<usize>> {
            let current = self.shell.current_desktop()?;
            let current_id = self.shell.desktop_id(&current)?;
            for index in 0..self.shell.desktop_count()? {
                if let Some(desktop) = self.shell.desktop_at(index)?
                    && self.shell.desktop_id(&desktop)? == current_id
                {
                    return Ok(Some(index));
                }
            }
            Ok(None)
        };

        lookup().unwrap_or_else(|e| {
            warn!("Failed to locate current desktop: {}", e);
            None
        })
    }

    fn resolve_or_outcome(&self, target: DesktopTarget, wrap_around: bool) -> std::result::Result<S::Desktop, Outcome> {
        match self.resolve(target, wrap_around) {
            Ok(Some(desktop)) => Ok(desktop),
            Ok(None) => {
                debug!("Target {:?} (wrap_around={}) has no desktop", target, wrap_around);
                Err(Outcome::NoTarget)
            }
            Err(e) => {
                warn!("Failed to resolve target {:?}: {}", target, e);
                Err(Outcome::Rejected)
            }
        }
    }
}

impl<S: DesktopSwitching> DesktopNavigator<S> {
    /// Switches to `target`, issuing at most one switch request.
    pub fn switch(&self, target: DesktopTarget, wrap_around: bool) -> Outcome {
        let desktop = match self.resolve_or_outcome(target, wrap_around) {
            Ok(desktop) => desktop,
            Err(outcome) => return outcome,
        };

        match self.shell.switch_desktop(&desktop) {
            Ok(()) => {
                debug!("Switched desktop to {:?}", target);
                Outcome::Switched
            }
            Err(e) => {
                warn!("Desktop switch to {:?} failed: {}", target, e);
                Outcome::Rejected
            }
        }
    }

    pub fn switch_to_desktop(&self, index: i64) {
        let _ = self.switch(DesktopTarget::Index(index), false);
    }

    pub fn switch_to_previous_desktop(&self, wrap_around: bool) {
        let _ = self.switch(DesktopTarget::Previous, wrap_around);
    }

    pub fn switch_to_next_desktop(&self, wrap_around: bool) {
        let _ = self.switch(DesktopTarget::Next, wrap_around);
    }
}

impl<S: ViewCollection + OwnerLookup> DesktopNavigator<S> {
    /// Runs `action` on the first view the strategies produce. A failing
    /// action moves on to the next strategy. Returns the action's value, or
    /// `Rejected` if every view found was refused and `NoView` if none was found.
    fn with_view<T, F>(&self, window: WindowHandle, operation: &str, mut action: F) -> std::result::Result<T, Outcome>
    where
        F: FnMut(ViewSource, &S::View) -> Result<T>,
    {
        let mut tried: Vec<WindowHandle> = Vec::with_capacity(VIEW_STRATEGIES.len());
        let mut rejected = false;

        for source in VIEW_STRATEGIES {
            let handle = match source.candidate(&self.shell, window) {
                Ok(Some(handle)) => handle,
                Ok(None) => continue,
                Err(e) => {
                    warn!("{:?} lookup for {} failed: {}", source, window, e);
                    continue;
                }
            };
            if tried.contains(&handle) {
                continue;
            }
            tried.push(handle);

            let view = match self.shell.view_for_window(handle) {
                Ok(Some(view)) => view,
                Ok(None) => {
                    debug!("No view for {} ({:?})", handle, source);
                    continue;
                }
                Err(e) => {
                    warn!("View lookup for {} failed: {}", handle, e);
                    continue;
                }
            };

            match action(source, &view) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("{} via {:?} view of {} failed: {}", operation, source, handle, e);
                    rejected = true;
                }
            }
        }

        Err(if rejected { Outcome::Rejected } else { Outcome::NoView })
    }
}

impl<S: ViewPlacement + OwnerLookup> DesktopNavigator<S> {
    /// Moves `window` to `target`. Tries the window's own view first, then
    /// the view of its process's main window.
    pub fn reassign(&self, window: WindowHandle, target: DesktopTarget, wrap_around: bool) -> Outcome {
        let desktop = match self.resolve_or_outcome(target, wrap_around) {
            Ok(desktop) => desktop,
            Err(outcome) => return outcome,
        };

        let outcome = self
            .with_view(window, "Move", |source, view| {
                self.shell.move_view_to_desktop(view, &desktop)?;
                Ok(Outcome::Moved(source))
            })
            .unwrap_or_else(|failure| failure);
        debug!("Move of {} to {:?}: {:?}", window, target, outcome);
        outcome
    }

    pub fn move_window_to_desktop_at(&self, window: WindowHandle, index: i64) {
        let _ = self.reassign(window, DesktopTarget::Index(index), false);
    }

    pub fn move_window_to_previous_desktop(&self, window: WindowHandle, wrap_around: bool) {
        let _ = self.reassign(window, DesktopTarget::Previous, wrap_around);
    }

    pub fn move_window_to_next_desktop(&self, window: WindowHandle, wrap_around: bool) {
        let _ = self.reassign(window, DesktopTarget::Next, wrap_around);
    }
}

impl<S: ViewPinning + OwnerLookup> DesktopNavigator<S> {
    /// Pins the window so it shows on every desktop.
    pub fn pin_window(&self, window: WindowHandle) -> Outcome {
        if !self.shell.supports_pinning() {
            debug!("Window pinning not available");
            return Outcome::Unsupported;
        }
        self.with_view(window, "Pin", |_, view| self.shell.pin_view(view))
            .map_or_else(|failure| failure, |()| Outcome::Pinned)
    }

    pub fn unpin_window(&self, window: WindowHandle) -> Outcome {
        if !self.shell.supports_pinning() {
            debug!("Window pinning not available");
            return Outcome::Unsupported;
        }
        self.with_view(window, "Unpin", |_, view| self.shell.unpin_view(view))
            .map_or_else(|failure| failure, |()| Outcome::Unpinned)
    }

    /// `false` when pinning is unavailable or the window has no view.
    pub fn is_window_pinned(&self, window: WindowHandle) -> bool {
        if !self.shell.supports_pinning() {
            return false;
        }
        self.with_view(window, "Pinned query", |_, view| self.shell.is_view_pinned(view))
            .unwrap_or(false)
    }
}

impl<S: DesktopNaming> DesktopNavigator<S> {
    pub fn rename_desktop(&self, index: i64, name: &str) -> Outcome {
        if !self.shell.supports_naming() {
            debug!("Desktop naming not available");
            return Outcome::Unsupported;
        }

        let desktop = match self.resolve_or_outcome(DesktopTarget::Index(index), false) {
            Ok(desktop) => desktop,
            Err(outcome) => return outcome,
        };

        match self.shell.rename_desktop(&desktop, name) {
            Ok(()) => Outcome::Renamed,
            Err(e) => {
                warn!("Renaming desktop {} failed: {}", index, e);
                Outcome::Rejected
            }
        }
    }
}

impl<S: WindowMembership> DesktopNavigator<S> {
    /// Live answer from the shell; `false` when it can't tell.
    pub fn is_window_on_current_desktop(&self, window: WindowHandle) -> bool {
        match self.shell.is_window_on_current_desktop(window) {
            Ok(on_current) => on_current,
            Err(e) => {
                warn!("Membership query for {} failed: {}", window, e);
                false
            }
        }
    }
}
