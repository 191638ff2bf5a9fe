//! In-memory shell used by the navigator tests. Counts every desktop and view
//! handle it hands out and every one that gets dropped.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::navigator::shell::{
    DesktopCatalog, DesktopNaming, DesktopSwitching, OwnerLookup, ViewCollection, ViewPinning, ViewPlacement,
    WindowMembership,
};
use crate::types::{DesktopId, Direction, WindowHandle};

#[derive(Default)]
pub(crate) struct Ledger {
    acquired: Cell<usize>,
    released: Cell<usize>,
}

impl Ledger {
    fn acquire(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub(crate) fn released(&self) -> usize {
        self.released.get()
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }
}

pub(crate) struct FakeDesktop {
    id: u32,
    ledger: Rc<Ledger>,
}

impl FakeDesktop {
    fn new(id: u32, ledger: &Rc<Ledger>) -> Self {
        ledger.acquire();
        FakeDesktop { id, ledger: Rc::clone(ledger) }
    }
}

impl Drop for FakeDesktop {
    fn drop(&mut self) {
        self.ledger.release();
    }
}

pub(crate) struct FakeView {
    window: WindowHandle,
    ledger: Rc<Ledger>,
}

impl FakeView {
    fn new(window: WindowHandle, ledger: &Rc<Ledger>) -> Self {
        ledger.acquire();
        FakeView { window, ledger: Rc::clone(ledger) }
    }
}

impl Drop for FakeView {
    fn drop(&mut self) {
        self.ledger.release();
    }
}

#[derive(Default)]
struct FakeState {
    desktops: Vec<u32>,
    current: usize,
    /// Windows that have a view, and the id of the desktop the view is on.
    views: HashMap<WindowHandle, u32>,
    owners: HashMap<WindowHandle, WindowHandle>,
    rejected_moves: HashSet<WindowHandle>,
    pinned: HashSet<WindowHandle>,
    names: HashMap<u32, String>,
    naming: bool,
    pinning: bool,
    reject_switches: bool,
    fail_adjacency: bool,
    failed_view_lookups: HashSet<WindowHandle>,
    fail_owner_lookup: bool,
    switch_requests: usize,
    move_requests: usize,
    view_lookups: usize,
    owner_lookups: usize,
}

pub(crate) struct FakeShell {
    pub(crate) ledger: Rc<Ledger>,
    state: RefCell<FakeState>,
}

impl FakeShell {
    /// `count` desktops with ids 100, 101, ... and `current` active.
    pub(crate) fn new(count: usize, current: usize) -> Self {
        let state = FakeState {
            desktops: (0..count as u32).map(|i| 100 + i).collect(),
            current,
            ..FakeState::default()
        };
        FakeShell { ledger: Rc::new(Ledger::default()), state: RefCell::new(state) }
    }

    pub(crate) fn with_view(self, window: WindowHandle, desktop_index: usize) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let id = state.desktops[desktop_index];
            state.views.insert(window, id);
        }
        self
    }

    pub(crate) fn with_owner(self, window: WindowHandle, main_window: WindowHandle) -> Self {
        self.state.borrow_mut().owners.insert(window, main_window);
        self
    }

    pub(crate) fn rejecting_moves_for(self, window: WindowHandle) -> Self {
        self.state.borrow_mut().rejected_moves.insert(window);
        self
    }

    pub(crate) fn rejecting_switches(self) -> Self {
        self.state.borrow_mut().reject_switches = true;
        self
    }

    pub(crate) fn with_naming(self) -> Self {
        self.state.borrow_mut().naming = true;
        self
    }

    pub(crate) fn with_pinning(self) -> Self {
        self.state.borrow_mut().pinning = true;
        self
    }

    pub(crate) fn failing_adjacency(self) -> Self {
        self.state.borrow_mut().fail_adjacency = true;
        self
    }

    pub(crate) fn failing_view_lookup_for(self, window: WindowHandle) -> Self {
        self.state.borrow_mut().failed_view_lookups.insert(window);
        self
    }

    pub(crate) fn failing_owner_lookup(self) -> Self {
        self.state.borrow_mut().fail_owner_lookup = true;
        self
    }

    pub(crate) fn current_index(&self) -> usize {
        self.state.borrow().current
    }

    pub(crate) fn desktop_of(&self, window: WindowHandle) -> Option<usize> {
        let state = self.state.borrow();
        let id = state.views.get(&window)?;
        state.desktops.iter().position(|d| d == id)
    }

    pub(crate) fn desktop_name(&self, index: usize) -> Option<String> {
        let state = self.state.borrow();
        state.names.get(&state.desktops[index]).cloned()
    }

    pub(crate) fn switch_requests(&self) -> usize {
        self.state.borrow().switch_requests
    }

    pub(crate) fn move_requests(&self) -> usize {
        self.state.borrow().move_requests
    }

    pub(crate) fn view_lookups(&self) -> usize {
        self.state.borrow().view_lookups
    }

    pub(crate) fn owner_lookups(&self) -> usize {
        self.state.borrow().owner_lookups
    }

    fn position(&self, desktop: &FakeDesktop) -> Result<usize> {
        self.state
            .borrow()
            .desktops
            .iter()
            .position(|id| *id == desktop.id)
            .ok_or_else(|| Error::rejected("desktop lookup", "desktop no longer exists"))
    }
}

impl DesktopCatalog for FakeShell {
    type Desktop = FakeDesktop;

    fn desktop_count(&self) -> Result<usize> {
        Ok(self.state.borrow().desktops.len())
    }

    fn desktop_at(&self, index: usize) -> Result<Option<FakeDesktop>> {
        Ok(self.state.borrow().desktops.get(index).map(|id| FakeDesktop::new(*id, &self.ledger)))
    }

    fn current_desktop(&self) -> Result<FakeDesktop> {
        let state = self.state.borrow();
        let id = state
            .desktops
            .get(state.current)
            .ok_or_else(|| Error::rejected("current desktop", "no desktops"))?;
        Ok(FakeDesktop::new(*id, &self.ledger))
    }

    fn adjacent_desktop(&self, from: &FakeDesktop, direction: Direction) -> Result<Option<FakeDesktop>> {
        if self.state.borrow().fail_adjacency {
            return Err(Error::rejected("adjacent desktop", "shell unavailable"));
        }
        let position = self.position(from)?;
        let state = self.state.borrow();
        let neighbor = match direction {
            Direction::Previous => position.checked_sub(1),
            Direction::Next => Some(position + 1).filter(|p| *p < state.desktops.len()),
        };
        Ok(neighbor.map(|p| FakeDesktop::new(state.desktops[p], &self.ledger)))
    }

    fn desktop_id(&self, desktop: &FakeDesktop) -> Result<DesktopId> {
        Ok(DesktopId(desktop.id as u128))
    }
}

impl DesktopSwitching for FakeShell {
    fn switch_desktop(&self, desktop: &FakeDesktop) -> Result<()> {
        let position = self.position(desktop)?;
        let mut state = self.state.borrow_mut();
        state.switch_requests += 1;
        if state.reject_switches {
            return Err(Error::rejected("switch", "access denied"));
        }
        state.current = position;
        Ok(())
    }
}

impl DesktopNaming for FakeShell {
    fn supports_naming(&self) -> bool {
        self.state.borrow().naming
    }

    fn rename_desktop(&self, desktop: &FakeDesktop, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.naming {
            return Err(Error::Unsupported("desktop naming"));
        }
        state.names.insert(desktop.id, name.to_string());
        Ok(())
    }
}

impl ViewCollection for FakeShell {
    type View = FakeView;

    fn view_for_window(&self, window: WindowHandle) -> Result<Option<FakeView>> {
        let mut state = self.state.borrow_mut();
        state.view_lookups += 1;
        if state.failed_view_lookups.contains(&window) {
            return Err(Error::rejected("view lookup", "element not found"));
        }
        Ok(state.views.contains_key(&window).then(|| FakeView::new(window, &self.ledger)))
    }
}

impl ViewPlacement for FakeShell {
    fn move_view_to_desktop(&self, view: &FakeView, desktop: &FakeDesktop) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.move_requests += 1;
        if state.rejected_moves.contains(&view.window) {
            return Err(Error::rejected("move view", "access denied"));
        }
        state.views.insert(view.window, desktop.id);
        Ok(())
    }
}

impl ViewPinning for FakeShell {
    fn supports_pinning(&self) -> bool {
        self.state.borrow().pinning
    }

    fn is_view_pinned(&self, view: &FakeView) -> Result<bool> {
        Ok(self.state.borrow().pinned.contains(&view.window))
    }

    fn pin_view(&self, view: &FakeView) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.pinning {
            return Err(Error::Unsupported("pinned apps"));
        }
        state.pinned.insert(view.window);
        Ok(())
    }

    fn unpin_view(&self, view: &FakeView) -> Result<()> {
        self.state.borrow_mut().pinned.remove(&view.window);
        Ok(())
    }
}

impl WindowMembership for FakeShell {
    fn is_window_on_current_desktop(&self, window: WindowHandle) -> Result<bool> {
        let state = self.state.borrow();
        let current = state.desktops.get(state.current);
        Ok(state.views.get(&window).is_some_and(|id| Some(id) == current))
    }
}

impl OwnerLookup for FakeShell {
    fn owner_main_window(&self, window: WindowHandle) -> Result<Option<WindowHandle>> {
        let mut state = self.state.borrow_mut();
        state.owner_lookups += 1;
        if state.fail_owner_lookup {
            return Err(Error::rejected("owner lookup", "process not found"));
        }
        Ok(state.owners.get(&window).copied())
    }
}
