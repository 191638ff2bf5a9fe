// types.rs
use std::fmt;

/// Raw top-level or child window handle, stored as the `HWND` pointer value.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(windows)]
impl From<windows::Win32::Foundation::HWND> for WindowHandle {
    fn from(hwnd: windows::Win32::Foundation::HWND) -> Self {
        WindowHandle(hwnd.0 as isize)
    }
}

#[cfg(windows)]
impl From<WindowHandle> for windows::Win32::Foundation::HWND {
    fn from(handle: WindowHandle) -> Self {
        windows::Win32::Foundation::HWND(handle.0 as *mut std::ffi::c_void)
    }
}

/// Stable identifier the shell assigns to a virtual desktop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DesktopId(pub u128);

#[cfg(windows)]
impl From<windows::core::GUID> for DesktopId {
    fn from(guid: windows::core::GUID) -> Self {
        DesktopId(guid.to_u128())
    }
}

/// Neighbor direction relative to the active desktop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Adjacency code understood by `GetAdjacentDesktop` (3 = left, 4 = right).
    pub fn shell_code(self) -> u32 {
        match self {
            Direction::Previous => 3,
            Direction::Next => 4,
        }
    }
}

/// Which desktop a switch or move request is aimed at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DesktopTarget {
    /// Zero-based position; negative values never resolve.
    Index(i64),
    Previous,
    Next,
}

impl From<Direction> for DesktopTarget {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Previous => DesktopTarget::Previous,
            Direction::Next => DesktopTarget::Next,
        }
    }
}

/// The window whose view ended up being moved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewSource {
    /// The handle the caller passed in.
    Window,
    /// The main window of the process owning the handle.
    OwnerMainWindow,
}

/// What a navigation request actually did.
///
/// The silent entry points discard this; the diagnostic ones return it so
/// callers can tell "done" from "nothing happened" and why.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Switched,
    Moved(ViewSource),
    Renamed,
    Pinned,
    Unpinned,
    /// The target did not resolve to a desktop (bad index, no neighbor).
    NoTarget,
    /// No strategy produced a view for the window.
    NoView,
    /// The shell refused the request.
    Rejected,
    /// The capability needed is not present on this system.
    Unsupported,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(
            self,
            Outcome::Switched | Outcome::Moved(_) | Outcome::Renamed | Outcome::Pinned | Outcome::Unpinned
        )
    }

    /// Stable integer code used across the C ABI. Positive means applied.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Switched => 1,
            Outcome::Moved(ViewSource::Window) => 2,
            Outcome::Moved(ViewSource::OwnerMainWindow) => 3,
            Outcome::Renamed => 4,
            Outcome::Pinned => 5,
            Outcome::Unpinned => 6,
            Outcome::NoTarget => 0,
            Outcome::NoView => -1,
            Outcome::Rejected => -2,
            Outcome::Unsupported => -3,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> i64 {
        (self.width() as i64) * (self.height() as i64)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.left < r.right && r.top < r.bottom { Some(r) } else { None }
    }
}

#[cfg(windows)]
impl From<windows::Win32::Foundation::RECT> for Rect {
    fn from(r: windows::Win32::Foundation::RECT) -> Self {
        Rect { left: r.left, top: r.top, right: r.right, bottom: r.bottom }
    }
}

#[cfg(windows)]
impl From<Rect> for windows::Win32::Foundation::RECT {
    fn from(r: Rect) -> Self {
        windows::Win32::Foundation::RECT { left: r.left, top: r.top, right: r.right, bottom: r.bottom }
    }
}

#[cfg(windows)]
impl From<windows::Win32::Foundation::POINT> for Point {
    fn from(p: windows::Win32::Foundation::POINT) -> Self {
        Point { x: p.x, y: p.y }
    }
}

/// A window event delivered by the event-hook watcher.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WinEvent {
    pub event: u32,
    pub window: WindowHandle,
    pub object_id: i32,
    pub child_id: i32,
    pub thread_id: u32,
    pub timestamp: u32,
}

impl WinEvent {
    pub fn kind(&self) -> WinEventKind {
        WinEventKind::from_raw(self.event)
    }
}

/// The window events hosts usually care about. Values are the OS event ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WinEventKind {
    Foreground,
    MoveSizeStart,
    MoveSizeEnd,
    MinimizeStart,
    MinimizeEnd,
    DesktopSwitch,
    ObjectCreate,
    ObjectDestroy,
    ObjectShow,
    ObjectHide,
    ObjectFocus,
    ObjectLocationChange,
    ObjectNameChange,
    ObjectCloaked,
    ObjectUncloaked,
    Other(u32),
}

impl WinEventKind {
    pub const EVENT_MIN: u32 = 0x0000_0001;
    pub const EVENT_MAX: u32 = 0x7FFF_FFFF;

    pub fn from_raw(event: u32) -> Self {
        match event {
            0x0003 => WinEventKind::Foreground,
            0x000A => WinEventKind::MoveSizeStart,
            0x000B => WinEventKind::MoveSizeEnd,
            0x0016 => WinEventKind::MinimizeStart,
            0x0017 => WinEventKind::MinimizeEnd,
            0x0020 => WinEventKind::DesktopSwitch,
            0x8000 => WinEventKind::ObjectCreate,
            0x8001 => WinEventKind::ObjectDestroy,
            0x8002 => WinEventKind::ObjectShow,
            0x8003 => WinEventKind::ObjectHide,
            0x8005 => WinEventKind::ObjectFocus,
            0x800B => WinEventKind::ObjectLocationChange,
            0x800C => WinEventKind::ObjectNameChange,
            0x8017 => WinEventKind::ObjectCloaked,
            0x8018 => WinEventKind::ObjectUncloaked,
            other => WinEventKind::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            WinEventKind::Foreground => 0x0003,
            WinEventKind::MoveSizeStart => 0x000A,
            WinEventKind::MoveSizeEnd => 0x000B,
            WinEventKind::MinimizeStart => 0x0016,
            WinEventKind::MinimizeEnd => 0x0017,
            WinEventKind::DesktopSwitch => 0x0020,
            WinEventKind::ObjectCreate => 0x8000,
            WinEventKind::ObjectDestroy => 0x8001,
            WinEventKind::ObjectShow => 0x8002,
            WinEventKind::ObjectHide => 0x8003,
            WinEventKind::ObjectFocus => 0x8005,
            WinEventKind::ObjectLocationChange => 0x800B,
            WinEventKind::ObjectNameChange => 0x800C,
            WinEventKind::ObjectCloaked => 0x8017,
            WinEventKind::ObjectUncloaked => 0x8018,
            WinEventKind::Other(raw) => raw,
        }
    }
}

/// Inclusive range of event ids a hook listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventRange {
    pub min: u32,
    pub max: u32,
}

impl EventRange {
    pub const ALL: EventRange = EventRange { min: WinEventKind::EVENT_MIN, max: WinEventKind::EVENT_MAX };

    pub fn single(kind: WinEventKind) -> Self {
        EventRange { min: kind.raw(), max: kind.raw() }
    }

    pub fn contains(&self, event: u32) -> bool {
        (self.min..=self.max).contains(&event)
    }
}

pub type EventCallback = Box<dyn Fn(&WinEvent) + Send + 'static>;

#[repr(transparent)]
pub struct SendablePtr(pub *mut std::ffi::c_void);

unsafe impl Send for SendablePtr {}
unsafe impl Sync for SendablePtr {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_maps_to_shell_adjacency_codes() {
        assert_eq!(Direction::Previous.shell_code(), 3);
        assert_eq!(Direction::Next.shell_code(), 4);
    }

    #[test]
    fn outcome_codes_are_positive_only_when_applied() {
        let all = [
            Outcome::Switched,
            Outcome::Moved(ViewSource::Window),
            Outcome::Moved(ViewSource::OwnerMainWindow),
            Outcome::Renamed,
            Outcome::Pinned,
            Outcome::Unpinned,
            Outcome::NoTarget,
            Outcome::NoView,
            Outcome::Rejected,
            Outcome::Unsupported,
        ];
        for outcome in all {
            assert_eq!(outcome.code() > 0, outcome.is_applied(), "{:?}", outcome);
        }
    }

    #[test]
    fn rect_intersection_and_area() {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(50, 25, 150, 75);
        assert_eq!(a.area(), 5000);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 25, 100, 50)));
        assert_eq!(a.intersection(&Rect::new(100, 0, 200, 50)), None);
        assert!(a.contains(Point { x: 0, y: 0 }));
        assert!(!a.contains(Point { x: 100, y: 10 }));
    }

    #[test]
    fn event_kinds_round_trip_known_ids() {
        assert_eq!(WinEventKind::from_raw(0x0020), WinEventKind::DesktopSwitch);
        assert_eq!(WinEventKind::from_raw(0x8017).raw(), 0x8017);
        assert_eq!(WinEventKind::from_raw(0x4242), WinEventKind::Other(0x4242));
        assert!(EventRange::ALL.contains(0x8000));
        assert!(!EventRange::single(WinEventKind::Foreground).contains(0x0004));
    }
}
