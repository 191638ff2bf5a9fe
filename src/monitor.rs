//! Monitor geometry and display numbering.

use crate::types::{Point, Rect};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Raw `HMONITOR` value; only valid until the display configuration changes.
    pub handle: isize,
    /// 1-based display number, stable across enumerations.
    pub index: u32,
    /// GDI device name, e.g. `\\.\DISPLAY2`.
    pub device_name: String,
    pub bounds: Rect,
    pub work_area: Rect,
    pub primary: bool,
}

impl MonitorInfo {
    pub fn area(&self) -> i64 {
        self.bounds.area()
    }
}

/// Number `n` of a `\\.\DISPLAYn` device name.
pub fn display_number(device_name: &str) -> Option<u32> {
    let pos = device_name.rfind("DISPLAY")?;
    device_name[pos + "DISPLAY".len()..].parse::<u32>().ok().filter(|n| *n > 0)
}

/// Orders monitors by display number and renumbers them 1..=n.
///
/// Monitors whose device name carries no number keep their enumeration order
/// and go after the highest numbered one.
pub fn assign_display_indices(monitors: &mut [MonitorInfo]) {
    monitors.sort_by_cached_key(|m| match display_number(&m.device_name) {
        Some(n) => (false, n),
        None => (true, 0),
    });
    monitors.iter_mut().enumerate().for_each(|(i, m)| m.index = i as u32 + 1);
}

/// Monitor whose bounds contain `point`.
pub fn monitor_at(monitors: &[MonitorInfo], point: Point) -> Option<&MonitorInfo> {
    monitors.iter().find(|m| m.bounds.contains(point))
}

/// Bounding rectangle of all monitors (the virtual screen).
pub fn virtual_bounds(monitors: &[MonitorInfo]) -> Option<Rect> {
    monitors.iter().map(|m| m.bounds).reduce(|a, b| Rect {
        left: a.left.min(b.left),
        top: a.top.min(b.top),
        right: a.right.max(b.right),
        bottom: a.bottom.max(b.bottom),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(device_name: &str, left: i32) -> MonitorInfo {
        MonitorInfo {
            handle: left as isize + 1,
            index: 0,
            device_name: device_name.to_string(),
            bounds: Rect::new(left, 0, left + 1920, 1080),
            work_area: Rect::new(left, 0, left + 1920, 1040),
            primary: left == 0,
        }
    }

    #[test]
    fn parses_display_numbers() {
        assert_eq!(display_number(r"\\.\DISPLAY1"), Some(1));
        assert_eq!(display_number(r"\\.\DISPLAY12"), Some(12));
        assert_eq!(display_number(r"\\.\DISPLAY"), None);
        assert_eq!(display_number("WinDisc"), None);
        assert_eq!(display_number(r"\\.\DISPLAY0"), None);
    }

    #[test]
    fn numbers_follow_device_names_with_unknowns_last() {
        let mut monitors = vec![
            monitor("mystery-a", -3840),
            monitor(r"\\.\DISPLAY3", 1920),
            monitor(r"\\.\DISPLAY1", 0),
            monitor("mystery-b", 3840),
        ];
        assign_display_indices(&mut monitors);

        let order: Vec<(&str, u32)> = monitors.iter().map(|m| (m.device_name.as_str(), m.index)).collect();
        assert_eq!(
            order,
            vec![(r"\\.\DISPLAY1", 1), (r"\\.\DISPLAY3", 2), ("mystery-a", 3), ("mystery-b", 4)]
        );
    }

    #[test]
    fn huge_display_numbers_still_renumber() {
        let mut monitors = vec![
            monitor("mystery", 3840),
            monitor(r"\\.\DISPLAY4294967295", 1920),
            monitor(r"\\.\DISPLAY2", 0),
        ];
        assign_display_indices(&mut monitors);

        let order: Vec<(&str, u32)> = monitors.iter().map(|m| (m.device_name.as_str(), m.index)).collect();
        assert_eq!(order, vec![(r"\\.\DISPLAY2", 1), (r"\\.\DISPLAY4294967295", 2), ("mystery", 3)]);
    }

    #[test]
    fn finds_monitor_and_virtual_bounds() {
        let monitors = vec![monitor(r"\\.\DISPLAY1", 0), monitor(r"\\.\DISPLAY2", 1920)];
        assert_eq!(monitor_at(&monitors, Point { x: 2000, y: 10 }).map(|m| m.device_name.as_str()), Some(r"\\.\DISPLAY2"));
        assert_eq!(monitor_at(&monitors, Point { x: -5, y: 10 }), None);
        assert_eq!(virtual_bounds(&monitors), Some(Rect::new(0, 0, 3840, 1080)));
        assert_eq!(virtual_bounds(&[]), None);
    }
}
