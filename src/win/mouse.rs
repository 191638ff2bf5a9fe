//! Cursor position.

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::error::Result;
use crate::types::{Point, Rect};

pub fn cursor_position() -> Result<Point> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point)? };
    Ok(point.into())
}

pub fn set_cursor_position(point: Point) -> Result<()> {
    unsafe { SetCursorPos(point.x, point.y)? };
    Ok(())
}

/// Moves the cursor to the middle of `bounds`, e.g. after switching to a
/// desktop whose focused window sits on another monitor.
pub fn center_cursor_in(bounds: Rect) -> Result<()> {
    set_cursor_position(Point { x: bounds.left + bounds.width() / 2, y: bounds.top + bounds.height() / 2 })
}
