//! Live DWM thumbnails of one window drawn inside another.

use log::{trace, warn};
use windows::Win32::Graphics::Dwm::{
    DWM_THUMBNAIL_PROPERTIES, DWM_TNP_OPACITY, DWM_TNP_RECTDESTINATION, DWM_TNP_RECTSOURCE,
    DWM_TNP_SOURCECLIENTAREAONLY, DWM_TNP_VISIBLE, DwmQueryThumbnailSourceSize, DwmRegisterThumbnail,
    DwmUnregisterThumbnail, DwmUpdateThumbnailProperties,
};
use windows::core::BOOL;

use crate::error::Result;
use crate::types::{Rect, Size, WindowHandle};

/// Properties to change on a thumbnail; `None` leaves a property as it is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThumbnailProperties {
    pub destination: Option<Rect>,
    pub source: Option<Rect>,
    pub opacity: Option<u8>,
    pub visible: Option<bool>,
    pub source_client_area_only: Option<bool>,
}

impl ThumbnailProperties {
    fn flags(&self) -> u32 {
        [
            (self.destination.is_some(), DWM_TNP_RECTDESTINATION),
            (self.source.is_some(), DWM_TNP_RECTSOURCE),
            (self.opacity.is_some(), DWM_TNP_OPACITY),
            (self.visible.is_some(), DWM_TNP_VISIBLE),
            (self.source_client_area_only.is_some(), DWM_TNP_SOURCECLIENTAREAONLY),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |flags, (_, flag)| flags | flag)
    }

    fn to_raw(self) -> DWM_THUMBNAIL_PROPERTIES {
        DWM_THUMBNAIL_PROPERTIES {
            dwFlags: self.flags(),
            rcDestination: self.destination.unwrap_or_default().into(),
            rcSource: self.source.unwrap_or_default().into(),
            opacity: self.opacity.unwrap_or(255),
            fVisible: BOOL::from(self.visible.unwrap_or(true)),
            fSourceClientAreaOnly: BOOL::from(self.source_client_area_only.unwrap_or(false)),
        }
    }
}

/// A registered thumbnail; unregistered on drop.
pub struct Thumbnail {
    id: isize,
    destination: WindowHandle,
    source: WindowHandle,
}

impl Thumbnail {
    /// Draws `source` inside `destination`, which must be a top-level window
    /// owned by the calling process.
    pub fn register(destination: WindowHandle, source: WindowHandle) -> Result<Self> {
        let id = unsafe { DwmRegisterThumbnail(destination.into(), source.into())? };
        trace!("Registered thumbnail {} of {} in {}", id, source, destination);
        Ok(Thumbnail { id, destination, source })
    }

    pub fn destination(&self) -> WindowHandle {
        self.destination
    }

    pub fn source(&self) -> WindowHandle {
        self.source
    }

    pub fn source_size(&self) -> Result<Size> {
        let size = unsafe { DwmQueryThumbnailSourceSize(self.id)? };
        Ok(Size { width: size.cx, height: size.cy })
    }

    pub fn update(&self, properties: &ThumbnailProperties) -> Result<()> {
        let raw = properties.to_raw();
        unsafe { DwmUpdateThumbnailProperties(self.id, &raw)? };
        Ok(())
    }
}

impl Drop for Thumbnail {
    fn drop(&mut self) {
        if let Err(e) = unsafe { DwmUnregisterThumbnail(self.id) } {
            warn!("Failed to unregister thumbnail {}: {}", self.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_set_properties_are_flagged() {
        assert_eq!(ThumbnailProperties::default().flags(), 0);

        let props = ThumbnailProperties {
            destination: Some(Rect::new(0, 0, 200, 100)),
            opacity: Some(128),
            ..Default::default()
        };
        assert_eq!(props.flags(), DWM_TNP_RECTDESTINATION | DWM_TNP_OPACITY);

        let raw = props.to_raw();
        assert_eq!(raw.opacity, 128);
        assert_eq!(raw.rcDestination.right, 200);
        assert!(raw.fVisible.as_bool());
    }
}
