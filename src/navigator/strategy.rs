use log::trace;

use crate::error::Result;
use crate::navigator::shell::OwnerLookup;
use crate::types::{ViewSource, WindowHandle};

/// Order in which window handles are tried when looking for a shell view.
///
/// The caller's own handle comes first. Child and tool windows often have no
/// view of their own, in which case the owning process's main window usually
/// does.
pub(crate) const VIEW_STRATEGIES: [ViewSource; 2] = [ViewSource::Window, ViewSource::OwnerMainWindow];

impl ViewSource {
    /// Handle whose view this strategy would use for `window`.
    pub(crate) fn candidate<S: OwnerLookup>(self, shell: &S, window: WindowHandle) -> Result<Option<WindowHandle>> {
        match self {
            ViewSource::Window => Ok(Some(window)),
            ViewSource::OwnerMainWindow => {
                let owner = shell.owner_main_window(window)?;
                trace!("Owner main window of {}: {:?}", window, owner);
                Ok(owner.filter(|h| !h.is_null()))
            }
        }
    }
}
