//! Visibility Toggler: show/hide the desktop icons
//!
//! Every call re-resolves the container; nothing is cached between calls.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::error::{Error, Result};
use crate::locator::SurfaceLocator;
use crate::platform::DesktopShell;

pub struct VisibilityToggler<S> {
    locator: SurfaceLocator<S>,
    restored: AtomicBool,
}

impl<S: DesktopShell> VisibilityToggler<S> {
    pub fn new(shell: S) -> Self {
        Self {
            locator: SurfaceLocator::new(shell),
            restored: AtomicBool::new(false),
        }
    }

    /// Flip icon visibility. Returns the new state.
    pub fn toggle(&self) -> Result<bool> {
        let handle = self.locator.resolve().ok_or(Error::SurfaceUnavailable)?;
        let shell = self.locator.shell();
        let visible = !shell.is_visible(handle.id());
        shell.set_visible(handle.id(), visible);
        info!("Desktop icons visibility set to {}", visible);
        Ok(visible)
    }

    pub fn set_visible(&self, visible: bool) -> Result<()> {
        let handle = self.locator.resolve().ok_or(Error::SurfaceUnavailable)?;
        self.locator.shell().set_visible(handle.id(), visible);
        info!("Desktop icons visibility set to {}", visible);
        Ok(())
    }

    /// Shutdown path: make sure the icons are showing. Only the first call acts.
    pub fn restore(&self) {
        if self.restored.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.set_visible(true).is_ok() {
            info!("Desktop icons restored on exit.");
        }
    }
}
