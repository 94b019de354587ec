//! Surface Locator: finds the desktop icon container
//!
//! The icon grid is a `SysListView32` named "FolderView" under a
//! `SHELLDLL_DefView`. Depending on the shell build the DefView lives either
//! directly under `Progman` (classic desktop, Windows 11 24H2) or under one of
//! several `WorkerW` windows (after the wallpaper layer has been split off).

use tracing::trace;

use crate::platform::DesktopShell;
use crate::types::{SurfaceHandle, WindowId};

pub const PROGMAN_CLASS: &str = "Progman";
pub const WORKERW_CLASS: &str = "WorkerW";
pub const DEFVIEW_CLASS: &str = "SHELLDLL_DefView";
pub const LISTVIEW_CLASS: &str = "SysListView32";
pub const FOLDER_VIEW_TITLE: &str = "FolderView";

/// Which shell layout hosted the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellTopology {
    Progman,
    WorkerW,
}

#[derive(Debug, Clone)]
pub struct SurfaceLocator<S> {
    shell: S,
}

impl<S: DesktopShell> SurfaceLocator<S> {
    pub fn new(shell: S) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Resolve the current icon container, or `None` while the shell has none
    /// (e.g. Explorer mid-restart).
    pub fn resolve(&self) -> Option<SurfaceHandle> {
        self.resolve_with_topology().map(|(handle, _)| handle)
    }

    pub fn resolve_with_topology(&self) -> Option<(SurfaceHandle, ShellTopology)> {
        if let Some(progman) = self.shell.find_window(None, None, PROGMAN_CLASS, None) {
            if let Some(list) = self.folder_view_under(progman) {
                trace!("Desktop icons found under Progman");
                return Some((SurfaceHandle::new(list), ShellTopology::Progman));
            }
        }

        // There can be one WorkerW per monitor or wallpaper layer; only one owns the DefView.
        let mut worker = None;
        while let Some(w) = self.shell.find_window(None, worker, WORKERW_CLASS, None) {
            if let Some(list) = self.folder_view_under(w) {
                trace!("Desktop icons found under WorkerW {:#x}", w);
                return Some((SurfaceHandle::new(list), ShellTopology::WorkerW));
            }
            worker = Some(w);
        }

        trace!("Desktop icons container not found");
        None
    }

    fn folder_view_under(&self, host: WindowId) -> Option<WindowId> {
        let def_view = self.shell.find_window(Some(host), None, DEFVIEW_CLASS, None)?;
        self.shell
            .find_window(Some(def_view), None, LISTVIEW_CLASS, Some(FOLDER_VIEW_TITLE))
    }
}
