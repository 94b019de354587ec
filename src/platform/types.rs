//! OS seams: everything the core needs from the host goes through these traits.

use std::rc::Rc;

use crate::error::Result;
use crate::types::{ListViewHit, PointerEvent, ScreenPoint, WindowId};

/// Window-hierarchy and shell-control queries against the host desktop.
///
/// Implementations must be cheap: the watcher calls them from inside the
/// low-level hook, which has to return within the OS hook timeout.
pub trait DesktopShell {
    /// Find the first child of `parent` (top-level windows when `None`)
    /// after `after` whose class is `class` and, if given, whose title is `title`.
    fn find_window(
        &self,
        parent: Option<WindowId>,
        after: Option<WindowId>,
        class: &str,
        title: Option<&str>,
    ) -> Option<WindowId>;

    /// Deepest window under a screen point.
    fn window_from_point(&self, point: ScreenPoint) -> Option<WindowId>;

    fn parent(&self, window: WindowId) -> Option<WindowId>;

    /// Top-level ancestor of `window` (the window itself when it is top-level).
    fn root(&self, window: WindowId) -> Option<WindowId>;

    fn has_class(&self, window: WindowId, class: &str) -> bool;

    /// Screen → window-local coordinates. `None` when the window is gone.
    fn screen_to_client(&self, window: WindowId, point: ScreenPoint) -> Option<ScreenPoint>;

    /// List-view hit test at a window-local point. `None` when the query
    /// could not be issued (stale handle, hung shell).
    fn list_view_hit_test(&self, window: WindowId, local: ScreenPoint) -> Option<ListViewHit>;

    fn is_visible(&self, window: WindowId) -> bool;

    /// Returns whether the window was previously visible.
    fn set_visible(&self, window: WindowId, visible: bool) -> bool;

    /// User-configured double-click interval in milliseconds.
    fn double_click_time_ms(&self) -> u32;
}

/// Receives every normalized pointer event from an installed hook.
///
/// There is no return value: observers can never suppress input.
pub trait PointerSink {
    fn deliver(&self, event: &PointerEvent);
}

/// Keeps a hook registration alive; dropping it detaches the hook.
pub trait HookGuard {}

/// Global low-level pointer observation primitive.
pub trait PointerHook {
    /// Register `sink` on the calling thread. Events are delivered on that
    /// thread while it pumps messages.
    fn install(&self, sink: Rc<dyn PointerSink>) -> Result<Box<dyn HookGuard>>;
}
