//! Shared test utilities: an in-memory desktop and a hook you can drive by hand.

#![cfg(test)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::locator::{DEFVIEW_CLASS, FOLDER_VIEW_TITLE, LISTVIEW_CLASS, PROGMAN_CLASS, WORKERW_CLASS};
use crate::platform::{DesktopShell, HookGuard, PointerHook, PointerSink};
use crate::types::*;

pub const SCREEN: Rect = Rect { left: 0, top: 0, right: 1920, bottom: 1080 };
/// First desktop icon, in list-view local coordinates.
pub const ICON_RECT: Rect = Rect { left: 10, top: 10, right: 80, bottom: 80 };
/// A point on the first icon (screen coordinates in the stock layouts).
pub const ON_ICON: ScreenPoint = ScreenPoint::new(40, 40);
/// A point on empty background (screen coordinates in the stock layouts).
pub const ON_BACKGROUND: ScreenPoint = ScreenPoint::new(900, 500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

#[derive(Debug, Clone)]
struct FakeWindow {
    id: WindowId,
    parent: Option<WindowId>,
    class: String,
    title: String,
    rect: Rect,
    alive: bool,
    visible: bool,
}

#[derive(Debug)]
struct DesktopState {
    windows: Vec<FakeWindow>,
    next_id: WindowId,
    icons: Vec<Rect>,
    hung: bool,
    double_click_ms: u32,
    list_view: WindowId,
    def_view: WindowId,
}

/// In-memory window tree. Clones share state, so a test can keep one copy
/// and hand another to the component under test.
#[derive(Debug, Clone)]
pub struct FakeDesktop {
    state: Rc<RefCell<DesktopState>>,
}

impl FakeDesktop {
    pub fn empty() -> Self {
        Self {
            state: Rc::new(RefCell::new(DesktopState {
                windows: Vec::new(),
                next_id: 0x100,
                icons: vec![ICON_RECT],
                hung: false,
                double_click_ms: 500,
                list_view: 0,
                def_view: 0,
            })),
        }
    }

    /// Progman → SHELLDLL_DefView → SysListView32 "FolderView".
    pub fn progman_layout() -> Self {
        let desktop = Self::empty();
        let progman = desktop.add_window(None, PROGMAN_CLASS, "Program Manager");
        desktop.attach_icons(progman);
        desktop
    }

    /// Icon-less Progman plus two WorkerW windows; the second one hosts the icons.
    pub fn worker_w_layout() -> Self {
        let desktop = Self::empty();
        desktop.add_window(None, PROGMAN_CLASS, "Program Manager");
        desktop.add_window(None, WORKERW_CLASS, "");
        let worker = desktop.add_window(None, WORKERW_CLASS, "");
        desktop.attach_icons(worker);
        desktop
    }

    fn attach_icons(&self, host: WindowId) {
        let def_view = self.add_window(Some(host), DEFVIEW_CLASS, "");
        let list_view = self.add_window(Some(def_view), LISTVIEW_CLASS, FOLDER_VIEW_TITLE);
        let mut state = self.state.borrow_mut();
        state.def_view = def_view;
        state.list_view = list_view;
    }

    /// Adds a window covering its parent (or the whole screen). Later
    /// windows sit above earlier siblings.
    pub fn add_window(&self, parent: Option<WindowId>, class: &str, title: &str) -> WindowId {
        let rect = parent.and_then(|p| self.window(p)).map(|w| w.rect).unwrap_or(SCREEN);
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 0x10;
        state.windows.push(FakeWindow {
            id,
            parent,
            class: class.to_string(),
            title: title.to_string(),
            rect,
            alive: true,
            visible: true,
        });
        id
    }

    pub fn set_rect(&self, id: WindowId, rect: Rect) {
        if let Some(w) = self.state.borrow_mut().windows.iter_mut().find(|w| w.id == id) {
            w.rect = rect;
        }
    }

    pub fn destroy(&self, id: WindowId) {
        if let Some(w) = self.state.borrow_mut().windows.iter_mut().find(|w| w.id == id) {
            w.alive = false;
        }
    }

    pub fn set_hung(&self, hung: bool) {
        self.state.borrow_mut().hung = hung;
    }

    pub fn set_double_click_time(&self, ms: u32) {
        self.state.borrow_mut().double_click_ms = ms;
    }

    pub fn list_view(&self) -> WindowId {
        self.state.borrow().list_view
    }

    pub fn def_view(&self) -> WindowId {
        self.state.borrow().def_view
    }

    fn window(&self, id: WindowId) -> Option<FakeWindow> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.id == id && w.alive)
            .cloned()
    }

    fn topmost_child_at(&self, parent: Option<WindowId>, point: ScreenPoint) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .rev()
            .find(|w| w.alive && w.visible && w.parent == parent && w.rect.contains(point))
            .map(|w| w.id)
    }
}

impl DesktopShell for FakeDesktop {
    fn find_window(
        &self,
        parent: Option<WindowId>,
        after: Option<WindowId>,
        class: &str,
        title: Option<&str>,
    ) -> Option<WindowId> {
        let state = self.state.borrow();
        let mut candidates = state.windows.iter().filter(|w| w.alive && w.parent == parent);
        if let Some(after) = after {
            candidates.by_ref().find(|w| w.id == after)?;
        }
        candidates
            .find(|w| w.class == class && title.map_or(true, |t| w.title == t))
            .map(|w| w.id)
    }

    fn window_from_point(&self, point: ScreenPoint) -> Option<WindowId> {
        let mut hit = self.topmost_child_at(None, point)?;
        while let Some(child) = self.topmost_child_at(Some(hit), point) {
            hit = child;
        }
        Some(hit)
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.window(window)?.parent
    }

    fn root(&self, window: WindowId) -> Option<WindowId> {
        let mut current = self.window(window)?;
        while let Some(parent) = current.parent.and_then(|p| self.window(p)) {
            current = parent;
        }
        Some(current.id)
    }

    fn has_class(&self, window: WindowId, class: &str) -> bool {
        self.window(window).map_or(false, |w| w.class == class)
    }

    fn screen_to_client(&self, window: WindowId, point: ScreenPoint) -> Option<ScreenPoint> {
        let w = self.window(window)?;
        Some(ScreenPoint::new(point.x - w.rect.left, point.y - w.rect.top))
    }

    fn list_view_hit_test(&self, window: WindowId, local: ScreenPoint) -> Option<ListViewHit> {
        let w = self.window(window)?;
        let state = self.state.borrow();
        if state.hung || w.class != LISTVIEW_CLASS {
            return None;
        }

        let width = w.rect.right - w.rect.left;
        let height = w.rect.bottom - w.rect.top;
        let mut outside = 0;
        if local.x < 0 {
            outside |= LVHT_TOLEFT;
        }
        if local.x >= width {
            outside |= LVHT_TORIGHT;
        }
        if local.y >= height {
            outside |= LVHT_BELOW;
        }
        if outside != 0 {
            return Some(ListViewHit { item: LV_NO_ITEM, flags: outside });
        }

        let hit = match state.icons.iter().position(|icon| icon.contains(local)) {
            Some(index) => ListViewHit { item: index as i32, flags: LVHT_ONITEMICON },
            None => ListViewHit { item: LV_NO_ITEM, flags: LVHT_NOWHERE },
        };
        Some(hit)
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.window(window).map_or(false, |w| w.visible)
    }

    fn set_visible(&self, window: WindowId, visible: bool) -> bool {
        let mut state = self.state.borrow_mut();
        match state.windows.iter_mut().find(|w| w.id == window && w.alive) {
            Some(w) => std::mem::replace(&mut w.visible, visible),
            None => false,
        }
    }

    fn double_click_time_ms(&self) -> u32 {
        self.state.borrow().double_click_ms
    }
}

#[derive(Default)]
struct HookState {
    sink: Option<Rc<dyn PointerSink>>,
    refuse: bool,
    installs: usize,
}

/// Hook backend that records the installed sink and lets tests push events.
#[derive(Clone, Default)]
pub struct FakeHook {
    state: Rc<RefCell<HookState>>,
}

struct FakeGuard {
    state: Rc<RefCell<HookState>>,
}

impl HookGuard for FakeGuard {}

impl Drop for FakeGuard {
    fn drop(&mut self) {
        self.state.borrow_mut().sink = None;
    }
}

impl FakeHook {
    pub fn refusing() -> Self {
        let hook = Self::default();
        hook.state.borrow_mut().refuse = true;
        hook
    }

    pub fn is_installed(&self) -> bool {
        self.state.borrow().sink.is_some()
    }

    pub fn installs(&self) -> usize {
        self.state.borrow().installs
    }

    /// Deliver an event the way the OS would; no-op once uninstalled.
    pub fn emit(&self, event: PointerEvent) {
        let sink = self.state.borrow().sink.clone();
        if let Some(sink) = sink {
            sink.deliver(&event);
        }
    }
}

impl PointerHook for FakeHook {
    fn install(&self, sink: Rc<dyn PointerSink>) -> Result<Box<dyn HookGuard>> {
        let mut state = self.state.borrow_mut();
        if state.refuse {
            return Err(Error::HookInstallation("access denied".to_string()));
        }
        state.sink = Some(sink);
        state.installs += 1;
        Ok(Box::new(FakeGuard { state: self.state.clone() }))
    }
}

pub fn left_down(point: ScreenPoint, ticks: u32) -> PointerEvent {
    PointerEvent {
        point,
        button: MouseButton::Left,
        kind: PointerKind::Down,
        timestamp_ticks: ticks,
        synthetic: false,
    }
}

pub fn left_double_click(point: ScreenPoint, ticks: u32) -> PointerEvent {
    PointerEvent { kind: PointerKind::DoubleClick, ..left_down(point, ticks) }
}
