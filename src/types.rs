//! Core value types shared by the locator, classifier and watcher.

/// Raw platform window identifier (an `HWND` value on Windows).
pub type WindowId = isize;

// Low-level mouse messages delivered to a WH_MOUSE_LL hook.
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;

// MSLLHOOKSTRUCT.flags
pub const LLMHF_INJECTED: u32 = 0x0000_0001;
pub const LLMHF_LOWER_IL_INJECTED: u32 = 0x0000_0002;

// LVHITTESTINFO.flags
pub const LVHT_NOWHERE: u32 = 0x0000_0001;
pub const LVHT_ONITEMICON: u32 = 0x0000_0002;
pub const LVHT_ONITEMLABEL: u32 = 0x0000_0004;
pub const LVHT_ONITEMSTATEICON: u32 = 0x0000_0008;
pub const LVHT_ONITEM: u32 = LVHT_ONITEMICON | LVHT_ONITEMLABEL | LVHT_ONITEMSTATEICON;
pub const LVHT_BELOW: u32 = 0x0000_0010;
pub const LVHT_TORIGHT: u32 = 0x0000_0020;
pub const LVHT_TOLEFT: u32 = 0x0000_0040;

/// Item index a list view reports when the point is not over any item.
pub const LV_NO_ITEM: i32 = -1;

/// Absolute display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Per-axis proximity test (not Euclidean).
    pub fn is_within(&self, other: &ScreenPoint, tolerance: i32) -> bool {
        let tolerance = tolerance.max(0) as u32;
        self.x.abs_diff(other.x) <= tolerance && self.y.abs_diff(other.y) <= tolerance
    }
}

/// Handle of the desktop icon container.
///
/// This is a lookup result, not an owned window: the shell can destroy and
/// recreate the container at any time, so callers resolve a fresh handle for
/// every operation instead of keeping one around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(WindowId);

impl SurfaceHandle {
    pub const fn new(id: WindowId) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> WindowId {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    DoubleClick,
}

/// Normalized view of a raw low-level pointer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub point: ScreenPoint,
    pub button: MouseButton,
    pub kind: PointerKind,
    pub timestamp_ticks: u32,
    /// Injected by software (SendInput and friends) rather than a device.
    pub synthetic: bool,
}

impl PointerEvent {
    /// Build an event from the fields of a low-level mouse hook notification.
    ///
    /// Returns `None` for messages the watcher never looks at (moves, button
    /// releases, wheel, middle/X buttons).
    pub fn from_low_level(message: u32, x: i32, y: i32, flags: u32, time: u32) -> Option<Self> {
        let (button, kind) = match message {
            WM_LBUTTONDOWN => (MouseButton::Left, PointerKind::Down),
            WM_LBUTTONDBLCLK => (MouseButton::Left, PointerKind::DoubleClick),
            WM_RBUTTONDOWN => (MouseButton::Right, PointerKind::Down),
            WM_RBUTTONDBLCLK => (MouseButton::Right, PointerKind::DoubleClick),
            _ => return None,
        };

        Some(Self {
            point: ScreenPoint::new(x, y),
            button,
            kind,
            timestamp_ticks: time,
            synthetic: flags & (LLMHF_INJECTED | LLMHF_LOWER_IL_INJECTED) != 0,
        })
    }
}

/// Raw answer of a container-native hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListViewHit {
    pub item: i32,
    pub flags: u32,
}

/// Where a screen point landed relative to the desktop icon surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Empty desktop background.
    Background,
    /// An icon, its label or its state glyph.
    OnIcon,
    /// No container, stale handle, or the point is not on the container.
    NotApplicable,
}
