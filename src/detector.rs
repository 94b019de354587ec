//! Double-click producers.
//!
//! Two independent producers turn pointer events into [`DoubleClickSignal`]s:
//! the native one forwards OS double-click notifications, the manual one
//! rebuilds double-clicks from pairs of button-down events for shells that
//! swallow the native notification before it reaches the low-level hook.
//! [`GestureDetector`] runs both and makes them mutually exclusive per
//! gesture: whichever reports first owns it, and the other one's report for
//! the same gesture is dropped.

use crate::types::{MouseButton, PointerEvent, PointerKind, ScreenPoint};

/// Per-axis distance, in pixels, two downs may be apart and still pair up.
pub const DEFAULT_PROXIMITY_PX: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClickSignal {
    Native(ScreenPoint),
    Manual(ScreenPoint),
}

impl DoubleClickSignal {
    pub fn point(&self) -> ScreenPoint {
        match *self {
            DoubleClickSignal::Native(p) | DoubleClickSignal::Manual(p) => p,
        }
    }
}

/// Forwards the platform's own left double-click notification.
#[derive(Debug, Default)]
pub struct NativeDetector;

impl NativeDetector {
    pub fn on_event(&mut self, event: &PointerEvent) -> Option<DoubleClickSignal> {
        (event.button == MouseButton::Left && event.kind == PointerKind::DoubleClick)
            .then_some(DoubleClickSignal::Native(event.point))
    }
}

/// Pairs consecutive left button-downs into a double-click.
#[derive(Debug)]
pub struct ManualDetector {
    proximity_px: i32,
    last_down: Option<(ScreenPoint, u32)>,
}

impl ManualDetector {
    pub fn new(proximity_px: i32) -> Self {
        Self { proximity_px, last_down: None }
    }

    /// Feed one event. `interval_ms` is the host's double-click time, read
    /// by the caller so user changes apply immediately.
    pub fn on_event(&mut self, event: &PointerEvent, interval_ms: u32) -> Option<DoubleClickSignal> {
        if event.button != MouseButton::Left || event.kind != PointerKind::Down {
            return None;
        }

        let current = (event.point, event.timestamp_ticks);
        if let Some((point, ticks)) = self.last_down.take() {
            // Tick counters wrap after ~49.7 days.
            let elapsed = event.timestamp_ticks.wrapping_sub(ticks);
            if elapsed <= interval_ms && point.is_within(&event.point, self.proximity_px) {
                // Consumed: a third click starts a fresh pair.
                return Some(DoubleClickSignal::Manual(event.point));
            }
        }
        self.last_down = Some(current);
        None
    }

    pub fn reset(&mut self) {
        self.last_down = None;
    }
}

impl Default for ManualDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_PX)
    }
}

/// Both producers behind one gate, so a physical gesture yields one signal.
///
/// After a signal, the opposite producer's report is swallowed if it arrives
/// within the double-click interval and proximity of it. A shell may deliver
/// `Down, Down, DoubleClick` or `Down, DoubleClick, Down` for one gesture.
#[derive(Debug)]
pub struct GestureDetector {
    native: NativeDetector,
    manual: ManualDetector,
    proximity_px: i32,
    last: Option<(DoubleClickSignal, u32)>,
}

impl GestureDetector {
    pub fn new(proximity_px: i32) -> Self {
        Self {
            native: NativeDetector,
            manual: ManualDetector::new(proximity_px),
            proximity_px,
            last: None,
        }
    }

    pub fn on_event(&mut self, event: &PointerEvent, interval_ms: u32) -> Option<DoubleClickSignal> {
        let claimed = self.claimed_by_last(event, interval_ms);
        match event.kind {
            PointerKind::DoubleClick => {
                if matches!(claimed, Some(DoubleClickSignal::Manual(_))) {
                    return None;
                }
                let signal = self.native.on_event(event)?;
                // The first down of this gesture must not pair with a later one.
                self.manual.reset();
                self.last = Some((signal, event.timestamp_ticks));
                Some(signal)
            }
            PointerKind::Down => {
                if matches!(claimed, Some(DoubleClickSignal::Native(_))) {
                    return None;
                }
                let signal = self.manual.on_event(event, interval_ms)?;
                self.last = Some((signal, event.timestamp_ticks));
                Some(signal)
            }
        }
    }

    pub fn reset(&mut self) {
        self.manual.reset();
        self.last = None;
    }

    /// Takes the previous signal if `event` falls inside its gesture window.
    fn claimed_by_last(&mut self, event: &PointerEvent, interval_ms: u32) -> Option<DoubleClickSignal> {
        if event.button != MouseButton::Left {
            return None;
        }
        let (signal, ticks) = self.last.take()?;
        let elapsed = event.timestamp_ticks.wrapping_sub(ticks);
        (elapsed <= interval_ms && signal.point().is_within(&event.point, self.proximity_px))
            .then_some(signal)
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_PX)
    }
}
