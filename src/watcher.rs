//! Global Input Watcher: double-clicks on the empty desktop
//!
//! The watcher owns the single global pointer hook. Every event the hook
//! delivers goes through the same pipeline on the hook thread:
//!
//! 1. synthetic-event policy
//! 2. double-click detection, one signal per gesture (native or manual pairing)
//! 3. `resolve()` + `classify()` for the signalled point
//! 4. the caller's action, with panics contained at this boundary
//!
//! Nothing here can suppress input: the sink has no return value and the
//! platform hook always forwards to the next hook in the chain.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{debug, info, trace, warn};

use crate::config::{SyntheticPolicy, WatcherConfig};
use crate::detector::{DoubleClickSignal, GestureDetector};
use crate::error::Result;
use crate::hit_test::HitTestClassifier;
use crate::locator::SurfaceLocator;
use crate::platform::{DesktopShell, HookGuard, PointerHook, PointerSink};
use crate::types::{Classification, PointerEvent};

pub struct GlobalInputWatcher<S, H> {
    shell: S,
    hook: H,
    config: WatcherConfig,
}

impl<S, H> GlobalInputWatcher<S, H>
where
    S: DesktopShell + Clone + 'static,
    H: PointerHook,
{
    pub fn new(shell: S, hook: H, config: WatcherConfig) -> Self {
        Self { shell, hook, config }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Install the hook on the calling thread and start watching.
    ///
    /// `on_background_double_click` runs on this thread, inside the hook
    /// callback, so it must return quickly; hand real work to your own event
    /// loop. A panic inside it is logged and swallowed.
    pub fn start<F>(&self, on_background_double_click: F) -> Result<WatcherHandle>
    where
        F: FnMut() + 'static,
    {
        let lifecycle = Rc::new(Lifecycle::default());
        let sink = Rc::new(WatcherSink {
            lifecycle: Rc::downgrade(&lifecycle),
            dispatcher: RefCell::new(InputDispatcher::new(
                self.shell.clone(),
                self.config,
                Box::new(on_background_double_click),
            )),
        });

        let guard = self.hook.install(sink)?;
        lifecycle.arm(guard);
        info!(
            "Desktop double-click watcher started (synthetic events: {:?})",
            self.config.synthetic
        );

        Ok(WatcherHandle { lifecycle })
    }
}

/// Owns the hook registration. Dropping it stops the watcher.
pub struct WatcherHandle {
    lifecycle: Rc<Lifecycle>,
}

impl WatcherHandle {
    /// Remove the hook. Idempotent; safe to call from inside the action.
    pub fn stop(&self) {
        self.lifecycle.stop();
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// A non-owning handle the action itself can use to stop the watcher.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Rc::downgrade(&self.lifecycle))
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone)]
pub struct StopHandle(Weak<Lifecycle>);

impl StopHandle {
    pub fn stop(&self) {
        if let Some(lifecycle) = self.0.upgrade() {
            lifecycle.stop();
        }
    }
}

#[derive(Default)]
struct Lifecycle {
    active: Cell<bool>,
    guard: Cell<Option<Box<dyn HookGuard>>>,
}

impl Lifecycle {
    fn arm(&self, guard: Box<dyn HookGuard>) {
        self.guard.set(Some(guard));
        self.active.set(true);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn stop(&self) {
        if !self.active.replace(false) {
            return;
        }
        drop(self.guard.take());
        info!("Desktop double-click watcher stopped");
    }
}

struct WatcherSink<S> {
    lifecycle: Weak<Lifecycle>,
    dispatcher: RefCell<InputDispatcher<S>>,
}

impl<S: DesktopShell> PointerSink for WatcherSink<S> {
    fn deliver(&self, event: &PointerEvent) {
        let active = self.lifecycle.upgrade().map_or(false, |l| l.is_active());
        if !active {
            return;
        }
        // The action may pump messages (a dialog, say) and re-enter the hook.
        let Ok(mut dispatcher) = self.dispatcher.try_borrow_mut() else {
            trace!("Nested pointer event passed through while the action runs");
            return;
        };
        dispatcher.dispatch(event);
    }
}

struct InputDispatcher<S> {
    locator: SurfaceLocator<S>,
    classifier: HitTestClassifier<S>,
    policy: SyntheticPolicy,
    gestures: GestureDetector,
    action: Box<dyn FnMut()>,
}

impl<S: DesktopShell + Clone> InputDispatcher<S> {
    fn new(shell: S, config: WatcherConfig, action: Box<dyn FnMut()>) -> Self {
        Self {
            locator: SurfaceLocator::new(shell.clone()),
            classifier: HitTestClassifier::new(shell),
            policy: config.synthetic,
            gestures: GestureDetector::new(config.proximity_px),
            action,
        }
    }
}

impl<S: DesktopShell> InputDispatcher<S> {
    fn dispatch(&mut self, event: &PointerEvent) {
        if !self.policy.admits(event.synthetic) {
            trace!("Synthetic pointer event ignored");
            return;
        }
        if let Some(signal) = self.detect(event) {
            self.consume(signal);
        }
    }

    fn detect(&mut self, event: &PointerEvent) -> Option<DoubleClickSignal> {
        let interval = self.locator.shell().double_click_time_ms();
        self.gestures.on_event(event, interval)
    }

    fn consume(&mut self, signal: DoubleClickSignal) {
        let point = signal.point();
        let Some(handle) = self.locator.resolve() else {
            debug!("Double-click ignored: desktop icons surface unavailable");
            return;
        };

        match self.classifier.classify(point, handle) {
            Classification::Background => {
                debug!("{:?} on empty desktop at ({}, {})", signal, point.x, point.y);
                self.run_action();
            }
            other => trace!("{:?} at ({}, {}) classified {:?}", signal, point.x, point.y, other),
        }
    }

    fn run_action(&mut self) {
        let action = &mut self.action;
        if panic::catch_unwind(AssertUnwindSafe(|| action())).is_err() {
            warn!("Desktop double-click action panicked; hook stays installed");
        }
    }
}
