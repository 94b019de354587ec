//! Windows host loop: owns the watcher, pumps messages, performs toggles.
//!
//! The hook action only posts `WM_APP_TOGGLE` to this thread's queue; the
//! toggle itself runs from the message loop, outside the hook callback.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{info, warn};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, WPARAM};
use windows::Win32::System::Console::SetConsoleCtrlHandler;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_APP, WM_QUIT,
};

use crate::config::WatcherConfig;
use crate::error::Result;
use crate::platform::{LowLevelMouseHook, Win32Shell};
use crate::toggler::VisibilityToggler;
use crate::watcher::GlobalInputWatcher;

const WM_APP_TOGGLE: u32 = WM_APP + 1;

static LOOP_THREAD: AtomicU32 = AtomicU32::new(0);

pub fn watch(config: WatcherConfig) -> Result<()> {
    let thread_id = unsafe { GetCurrentThreadId() };
    LOOP_THREAD.store(thread_id, Ordering::SeqCst);
    if let Err(e) = unsafe { SetConsoleCtrlHandler(Some(on_console_ctrl), true) } {
        warn!("Failed to register Ctrl+C handler: {}", e);
    }

    let toggler = VisibilityToggler::new(Win32Shell);
    let watcher = GlobalInputWatcher::new(Win32Shell, LowLevelMouseHook, config);
    let handle = watcher.start(move || {
        if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_APP_TOGGLE, WPARAM(0), LPARAM(0)) } {
            warn!("Failed to queue desktop toggle: {}", e);
        }
    })?;

    info!("Watching for double-clicks on the empty desktop (Ctrl+C to quit)");

    let mut msg = MSG::default();
    unsafe {
        // GetMessageW returns -1 on error, 0 on WM_QUIT.
        while GetMessageW(&mut msg, HWND::default(), 0, 0).0 > 0 {
            if msg.hwnd.is_invalid() && msg.message == WM_APP_TOGGLE {
                if let Err(e) = toggler.toggle() {
                    warn!("Toggle skipped: {}", e);
                }
                continue;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    handle.stop();
    toggler.restore();
    info!("Shutting down");
    Ok(())
}

unsafe extern "system" fn on_console_ctrl(_ctrl_type: u32) -> BOOL {
    let thread = LOOP_THREAD.load(Ordering::SeqCst);
    if thread != 0 {
        let _ = PostThreadMessageW(thread, WM_QUIT, WPARAM(0), LPARAM(0));
    }
    BOOL(1)
}
