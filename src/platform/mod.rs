pub mod types;

pub use types::{DesktopShell, HookGuard, PointerHook, PointerSink};

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(target_os = "windows")]
pub use win32::{LowLevelMouseHook, Win32Shell};
