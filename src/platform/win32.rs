//! Win32 backend: window queries, the cross-process list-view hit test and
//! the WH_MOUSE_LL hook.

use std::cell::RefCell;
use std::ffi::c_void;
use std::mem::size_of;
use std::rc::Rc;

use tracing::{info, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::Graphics::Gdi::ScreenToClient;
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
use windows::Win32::System::Memory::{
    VirtualAllocEx, VirtualFreeEx, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_VM_OPERATION, PROCESS_VM_READ, PROCESS_VM_WRITE,
};
use windows::Win32::UI::Controls::LVM_HITTEST;
use windows::Win32::UI::Input::KeyboardAndMouse::GetDoubleClickTime;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, FindWindowExW, GetAncestor, GetClassNameW, GetParent,
    GetWindowThreadProcessId, IsWindowVisible, SendMessageTimeoutW, SetWindowsHookExW,
    ShowWindow, UnhookWindowsHookEx, WindowFromPoint, GA_ROOT, HHOOK, MSLLHOOKSTRUCT,
    SMTO_ABORTIFHUNG, SW_HIDE, SW_SHOW, WH_MOUSE_LL,
};

use super::{DesktopShell, HookGuard, PointerHook, PointerSink};
use crate::error::{Error, Result};
use crate::types::{ListViewHit, PointerEvent, ScreenPoint, WindowId, LV_NO_ITEM};

/// Well inside the low-level hook timeout.
const HIT_TEST_TIMEOUT_MS: u32 = 50;

fn hwnd(id: WindowId) -> HWND {
    HWND(id as *mut c_void)
}

fn window_id(hwnd: HWND) -> Option<WindowId> {
    (!hwnd.is_invalid()).then_some(hwnd.0 as WindowId)
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

// ============================================================================
// Desktop Shell
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Shell;

impl DesktopShell for Win32Shell {
    fn find_window(
        &self,
        parent: Option<WindowId>,
        after: Option<WindowId>,
        class: &str,
        title: Option<&str>,
    ) -> Option<WindowId> {
        let class = wide(class);
        let title = title.map(wide);
        let title_ptr = title.as_ref().map_or(PCWSTR::null(), |t| PCWSTR(t.as_ptr()));

        let found = unsafe {
            FindWindowExW(
                parent.map_or(HWND::default(), hwnd),
                after.map_or(HWND::default(), hwnd),
                PCWSTR(class.as_ptr()),
                title_ptr,
            )
        };
        found.ok().and_then(window_id)
    }

    fn window_from_point(&self, point: ScreenPoint) -> Option<WindowId> {
        let under = unsafe { WindowFromPoint(POINT { x: point.x, y: point.y }) };
        window_id(under)
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        unsafe { GetParent(hwnd(window)) }.ok().and_then(window_id)
    }

    fn root(&self, window: WindowId) -> Option<WindowId> {
        window_id(unsafe { GetAncestor(hwnd(window), GA_ROOT) })
    }

    fn has_class(&self, window: WindowId, class: &str) -> bool {
        let mut buf = [0u16; 256];
        let len = unsafe { GetClassNameW(hwnd(window), &mut buf) };
        len > 0 && buf[..len as usize].iter().copied().eq(class.encode_utf16())
    }

    fn screen_to_client(&self, window: WindowId, point: ScreenPoint) -> Option<ScreenPoint> {
        let mut pt = POINT { x: point.x, y: point.y };
        let ok = unsafe { ScreenToClient(hwnd(window), &mut pt) }.as_bool();
        ok.then_some(ScreenPoint::new(pt.x, pt.y))
    }

    fn list_view_hit_test(&self, window: WindowId, local: ScreenPoint) -> Option<ListViewHit> {
        let target = hwnd(window);
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(target, Some(&mut pid)) };
        if pid == 0 {
            return None;
        }

        // The list view belongs to Explorer: LVM_HITTEST reads and writes the
        // struct through lParam, so the struct has to live in that process.
        let remote = RemoteBuffer::alloc(pid, size_of::<LvHitTestInfo>())?;
        let mut info = LvHitTestInfo {
            pt: POINT { x: local.x, y: local.y },
            item: LV_NO_ITEM,
            ..Default::default()
        };
        remote.write(&info)?;

        let mut result: usize = 0;
        let sent = unsafe {
            SendMessageTimeoutW(
                target,
                LVM_HITTEST,
                WPARAM(0),
                LPARAM(remote.addr as isize),
                SMTO_ABORTIFHUNG,
                HIT_TEST_TIMEOUT_MS,
                Some(&mut result),
            )
        };
        if sent.0 == 0 {
            return None;
        }

        remote.read(&mut info)?;
        Some(ListViewHit { item: info.item, flags: info.flags })
    }

    fn is_visible(&self, window: WindowId) -> bool {
        unsafe { IsWindowVisible(hwnd(window)) }.as_bool()
    }

    fn set_visible(&self, window: WindowId, visible: bool) -> bool {
        unsafe { ShowWindow(hwnd(window), if visible { SW_SHOW } else { SW_HIDE }) }.as_bool()
    }

    fn double_click_time_ms(&self) -> u32 {
        unsafe { GetDoubleClickTime() }
    }
}

/// LVHITTESTINFO as laid out by comctl32 v6.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct LvHitTestInfo {
    pt: POINT,
    flags: u32,
    item: i32,
    sub_item: i32,
    group: i32,
}

/// A scratch allocation inside another process, freed on drop.
struct RemoteBuffer {
    process: HANDLE,
    addr: *mut c_void,
}

impl RemoteBuffer {
    fn alloc(pid: u32, size: usize) -> Option<Self> {
        let access = PROCESS_VM_OPERATION | PROCESS_VM_READ | PROCESS_VM_WRITE;
        let process = unsafe { OpenProcess(access, false, pid) }.ok()?;
        let addr = unsafe { VirtualAllocEx(process, None, size, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE) };
        if addr.is_null() {
            unsafe {
                let _ = CloseHandle(process);
            }
            return None;
        }
        Some(Self { process, addr })
    }

    fn write<T: Copy>(&self, value: &T) -> Option<()> {
        unsafe {
            WriteProcessMemory(
                self.process,
                self.addr,
                value as *const T as *const c_void,
                size_of::<T>(),
                None,
            )
        }
        .ok()
    }

    fn read<T: Copy>(&self, value: &mut T) -> Option<()> {
        unsafe {
            ReadProcessMemory(
                self.process,
                self.addr,
                value as *mut T as *mut c_void,
                size_of::<T>(),
                None,
            )
        }
        .ok()
    }
}

impl Drop for RemoteBuffer {
    fn drop(&mut self) {
        unsafe {
            let _ = VirtualFreeEx(self.process, self.addr, 0, MEM_RELEASE);
            let _ = CloseHandle(self.process);
        }
    }
}

// ============================================================================
// Low-Level Mouse Hook
// ============================================================================

thread_local! {
    // WH_MOUSE_LL calls back on the installing thread, so a thread-local is
    // all the hook procedure needs to find its sink.
    static HOOK_SINK: RefCell<Option<Rc<dyn PointerSink>>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowLevelMouseHook;

struct MouseHookGuard {
    hook: HHOOK,
}

impl HookGuard for MouseHookGuard {}

impl Drop for MouseHookGuard {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = UnhookWindowsHookEx(self.hook) {
                warn!("Failed to remove global mouse hook: {}", e);
            }
        }
        HOOK_SINK.with(|slot| {
            if let Ok(mut slot) = slot.try_borrow_mut() {
                *slot = None;
            }
        });
        info!("Global mouse hook removed");
    }
}

impl PointerHook for LowLevelMouseHook {
    fn install(&self, sink: Rc<dyn PointerSink>) -> Result<Box<dyn HookGuard>> {
        let occupied = HOOK_SINK.with(|slot| slot.borrow().is_some());
        if occupied {
            return Err(Error::HookInstallation(
                "a mouse hook is already installed on this thread".to_string(),
            ));
        }

        let hook = unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(hook_proc), HINSTANCE::default(), 0) }
            .map_err(|e| Error::HookInstallation(format!("SetWindowsHookExW failed: {}", e)))?;

        HOOK_SINK.with(|slot| *slot.borrow_mut() = Some(sink));
        info!("Global mouse hook installed");
        Ok(Box::new(MouseHookGuard { hook }))
    }
}

unsafe extern "system" fn hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 && lparam.0 != 0 {
        let info = &*(lparam.0 as *const MSLLHOOKSTRUCT);
        let event = PointerEvent::from_low_level(
            wparam.0 as u32,
            info.pt.x,
            info.pt.y,
            info.flags,
            info.time,
        );
        if let Some(event) = event {
            // Clone out of the slot so stop() inside the action can clear it.
            let sink = HOOK_SINK.with(|slot| slot.try_borrow().ok().and_then(|s| s.clone()));
            if let Some(sink) = sink {
                // Unwinding out of an extern "system" fn aborts the process.
                let delivered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    sink.deliver(&event)
                }));
                if delivered.is_err() {
                    warn!("Pointer event handling panicked; event passed through");
                }
            }
        }
    }
    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}
