//! C ABI DLL for click-core -- loadable by host-side plugins in any language.
//!
//! All exported functions follow the convention:
//! - Return `i32` status code: `CLICK_OK=0`, `CLICK_ERROR=-1`
//! - String outputs allocated by Rust, freed via `click_free_string()`
//! - Last error retrievable via `click_last_error()`
//!
//! Argument blocks are built and released inside each call; callers never
//! see them.

use std::cell::RefCell;
use std::ffi::{c_char, c_void, CString};
use std::ptr;

use click_core::args::{EventData, InputData};
use click_core::dispatch::send_event;
use click_core::errors::ClickError;
use click_core::event::EventType;
use click_core::node::{EventListener, PopupMenu};

pub const CLICK_OK: i32 = 0;
pub const CLICK_ERROR: i32 = -1;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

fn status(result: Result<(), ClickError>) -> i32 {
    match result {
        Ok(()) => CLICK_OK,
        Err(e) => {
            log::debug!("click-ffi: {e}");
            set_last_error(&e.to_string());
            CLICK_ERROR
        }
    }
}

/// Retrieve the error message of the last click_* call (thread-local).
///
/// Returns a pointer valid until the next click_* call on this thread.
/// Returns null if that call succeeded or no call has been made.
#[no_mangle]
pub extern "C" fn click_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Free a string previously allocated by a click_* function.
///
/// # Safety
///
/// `ptr` must be a pointer returned by a click_* function or null.
#[no_mangle]
pub unsafe extern "C" fn click_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Send an event with a target/listener event block and empty input.
///
/// # Safety
///
/// `node` must be null or point to a live host event listener.  `target`
/// and `listener` are forwarded as-is and may be null.
#[no_mangle]
pub unsafe extern "C" fn click_send_event(
    node: *mut c_void,
    event_type: u8,
    which: u32,
    target: *mut c_void,
    listener: *mut c_void,
) -> i32 {
    clear_last_error();
    let event_data = EventData::for_normal_target(target, listener);
    status(unsafe {
        send_event(
            node.cast::<EventListener>(),
            EventType(event_type),
            which,
            event_data,
            InputData::empty(),
        )
    })
}

/// Select row `index` of a popup menu by sending an event to the popup
/// itself with popup-selection input data.
///
/// `index` is bounds-checked against the popup's list before anything is
/// dispatched.
///
/// # Safety
///
/// `popup` must be null or point to a live host popup menu.  `target` and
/// `listener` are forwarded as-is and may be null.
#[no_mangle]
pub unsafe extern "C" fn click_send_popup_event(
    popup: *mut c_void,
    event_type: u8,
    which: u32,
    target: *mut c_void,
    listener: *mut c_void,
    index: u16,
) -> i32 {
    clear_last_error();
    let popup = popup.cast::<PopupMenu>();

    let input_data = match unsafe { InputData::try_for_popup_menu(popup, index) } {
        Ok(data) => data,
        Err(e) => return status(Err(e)),
    };
    let event_data = EventData::for_normal_target(target, listener);

    status(unsafe { send_event(popup, EventType(event_type), which, event_data, input_data) })
}

/// Report the ABI layout this library was built with, as a JSON string.
///
/// # Safety
///
/// `out_json` must be a valid pointer to a `*mut c_char`.
/// On success, `*out_json` is set to a heap-allocated JSON C string.
/// Caller must free with `click_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn click_abi_layout(out_json: *mut *mut c_char) -> i32 {
    clear_last_error();
    if out_json.is_null() {
        set_last_error("out_json is null");
        return CLICK_ERROR;
    }

    match serde_json::to_string(&click_core::abi::layout()) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => {
                unsafe { *out_json = cstr.into_raw() };
                CLICK_OK
            }
            Err(e) => {
                set_last_error(&format!("CString conversion failed: {e}"));
                CLICK_ERROR
            }
        },
        Err(e) => {
            set_last_error(&format!("JSON serialization failed: {e}"));
            CLICK_ERROR
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
