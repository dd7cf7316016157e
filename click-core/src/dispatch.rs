//! `ReceiveEvent` resolution and invocation.
//!
//! Every interactive host node begins with an [`EventListener`] whose
//! callback table holds the node's event handler in slot
//! [`RECEIVE_EVENT_SLOT`].  [`ReceiveEvent::resolve`] reads that slot into a
//! typed [`ReceiveEventFn`]; [`ReceiveEvent::invoke`] is the only place the
//! foreign function is ever called.
//!
//! # Threading
//!
//! The handler runs synchronously on the calling thread and may re-enter
//! host logic before returning.  Nothing here is shared between calls, so
//! dispatches to different nodes are independent; serialising access to a
//! single node is the caller's job.

use std::ffi::c_void;

use crate::args::{EventData, InputData, RawEventData, RawInputData};
use crate::errors::ClickError;
use crate::event::EventType;
use crate::node::{EmbedsEventListener, EventListener, VTableEntry};

/// Callback table slot holding `ReceiveEvent`.
pub const RECEIVE_EVENT_SLOT: usize = 2;

/// Host `ReceiveEvent(listener, type, which, eventData, inputData)`.
///
/// The returned address is the listener itself on the host side and is
/// ignored by this crate.
pub type ReceiveEventFn = unsafe extern "C" fn(
    listener: *mut EventListener,
    event_type: EventType,
    which: u32,
    event_data: *mut RawEventData,
    input_data: *mut RawInputData,
) -> *mut c_void;

/// A `ReceiveEvent` handler bound to the listener it was resolved from.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveEvent {
    listener: *mut EventListener,
    func: ReceiveEventFn,
}

impl ReceiveEvent {
    /// Read the handler out of `listener`'s callback table.
    ///
    /// Fails only on a null listener, a null table, or an empty slot.  A
    /// non-null slot is trusted to be code.
    ///
    /// # Safety
    ///
    /// `listener`, when non-null, must point to a live event listener whose
    /// callback table has at least `RECEIVE_EVENT_SLOT + 1` entries.
    pub unsafe fn resolve(listener: *mut EventListener) -> Result<Self, ClickError> {
        if listener.is_null() {
            return Err(ClickError::NullNode);
        }

        let vtable = unsafe { (*listener).vtable };
        if vtable.is_null() {
            log::warn!("listener {listener:p} has no callback table, event dropped");
            return Err(ClickError::NullCallbackTable {
                listener: listener as usize,
            });
        }

        let entry = unsafe { vtable.add(RECEIVE_EVENT_SLOT).read() };
        // `Option<fn>` is pointer-sized with null as `None`.
        let func = unsafe { std::mem::transmute::<VTableEntry, Option<ReceiveEventFn>>(entry) };

        match func {
            Some(func) => Ok(Self { listener, func }),
            None => {
                log::warn!(
                    "listener {listener:p} has an empty slot {RECEIVE_EVENT_SLOT}, event dropped"
                );
                Err(ClickError::MissingHandler {
                    listener: listener as usize,
                    slot: RECEIVE_EVENT_SLOT,
                })
            }
        }
    }

    pub fn listener(&self) -> *mut EventListener {
        self.listener
    }

    /// Address of the resolved handler.
    pub fn address(&self) -> usize {
        self.func as usize
    }

    /// Call the handler.  Returns whatever the host returns.
    ///
    /// # Safety
    ///
    /// The listener this was resolved from must still be alive, and the
    /// resolved address must still be its handler.
    pub unsafe fn invoke(
        &self,
        event_type: EventType,
        which: u32,
        event_data: &mut EventData,
        input_data: &mut InputData,
    ) -> *mut c_void {
        log::trace!(
            "ReceiveEvent {:#x} on {:p}: {event_type} which={which}",
            self.address(),
            self.listener
        );
        unsafe {
            (self.func)(
                self.listener,
                event_type,
                which,
                event_data.as_mut_ptr(),
                input_data.as_mut_ptr(),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Dispatch an event to a base event listener.  The handler's return value
/// is discarded.
///
/// # Safety
///
/// See [`ReceiveEvent::resolve`].  The handler executes arbitrary host code
/// on this thread.
pub unsafe fn dispatch_listener(
    listener: *mut EventListener,
    event_type: EventType,
    which: u32,
    event_data: &mut EventData,
    input_data: &mut InputData,
) -> Result<(), ClickError> {
    let receive_event = unsafe { ReceiveEvent::resolve(listener)? };
    unsafe { receive_event.invoke(event_type, which, event_data, input_data) };
    Ok(())
}

/// Dispatch an event to any node embedding an event listener, by projecting
/// onto the embedded listener first.
///
/// # Safety
///
/// `node`, when non-null, must point to a live `N`.  See
/// [`dispatch_listener`].
pub unsafe fn dispatch<N: EmbedsEventListener>(
    node: *mut N,
    event_type: EventType,
    which: u32,
    event_data: &mut EventData,
    input_data: &mut InputData,
) -> Result<(), ClickError> {
    if node.is_null() {
        return Err(ClickError::NullNode);
    }
    unsafe { dispatch_listener(N::project(node), event_type, which, event_data, input_data) }
}

/// Dispatch with owned blocks, releasing both once the handler returns or
/// the dispatch is refused.
///
/// # Safety
///
/// See [`dispatch`].
pub unsafe fn send_event<N: EmbedsEventListener>(
    node: *mut N,
    event_type: EventType,
    which: u32,
    mut event_data: EventData,
    mut input_data: InputData,
) -> Result<(), ClickError> {
    unsafe { dispatch(node, event_type, which, &mut event_data, &mut input_data) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
