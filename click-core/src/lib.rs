//! `click_core` -- Synthetic input event dispatch into a host UI object graph.
//!
//! Given a pointer to a live interactive UI node inside the host process,
//! this crate triggers the node exactly as a real mouse/keyboard event would:
//! it resolves the node's `ReceiveEvent` entry point from its callback table,
//! builds the two argument blocks the handler reads, and calls it.
//!
//! It can be consumed by:
//! - `click-ffi` (C ABI DLL for host-side plugins)
//! - `click-cli` (layout report tool)
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `ClickError` enum via `thiserror` |
//! | [`node`] | `#[repr(C)]` host structures and the `EmbedsEventListener` projection |
//! | [`event`] | `EventType` pass-through newtype |
//! | [`args`] | `EventData` / `InputData` RAII argument blocks |
//! | [`dispatch`] | Callback-table resolution and the single invocation site |
//! | [`abi`] | Serializable layout report of the binary contract |
//!
//! # Example
//!
//! ```no_run
//! use click_core::args::{EventData, InputData};
//! use click_core::dispatch::send_event;
//! use click_core::event::EventType;
//! use click_core::node::ComponentBase;
//!
//! # fn find_button() -> *mut ComponentBase { std::ptr::null_mut() }
//! let button = find_button();
//! let event_data = EventData::for_normal_target(button.cast(), std::ptr::null_mut());
//! // SAFETY: `button` was freshly obtained from a tree walk and is alive.
//! unsafe { send_event(button, EventType::BUTTON_CLICK, 0, event_data, InputData::empty()) }
//!     .expect("dispatch refused");
//! ```

#[cfg(not(target_pointer_width = "64"))]
compile_error!("click-core only supports the 64-bit host ABI");

pub mod abi;
pub mod args;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod node;

#[cfg(test)]
pub(crate) mod testing;
