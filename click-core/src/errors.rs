//! Error types for `click_core`.
//!
//! Nothing here tries to prove that a node is alive or that a handler
//! address is code; those are the caller's preconditions.  The variants
//! below only cover addresses that are cheap to reject before they would
//! be turned into a Rust function pointer or dereferenced as a list.

use thiserror::Error;

/// Top-level error type for the `click_core` library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClickError {
    /// The node pointer handed to the dispatcher was null.
    #[error("NullNode: node pointer is null")]
    NullNode,

    /// The event listener has no callback table.
    #[error("NullCallbackTable: listener at 0x{listener:X} has a null callback table")]
    NullCallbackTable { listener: usize },

    /// The callback table slot that should hold `ReceiveEvent` is empty.
    #[error("MissingHandler: listener at 0x{listener:X} has no handler in slot {slot}")]
    MissingHandler { listener: usize, slot: usize },

    /// The popup menu has no list component, or the list has no item array.
    #[error("NullItemList: popup menu at 0x{popup:X} has no item list")]
    NullItemList { popup: usize },

    /// The selected popup index is past the end of the item list.
    #[error("IndexOutOfRange: index {index} is out of range for a list of {len} items")]
    IndexOutOfRange { index: u16, len: i32 },
}
