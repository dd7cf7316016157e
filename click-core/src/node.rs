//! `#[repr(C)]` mirrors of the host UI structures the dispatcher touches.
//!
//! Only the fields this crate reads are named; everything else is opaque
//! padding so that every named field lands on the host's offset.  The
//! offsets are 64-bit only and are pinned by the `const` assertions at the
//! bottom of this file.
//!
//! None of these types are ever constructed by this crate.  They are only
//! reached through pointers handed in by the caller, which owns their
//! lifetime (the host process does).
//!
//! # Structural sub-typing
//!
//! A host node "is-a" [`EventListener`] when it embeds one at a fixed
//! offset.  [`EmbedsEventListener`] records that offset and projects a
//! pointer to the node onto the embedded listener.

use std::ffi::c_void;
use std::mem::{offset_of, size_of};

/// One pointer-sized entry of a host callback table.
pub type VTableEntry = *const c_void;

/// Base structure of every interactive host node.
#[repr(C)]
#[derive(Debug)]
pub struct EventListener {
    /// Callback table shared by all nodes of the same host type.
    pub vtable: *const VTableEntry,
}

/// Base of every host UI component.  Begins with its [`EventListener`].
#[repr(C)]
pub struct ComponentBase {
    pub event_listener: EventListener,
    _opaque: [u8; 0xB8],
}

/// List component backing a popup menu.
#[repr(C)]
pub struct ComponentList {
    pub component_base: ComponentBase,
    /// Array of `list_length` entries, one per visible row.
    pub item_renderer_list: *mut ListItem,
    _unk_c8: [u8; 0x50],
    pub list_length: i32,
    _unk_11c: [u8; 4],
}

/// One row of a [`ComponentList`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ListItem {
    pub renderer: *mut ListItemRenderer,
    _unk_08: [u8; 0x10],
}

/// Renderer component for a single list row.  Only its address is used.
#[repr(C)]
pub struct ListItemRenderer {
    _private: [u8; 0],
}

/// Context/popup menu addon.
#[repr(C)]
pub struct PopupMenu {
    pub event_listener: EventListener,
    pub window: *mut c_void,
    pub list: *mut ComponentList,
    pub owner: *mut c_void,
    pub entry_count: i32,
    _unk_24: [u8; 4],
    pub entry_names: *mut *mut u8,
}

impl ListItem {
    /// An entry pointing at `renderer`, with zeroed host bookkeeping.
    pub fn new(renderer: *mut ListItemRenderer) -> Self {
        Self {
            renderer,
            _unk_08: [0; 0x10],
        }
    }
}

impl ComponentList {
    /// Read the renderer pointer for row `index`.
    ///
    /// # Safety
    ///
    /// `this` must point to a live list whose item array holds more than
    /// `index` entries.  No bounds check is made, matching the host.
    pub unsafe fn item_renderer(this: *const Self, index: u16) -> *mut ListItemRenderer {
        let items = unsafe { (*this).item_renderer_list };
        unsafe { (*items.add(index as usize)).renderer }
    }
}

// ---------------------------------------------------------------------------
// Structural sub-typing
// ---------------------------------------------------------------------------

/// A host node type that embeds an [`EventListener`] at a fixed offset.
///
/// # Safety
///
/// `LISTENER_OFFSET` must be the byte offset of an `EventListener` inside
/// every value of `Self`.  The dispatcher trusts it to locate the callback
/// table.
pub unsafe trait EmbedsEventListener {
    /// Byte offset of the embedded listener inside `Self`.
    const LISTENER_OFFSET: usize;

    /// Project a node pointer onto its embedded listener.
    ///
    /// Pure address arithmetic: `this` is not dereferenced.
    fn project(this: *mut Self) -> *mut EventListener
    where
        Self: Sized,
    {
        this.cast::<u8>()
            .wrapping_add(Self::LISTENER_OFFSET)
            .cast::<EventListener>()
    }
}

unsafe impl EmbedsEventListener for EventListener {
    const LISTENER_OFFSET: usize = 0;
}

unsafe impl EmbedsEventListener for ComponentBase {
    const LISTENER_OFFSET: usize = offset_of!(ComponentBase, event_listener);
}

unsafe impl EmbedsEventListener for ComponentList {
    const LISTENER_OFFSET: usize =
        offset_of!(ComponentList, component_base) + ComponentBase::LISTENER_OFFSET;
}

unsafe impl EmbedsEventListener for PopupMenu {
    const LISTENER_OFFSET: usize = offset_of!(PopupMenu, event_listener);
}

// ---------------------------------------------------------------------------
// Layout pins
// ---------------------------------------------------------------------------

const _: () = {
    assert!(size_of::<EventListener>() == 0x08);
    assert!(size_of::<ComponentBase>() == 0xC0);
    assert!(offset_of!(ComponentList, item_renderer_list) == 0xC0);
    assert!(offset_of!(ComponentList, list_length) == 0x118);
    assert!(size_of::<ListItem>() == 0x18);
    assert!(offset_of!(PopupMenu, window) == 0x08);
    assert!(offset_of!(PopupMenu, list) == 0x10);
    assert!(offset_of!(PopupMenu, owner) == 0x18);
    assert!(offset_of!(PopupMenu, entry_count) == 0x20);
    assert!(offset_of!(PopupMenu, entry_names) == 0x28);
};
