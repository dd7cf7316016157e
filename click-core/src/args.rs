//! Argument blocks consumed by a host `ReceiveEvent` handler.
//!
//! The handler reads two blocks unconditionally, whatever the simulated
//! action is:
//!
//! - **event data** ([`RawEventData`], 3 pointer slots / 24 bytes)
//! - **input data** ([`RawInputData`], 8 pointer slots / 64 bytes)
//!
//! [`EventData`] and [`InputData`] own one heap block each and free it on
//! `Drop`, so a block is released exactly once on every exit path and its
//! address stays stable while the handler runs.  Allocation failure aborts
//! through the global allocator; these blocks are too small for a
//! recoverable failure to be meaningful.

use std::ffi::c_void;
use std::mem::{align_of, offset_of, size_of};

use crate::errors::ClickError;
use crate::node::{ComponentList, ListItemRenderer, PopupMenu};

/// Size in bytes of an event data block.
pub const EVENT_DATA_SIZE: usize = 0x18;

/// Size in bytes of an input data block.
pub const INPUT_DATA_SIZE: usize = 0x40;

// ---------------------------------------------------------------------------
// Raw layouts
// ---------------------------------------------------------------------------

/// Byte layout of the event data block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEventData {
    /// Slot 0, always zero.
    pub reserved: usize,
    /// Slot 1.
    pub target: *mut c_void,
    /// Slot 2.
    pub listener: *mut c_void,
}

/// Byte layout of the input data block (simulated mouse/keyboard state).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputData {
    /// Slot 0: renderer of the selected popup row.
    pub item_renderer: *mut ListItemRenderer,
    pub unk_08: u64,
    /// Slot 2: packed list index, see [`pack_list_index`].
    pub list_selection: u64,
    pub unk_18: [u64; 5],
}

const _: () = {
    assert!(size_of::<RawEventData>() == EVENT_DATA_SIZE);
    assert!(align_of::<RawEventData>() == size_of::<usize>());
    assert!(offset_of!(RawEventData, target) == 0x08);
    assert!(offset_of!(RawEventData, listener) == 0x10);

    assert!(size_of::<RawInputData>() == INPUT_DATA_SIZE);
    assert!(align_of::<RawInputData>() == size_of::<usize>());
    assert!(offset_of!(RawInputData, list_selection) == 0x10);
};

impl RawEventData {
    /// The block as its three pointer-sized slots.
    pub fn slots(&self) -> [usize; 3] {
        [self.reserved, self.target as usize, self.listener as usize]
    }
}

impl RawInputData {
    const ZEROED: Self = Self {
        item_renderer: std::ptr::null_mut(),
        unk_08: 0,
        list_selection: 0,
        unk_18: [0; 5],
    };

    /// The block as its eight pointer-sized slots.
    pub fn slots(&self) -> [usize; 8] {
        let mut slots = [0usize; 8];
        slots[0] = self.item_renderer as usize;
        slots[1] = self.unk_08 as usize;
        slots[2] = self.list_selection as usize;
        for (slot, &value) in slots[3..].iter_mut().zip(&self.unk_18) {
            *slot = value as usize;
        }
        slots
    }
}

/// Pack a list index the way the host expects it in input-data slot 2:
/// once in bits 0..16 and once in bits 48..64.
pub const fn pack_list_index(index: u16) -> u64 {
    (index as u64) | ((index as u64) << 48)
}

// ---------------------------------------------------------------------------
// Owned blocks
// ---------------------------------------------------------------------------

/// Owned event data block.  Freed on drop.
#[must_use = "an EventData block does nothing unless passed to a dispatch"]
#[derive(Debug)]
pub struct EventData {
    block: Box<RawEventData>,
}

impl EventData {
    /// Event data for a plain target/listener pair.  Either may be null.
    pub fn for_normal_target(target: *mut c_void, listener: *mut c_void) -> Self {
        let block = Box::new(RawEventData {
            reserved: 0,
            target,
            listener,
        });
        let data = Self { block };
        log::trace!("allocated event data block at {:p}", data.as_ptr());
        data
    }

    pub fn raw(&self) -> &RawEventData {
        &self.block
    }

    pub fn as_ptr(&self) -> *const RawEventData {
        &*self.block
    }

    pub fn as_mut_ptr(&mut self) -> *mut RawEventData {
        &mut *self.block
    }
}

impl Drop for EventData {
    fn drop(&mut self) {
        log::trace!("released event data block at {:p}", self.as_ptr());
    }
}

/// Owned input data block.  Freed on drop.
#[must_use = "an InputData block does nothing unless passed to a dispatch"]
#[derive(Debug)]
pub struct InputData {
    block: Box<RawInputData>,
}

impl InputData {
    fn from_raw(raw: RawInputData) -> Self {
        let data = Self {
            block: Box::new(raw),
        };
        log::trace!("allocated input data block at {:p}", data.as_ptr());
        data
    }

    /// All-zero input data, for actions with no positional or selection
    /// payload.
    pub fn empty() -> Self {
        Self::from_raw(RawInputData::ZEROED)
    }

    /// Input data selecting row `index` of a popup menu.
    ///
    /// # Safety
    ///
    /// `popup` must point to a live popup menu whose list has more than
    /// `index` rows.  Nothing is validated; see
    /// [`InputData::try_for_popup_menu`] for the checked form.
    pub unsafe fn for_popup_menu(popup: *const PopupMenu, index: u16) -> Self {
        let list = unsafe { (*popup).list };
        let renderer = unsafe { ComponentList::item_renderer(list, index) };
        Self::from_raw(RawInputData {
            item_renderer: renderer,
            list_selection: pack_list_index(index),
            ..RawInputData::ZEROED
        })
    }

    /// Bounds-checked form of [`InputData::for_popup_menu`].
    ///
    /// Rejects a null popup, a missing list or item array, and an index at
    /// or past the list's `list_length`.
    ///
    /// # Safety
    ///
    /// `popup`, when non-null, must point to a live popup menu, and its
    /// list pointer (when non-null) to a live list component.
    pub unsafe fn try_for_popup_menu(popup: *const PopupMenu, index: u16) -> Result<Self, ClickError> {
        if popup.is_null() {
            return Err(ClickError::NullNode);
        }

        let list = unsafe { (*popup).list };
        if list.is_null() || unsafe { (*list).item_renderer_list }.is_null() {
            return Err(ClickError::NullItemList {
                popup: popup as usize,
            });
        }

        let len = unsafe { (*list).list_length };
        if i32::from(index) >= len {
            return Err(ClickError::IndexOutOfRange { index, len });
        }

        Ok(unsafe { Self::for_popup_menu(popup, index) })
    }

    pub fn raw(&self) -> &RawInputData {
        &self.block
    }

    pub fn as_ptr(&self) -> *const RawInputData {
        &*self.block
    }

    pub fn as_mut_ptr(&mut self) -> *mut RawInputData {
        &mut *self.block
    }
}

impl Drop for InputData {
    fn drop(&mut self) {
        log::trace!("released input data block at {:p}", self.as_ptr());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
