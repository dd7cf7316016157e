//! Fake host object graph for unit tests.
//!
//! Fakes own their callback tables and list storage on the heap so every
//! address handed to the code under test stays put for the fake's
//! lifetime.  [`recording_handler`] stands in for a host `ReceiveEvent`
//! and records each call into a process-wide log keyed by listener
//! address; a fake purges its own entries on drop so a reused address
//! starts clean.

use std::ffi::c_void;
use std::thread::ThreadId;

use parking_lot::Mutex;

use crate::args::{RawEventData, RawInputData};
use crate::dispatch::{ReceiveEventFn, RECEIVE_EVENT_SLOT};
use crate::event::EventType;
use crate::node::{
    ComponentBase, ComponentList, EmbedsEventListener, EventListener, ListItem, ListItemRenderer,
    PopupMenu, VTableEntry,
};

const TABLE_LEN: usize = 4;

type FakeTable = Box<[VTableEntry; TABLE_LEN]>;

fn table_with(handler: Option<ReceiveEventFn>) -> FakeTable {
    let mut table: FakeTable = Box::new([std::ptr::null(); TABLE_LEN]);
    if let Some(handler) = handler {
        table[RECEIVE_EVENT_SLOT] = handler as VTableEntry;
    }
    table
}

// ---------------------------------------------------------------------------
// Recording handler
// ---------------------------------------------------------------------------

/// One observed `ReceiveEvent` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub listener: usize,
    pub event_type: EventType,
    pub which: u32,
    pub event_data: usize,
    pub input_data: usize,
    pub event_slots: [usize; 3],
    pub input_slots: [usize; 8],
    pub thread: ThreadId,
}

static CALLS: Mutex<Vec<RecordedCall>> = parking_lot::const_mutex(Vec::new());

pub(crate) unsafe extern "C" fn recording_handler(
    listener: *mut EventListener,
    event_type: EventType,
    which: u32,
    event_data: *mut RawEventData,
    input_data: *mut RawInputData,
) -> *mut c_void {
    let call = RecordedCall {
        listener: listener as usize,
        event_type,
        which,
        event_data: event_data as usize,
        input_data: input_data as usize,
        event_slots: unsafe { (*event_data).slots() },
        input_slots: unsafe { (*input_data).slots() },
        thread: std::thread::current().id(),
    };
    CALLS.lock().push(call);
    ledger::used(event_data as usize);
    ledger::used(input_data as usize);
    listener.cast()
}

/// Calls recorded for `listener`, oldest first.
pub(crate) fn calls_for(listener: *const EventListener) -> Vec<RecordedCall> {
    let addr = listener as usize;
    CALLS
        .lock()
        .iter()
        .filter(|c| c.listener == addr)
        .copied()
        .collect()
}

fn forget_calls(listener: *const EventListener) {
    let addr = listener as usize;
    CALLS.lock().retain(|c| c.listener != addr);
}

// ---------------------------------------------------------------------------
// Fake nodes
// ---------------------------------------------------------------------------

/// A bare event listener with its own callback table.
pub(crate) struct FakeNode {
    _table: Option<FakeTable>,
    listener: Box<EventListener>,
}

impl FakeNode {
    pub(crate) fn new(handler: ReceiveEventFn) -> Self {
        Self::build(Some(table_with(Some(handler))))
    }

    pub(crate) fn with_empty_slot() -> Self {
        Self::build(Some(table_with(None)))
    }

    pub(crate) fn without_table() -> Self {
        Self::build(None)
    }

    fn build(table: Option<FakeTable>) -> Self {
        let vtable = table
            .as_ref()
            .map_or(std::ptr::null(), |t| t.as_ptr());
        Self {
            _table: table,
            listener: Box::new(EventListener { vtable }),
        }
    }

    pub(crate) fn listener_ptr(&mut self) -> *mut EventListener {
        &mut *self.listener
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        forget_calls(self.listener_ptr());
    }
}

/// A component embedding its listener, for derived-node dispatch.
pub(crate) struct FakeComponent {
    _table: FakeTable,
    component: Box<ComponentBase>,
}

impl FakeComponent {
    pub(crate) fn new(handler: ReceiveEventFn) -> Self {
        let table = table_with(Some(handler));
        // All fields are raw pointers or byte arrays.
        let mut component: Box<ComponentBase> = Box::new(unsafe { std::mem::zeroed() });
        component.event_listener.vtable = table.as_ptr();
        Self {
            _table: table,
            component,
        }
    }

    pub(crate) fn component_ptr(&mut self) -> *mut ComponentBase {
        &mut *self.component
    }

    pub(crate) fn listener_ptr(&mut self) -> *mut EventListener {
        &mut self.component.event_listener
    }
}

impl Drop for FakeComponent {
    fn drop(&mut self) {
        forget_calls(self.listener_ptr());
    }
}

/// A popup menu backed by a list of `n` rows.
///
/// Renderers are plain words; only their addresses matter.
pub(crate) struct FakePopup {
    _table: FakeTable,
    renderers: Vec<u64>,
    _items: Vec<ListItem>,
    list: Box<ComponentList>,
    popup: Box<PopupMenu>,
}

impl FakePopup {
    pub(crate) fn new(n: u16) -> Self {
        let table = table_with(Some(recording_handler));
        let mut renderers = vec![0u64; n as usize];
        let mut items: Vec<ListItem> = renderers
            .iter_mut()
            .map(|r| ListItem::new((r as *mut u64).cast::<ListItemRenderer>()))
            .collect();

        let mut list: Box<ComponentList> = Box::new(unsafe { std::mem::zeroed() });
        list.item_renderer_list = items.as_mut_ptr();
        list.list_length = i32::from(n);

        let mut popup: Box<PopupMenu> = Box::new(unsafe { std::mem::zeroed() });
        popup.event_listener.vtable = table.as_ptr();
        popup.list = &mut *list;
        popup.entry_count = i32::from(n);

        Self {
            _table: table,
            renderers,
            _items: items,
            list,
            popup,
        }
    }

    pub(crate) fn popup_ptr(&mut self) -> *mut PopupMenu {
        &mut *self.popup
    }

    pub(crate) fn list_ptr(&mut self) -> *mut ComponentList {
        &mut *self.list
    }

    pub(crate) fn listener_ptr(&mut self) -> *mut EventListener {
        PopupMenu::project(self.popup_ptr())
    }

    pub(crate) fn renderer_ptr(&self, index: u16) -> *mut ListItemRenderer {
        self.renderers[index as usize..].as_ptr().cast_mut().cast()
    }

    /// Clear the popup's list pointer, as the host does while it is closed.
    pub(crate) fn detach_list(&mut self) {
        self.popup.list = std::ptr::null_mut();
    }
}

impl Drop for FakePopup {
    fn drop(&mut self) {
        forget_calls(self.listener_ptr());
    }
}

// ---------------------------------------------------------------------------
// Block ledger
// ---------------------------------------------------------------------------

/// Per-thread trace of argument block lifetimes.
///
/// A test registers each block it builds with [`track_event`] /
/// [`track_input`], [`recording_handler`](super::recording_handler) marks
/// the blocks it receives as used, and the test binary's global allocator
/// marks a registered block released when its address is freed.  The trace
/// is a fixed array so the allocator hook never allocates.
pub(crate) mod ledger {
    use std::alloc::{GlobalAlloc, Layout, System};
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::args::{EventData, InputData};

    const CAPACITY: usize = 512;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum BlockEvent {
        Allocated(usize),
        Used(usize),
        Released(usize),
    }

    struct Trace {
        entries: [Option<BlockEvent>; CAPACITY],
        len: usize,
        overflowed: bool,
    }

    impl Trace {
        const EMPTY: Self = Self {
            entries: [None; CAPACITY],
            len: 0,
            overflowed: false,
        };

        fn push(&mut self, event: BlockEvent) {
            match self.entries.get_mut(self.len) {
                Some(slot) => {
                    *slot = Some(event);
                    self.len += 1;
                }
                None => self.overflowed = true,
            }
        }

        /// Registered and not yet released.
        fn is_live(&self, addr: usize) -> bool {
            self.entries[..self.len]
                .iter()
                .rev()
                .flatten()
                .find_map(|event| match *event {
                    BlockEvent::Allocated(a) | BlockEvent::Used(a) if a == addr => Some(true),
                    BlockEvent::Released(a) if a == addr => Some(false),
                    _ => None,
                })
                .unwrap_or(false)
        }
    }

    thread_local! {
        static TRACE: RefCell<Trace> = const { RefCell::new(Trace::EMPTY) };
    }

    fn with_trace(f: impl FnOnce(&mut Trace)) {
        // Also reached from the allocator, where the thread may be tearing
        // down or the trace may already be borrowed.
        let _ = TRACE.try_with(|t| {
            if let Ok(mut trace) = t.try_borrow_mut() {
                f(&mut trace);
            }
        });
    }

    pub(crate) fn track_event(data: EventData) -> EventData {
        let addr = data.as_ptr() as usize;
        with_trace(|t| t.push(BlockEvent::Allocated(addr)));
        data
    }

    pub(crate) fn track_input(data: InputData) -> InputData {
        let addr = data.as_ptr() as usize;
        with_trace(|t| t.push(BlockEvent::Allocated(addr)));
        data
    }

    pub(crate) fn used(addr: usize) {
        with_trace(|t| t.push(BlockEvent::Used(addr)));
    }

    fn freed(addr: usize) {
        with_trace(|t| {
            if t.is_live(addr) {
                t.push(BlockEvent::Released(addr));
            }
        });
    }

    pub(crate) fn reset() {
        with_trace(|t| *t = Trace::EMPTY);
    }

    pub(crate) fn take() -> Vec<BlockEvent> {
        let mut taken = Trace::EMPTY;
        with_trace(|t| std::mem::swap(t, &mut taken));
        assert!(!taken.overflowed, "block ledger overflowed");
        taken.entries[..taken.len].iter().flatten().copied().collect()
    }

    /// System allocator that reports frees to the ledger.
    struct LedgerAlloc;

    unsafe impl GlobalAlloc for LedgerAlloc {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            unsafe { System.alloc(layout) }
        }

        unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
            unsafe { System.alloc_zeroed(layout) }
        }

        unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
            unsafe { System.realloc(ptr, layout, new_size) }
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            freed(ptr as usize);
            unsafe { System.dealloc(ptr, layout) }
        }
    }

    #[global_allocator]
    static GLOBAL: LedgerAlloc = LedgerAlloc;

    /// Every block must be allocated once, used at most once, and released
    /// exactly once, in that order.  Addresses may be reused after release.
    pub(crate) fn check_linear(entries: &[BlockEvent]) -> Result<(), String> {
        // live block address -> times used
        let mut live: HashMap<usize, u32> = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            match *entry {
                BlockEvent::Allocated(addr) => {
                    if live.insert(addr, 0).is_some() {
                        return Err(format!("#{i}: block {addr:#x} allocated while live"));
                    }
                }
                BlockEvent::Used(addr) => match live.get_mut(&addr) {
                    Some(uses) if *uses == 0 => *uses = 1,
                    Some(_) => return Err(format!("#{i}: block {addr:#x} used twice")),
                    None => return Err(format!("#{i}: block {addr:#x} used while not live")),
                },
                BlockEvent::Released(addr) => {
                    if live.remove(&addr).is_none() {
                        return Err(format!("#{i}: block {addr:#x} released while not live"));
                    }
                }
            }
        }

        match live.keys().next() {
            Some(addr) => Err(format!("block {addr:#x} never released")),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_checker_accepts_reuse_after_release() {
            let trace = [
                BlockEvent::Allocated(0x10),
                BlockEvent::Used(0x10),
                BlockEvent::Released(0x10),
                BlockEvent::Allocated(0x10),
                BlockEvent::Released(0x10),
            ];
            assert!(check_linear(&trace).is_ok());
        }

        #[test]
        fn test_checker_rejects_double_release() {
            let trace = [
                BlockEvent::Allocated(0x10),
                BlockEvent::Released(0x10),
                BlockEvent::Released(0x10),
            ];
            assert!(check_linear(&trace).unwrap_err().contains("released while not live"));
        }

        #[test]
        fn test_checker_rejects_use_after_release_and_leaks() {
            let after_release = [
                BlockEvent::Allocated(0x20),
                BlockEvent::Released(0x20),
                BlockEvent::Used(0x20),
            ];
            assert!(check_linear(&after_release).is_err());

            let leaked = [BlockEvent::Allocated(0x30)];
            assert!(check_linear(&leaked).unwrap_err().contains("never released"));
        }

        #[test]
        fn test_checker_rejects_double_use() {
            let trace = [
                BlockEvent::Allocated(0x40),
                BlockEvent::Used(0x40),
                BlockEvent::Used(0x40),
                BlockEvent::Released(0x40),
            ];
            assert!(check_linear(&trace).unwrap_err().contains("used twice"));
        }
    }
}
