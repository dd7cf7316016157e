//! Serializable report of the binary contract this crate was built with.
//!
//! Useful for diffing against a new host build: every size and offset the
//! dispatcher relies on is listed here, computed from the actual Rust
//! layouts rather than restated by hand.

use std::mem::{offset_of, size_of};

use serde::Serialize;

use crate::args::{RawEventData, RawInputData};
use crate::dispatch::RECEIVE_EVENT_SLOT;
use crate::event::EventType;
use crate::node::{ComponentBase, ComponentList, EventListener, ListItem, PopupMenu};

/// Size of one mirrored host structure.
#[derive(Debug, Clone, Serialize)]
pub struct StructSize {
    pub structure: &'static str,
    pub size: usize,
}

/// Offset of one field the dispatcher reads or writes.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOffset {
    pub structure: &'static str,
    pub field: &'static str,
    pub offset: usize,
}

/// A named event kind and its raw value.
#[derive(Debug, Clone, Serialize)]
pub struct EventKind {
    pub name: &'static str,
    pub value: u8,
}

/// Full layout report.
#[derive(Debug, Clone, Serialize)]
pub struct AbiLayout {
    pub pointer_width: usize,
    pub receive_event_slot: usize,
    pub event_data_size: usize,
    pub event_data_slots: usize,
    pub input_data_size: usize,
    pub input_data_slots: usize,
    pub structures: Vec<StructSize>,
    pub fields: Vec<FieldOffset>,
    pub event_types: Vec<EventKind>,
}

fn sized<T>(structure: &'static str) -> StructSize {
    StructSize {
        structure,
        size: size_of::<T>(),
    }
}

fn field(structure: &'static str, field: &'static str, offset: usize) -> FieldOffset {
    FieldOffset {
        structure,
        field,
        offset,
    }
}

/// Build the layout report.
pub fn layout() -> AbiLayout {
    let word = size_of::<usize>();

    AbiLayout {
        pointer_width: word * 8,
        receive_event_slot: RECEIVE_EVENT_SLOT,
        event_data_size: size_of::<RawEventData>(),
        event_data_slots: size_of::<RawEventData>() / word,
        input_data_size: size_of::<RawInputData>(),
        input_data_slots: size_of::<RawInputData>() / word,
        structures: vec![
            sized::<EventListener>("EventListener"),
            sized::<ComponentBase>("ComponentBase"),
            sized::<ComponentList>("ComponentList"),
            sized::<ListItem>("ListItem"),
            sized::<PopupMenu>("PopupMenu"),
        ],
        fields: vec![
            field("EventListener", "vtable", offset_of!(EventListener, vtable)),
            field("ComponentBase", "event_listener", offset_of!(ComponentBase, event_listener)),
            field("ComponentList", "component_base", offset_of!(ComponentList, component_base)),
            field("ComponentList", "item_renderer_list", offset_of!(ComponentList, item_renderer_list)),
            field("ComponentList", "list_length", offset_of!(ComponentList, list_length)),
            field("ListItem", "renderer", offset_of!(ListItem, renderer)),
            field("PopupMenu", "event_listener", offset_of!(PopupMenu, event_listener)),
            field("PopupMenu", "window", offset_of!(PopupMenu, window)),
            field("PopupMenu", "list", offset_of!(PopupMenu, list)),
            field("PopupMenu", "owner", offset_of!(PopupMenu, owner)),
            field("PopupMenu", "entry_count", offset_of!(PopupMenu, entry_count)),
            field("RawEventData", "target", offset_of!(RawEventData, target)),
            field("RawEventData", "listener", offset_of!(RawEventData, listener)),
            field("RawInputData", "item_renderer", offset_of!(RawInputData, item_renderer)),
            field("RawInputData", "list_selection", offset_of!(RawInputData, list_selection)),
        ],
        event_types: EventType::KNOWN
            .iter()
            .filter_map(|kind| {
                kind.name().map(|name| EventKind {
                    name,
                    value: kind.0,
                })
            })
            .collect(),
    }
}
