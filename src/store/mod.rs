//! Persistence of check-ins.
//! The basic idea is:
//!  - A single key-value slot holds up to five check-ins as a json array.
//!  - [record_store::RecordStore] owns the in-memory sequence and mirrors
//!    every mutation into the slot.
//!  - The slot is reached through [slot_storage::SlotStorage] so tests can
//!    substitute it.

pub mod entities;
pub mod record_store;
pub mod slot_storage;
