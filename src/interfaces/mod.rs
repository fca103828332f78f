//! Outer adapters turning external formats into domain payloads and back.

pub mod csv;
