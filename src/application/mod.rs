//! Application layer orchestrating the domain rules over the storage ports.
//!
//! This module defines the `BankEngine`, the entry point for posting
//! transactions, resolving their status and listing what was stored.

pub mod engine;
