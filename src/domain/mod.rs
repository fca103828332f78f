//! Domain types and the pure rules applied to them.

pub mod account;
pub mod balance;
pub mod ports;
pub mod reference;
pub mod status;
pub mod transaction;
