// src/domain/mod.rs
//
// Pure decision rules over already-fetched snapshots. Nothing in this
// module touches the database or performs IO; handlers load the rows,
// call in here, and persist the results.

pub mod achievement;
pub mod entitlement;
pub mod progress;
pub mod suggestion;
