//! Background reconciliation: TTL sweep, orphan removal and the task loop

mod background;
mod expiry;
mod orphans;

pub use background::start_controllers;
