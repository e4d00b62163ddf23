//! Subsystem modules for the OmnIA backend.

pub mod agents;
pub mod comms;
pub mod memory;
pub mod persona;
