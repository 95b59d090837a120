//! Emulated devices reachable through port I/O.

pub mod serial;
