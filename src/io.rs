//! Port I/O dispatch.
//!
//! Guest `IN`/`OUT` instructions are routed through [`IoDispatch`] to the
//! [`IoHandler`] registered for that port, or fall back to default bus
//! behavior when no handler exists: all-ones on read, discard on write.

use std::cell::RefCell;
use std::rc::Rc;

/// Trait implemented by devices that respond to x86 port I/O.
///
/// Each handler covers a contiguous range of ports registered via
/// [`IoDispatch::register`]. The `port` argument is the absolute port
/// number, not an offset into the region.
pub trait IoHandler {
    /// Byte read from `port` (guest `IN`).
    fn in8(&mut self, port: u16) -> u8;

    /// Byte write to `port` (guest `OUT`).
    fn out8(&mut self, port: u16, val: u8);
}

/// Forwarding impl so a device can stay owned by the host behind a shared
/// handle while simultaneously being registered in the dispatch table.
impl<T: IoHandler> IoHandler for Rc<RefCell<T>> {
    fn in8(&mut self, port: u16) -> u8 {
        self.borrow_mut().in8(port)
    }

    fn out8(&mut self, port: u16, val: u8) {
        self.borrow_mut().out8(port, val)
    }
}

/// A registered I/O port region backed by a handler.
struct IoRegion {
    /// First port in the region (inclusive).
    base: u16,
    /// Number of consecutive ports covered by this region.
    count: u16,
    /// The device handler for this port range.
    handler: Box<dyn IoHandler>,
}

impl IoRegion {
    /// Returns `true` if `port` falls within this region.
    #[inline]
    fn contains(&self, port: u16) -> bool {
        port >= self.base && port < self.base.wrapping_add(self.count)
    }
}

/// Central dispatch table for guest port I/O.
///
/// Devices register their port ranges at machine setup time; the `IN`/
/// `OUT` handlers call [`port_in8`](IoDispatch::port_in8) and
/// [`port_out8`](IoDispatch::port_out8), which route to the appropriate
/// handler. Overlapping registrations are not checked; the first matching
/// region wins.
pub struct IoDispatch {
    /// Registered I/O regions, searched linearly on each access.
    regions: Vec<IoRegion>,
}

impl IoDispatch {
    /// Create an empty dispatch table with no registered handlers.
    pub fn new() -> Self {
        IoDispatch {
            regions: Vec::new(),
        }
    }

    /// Register a handler for a contiguous range of I/O ports.
    pub fn register(&mut self, base: u16, count: u16, handler: Box<dyn IoHandler>) {
        self.regions.push(IoRegion {
            base,
            count,
            handler,
        });
    }

    /// Perform a port read (guest `IN`). Unhandled ports float the bus.
    pub fn port_in8(&mut self, port: u16) -> u8 {
        for region in self.regions.iter_mut() {
            if region.contains(port) {
                return region.handler.in8(port);
            }
        }
        0xFF
    }

    /// Perform a port write (guest `OUT`). Unhandled writes are discarded.
    pub fn port_out8(&mut self, port: u16, val: u8) {
        for region in self.regions.iter_mut() {
            if region.contains(port) {
                return region.handler.out8(port, val);
            }
        }
        log::trace!("discarded write 0x{:02X} to unhandled port 0x{:04X}", val, port);
    }
}
