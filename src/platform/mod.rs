//! Host platform interfaces
//!
//! The AVM does not schedule timers or read a wall clock on its own. Hosts
//! hand it an [`ExternalHandler`] for that, plus optional callbacks for
//! fscommand dispatch and class registration.

#[cfg(feature = "std")]
mod std_impl;

#[cfg(feature = "std")]
pub use std_impl::StdExternalHandler;

use std::rc::Rc;

use crate::avm::Avm;
use crate::error::AvmError;
use crate::object::ObjectRef;
use crate::value::Variable;

/// Closure scheduled by `setInterval`. Runs against the AVM that created it.
pub type IntervalCallback = Rc<dyn Fn(&mut Avm) -> Result<(), AvmError>>;

/// Receives `(command, argument)` from GetURL/GetURL2 and the builtin
/// bridges; its result is handed back to the script where one is expected.
pub type FsCommandFunction = Box<dyn FnMut(&str, &str) -> Variable>;

/// Receives `Object.registerClass(name, class)`.
pub type RegisterClassFunction = Box<dyn FnMut(&str, ObjectRef)>;

/// Host function reachable through CallFunction without an object context.
pub type StaticFunction = Rc<dyn Fn(&mut Avm, &[Variable]) -> Result<Variable, AvmError>>;

/// Timer scheduling and clock services provided by the host.
///
/// Interval callbacks must only be run while no other AVM entry point is
/// executing.
pub trait ExternalHandler {
    /// Schedule `callback` every `interval_ms` and return its id.
    fn set_interval(&mut self, interval_ms: u32, callback: IntervalCallback) -> u32;

    /// Cancel a scheduled interval. Unknown ids are ignored.
    fn clear_interval(&mut self, id: u32);

    /// Milliseconds on the host clock.
    fn get_time(&self) -> u64;

    /// Callbacks whose interval elapsed since the last poll. Hosts that drive
    /// intervals themselves can keep the default.
    fn take_due_intervals(&mut self) -> Vec<IntervalCallback> {
        Vec::new()
    }
}

/// Handler that never fires intervals and reports time 0.
#[derive(Debug, Default)]
pub struct NoOpExternalHandler {
    next_id: u32,
}

impl ExternalHandler for NoOpExternalHandler {
    fn set_interval(&mut self, _interval_ms: u32, _callback: IntervalCallback) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn clear_interval(&mut self, _id: u32) {}

    fn get_time(&self) -> u64 {
        0
    }
}
