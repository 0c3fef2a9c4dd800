//! The AVM execution context
//!
//! An [`Avm`] owns everything that outlives a single instruction stream:
//! global variables, static host functions, the register banks, the stop
//! and return-value flags, and the bridges to host callbacks. Every opcode
//! handler and function invocation receives it by `&mut` reference.

pub mod builtins;
mod registers;

pub use registers::{REGISTER_BANKS, RegisterFile};

use crate::bytecode::ConstantPool;
use crate::config::AvmConfig;
use crate::error::AvmError;
use crate::interpreter::AsBuffer;
use crate::object::{CONSTRUCTOR, ObjectRef, PROTOTYPE};
use crate::platform::{
    ExternalHandler, FsCommandFunction, IntervalCallback, RegisterClassFunction, StaticFunction,
};
use crate::prelude::{FxHashMap, Rc};
use crate::value::{AvmString, CheapClone, Variable};

/// Execution context shared by every script of one GUI host
pub struct Avm {
    config: AvmConfig,
    /// Flat global variable table
    variables: FxHashMap<AvmString, Variable>,
    /// Host functions reachable through CallFunction
    functions: FxHashMap<AvmString, StaticFunction>,
    registers: RegisterFile,
    stop_flag: bool,
    return_value: Variable,
    call_depth: usize,
    external_handler: Option<Box<dyn ExternalHandler>>,
    /// Handler time when the handler was installed
    handler_start: u64,
    fscommand: Option<FsCommandFunction>,
    register_class: Option<RegisterClassFunction>,
    #[cfg(feature = "std")]
    start: std::time::Instant,
}

impl Avm {
    pub fn new() -> Self {
        Self::with_config(AvmConfig::default())
    }

    pub fn with_config(config: AvmConfig) -> Self {
        let mut avm = Self {
            config,
            variables: FxHashMap::default(),
            functions: FxHashMap::default(),
            registers: RegisterFile::new(),
            stop_flag: false,
            return_value: Variable::Undefined,
            call_depth: 0,
            external_handler: None,
            handler_start: 0,
            fscommand: None,
            register_class: None,
            #[cfg(feature = "std")]
            start: std::time::Instant::now(),
        };
        builtins::install(&mut avm);
        avm
    }

    pub fn config(&self) -> &AvmConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════
    // Host callbacks
    // ═══════════════════════════════════════════════════════════════

    pub fn set_fscommand(&mut self, callback: FsCommandFunction) {
        self.fscommand = Some(callback);
    }

    pub fn set_register_class(&mut self, callback: RegisterClassFunction) {
        self.register_class = Some(callback);
    }

    /// Install the timer/clock provider. GetTime counts from this point.
    pub fn set_external_handler(&mut self, handler: Box<dyn ExternalHandler>) {
        self.handler_start = handler.get_time();
        self.external_handler = Some(handler);
    }

    pub fn register_static_function(&mut self, name: &str, function: StaticFunction) {
        self.functions.insert(AvmString::from(name), function);
    }

    /// Forward a command to the host. Without a host callback this is a
    /// no-op returning Undefined.
    pub fn fscommand(&mut self, name: &str, value: &str) -> Variable {
        log::debug!("fscommand {}({})", name, value);
        match self.fscommand.as_mut() {
            Some(callback) => callback(name, value),
            None => Variable::Undefined,
        }
    }

    pub fn register_class(&mut self, name: &str, class: ObjectRef) {
        log::debug!("registerClass {}", name);
        if let Some(callback) = self.register_class.as_mut() {
            callback(name, class);
        }
    }

    /// Schedule an interval with the host. `None` when no handler is set.
    pub fn set_interval(&mut self, interval_ms: u32, callback: IntervalCallback) -> Option<u32> {
        let handler = self.external_handler.as_mut()?;
        let id = handler.set_interval(interval_ms, callback);
        log::debug!("setInterval {}ms -> {}", interval_ms, id);
        Some(id)
    }

    pub fn clear_interval(&mut self, id: u32) {
        log::debug!("clearInterval {}", id);
        if let Some(handler) = self.external_handler.as_mut() {
            handler.clear_interval(id);
        }
    }

    /// Run every interval callback the handler reports as due. Returns how
    /// many ran; the first failing callback aborts the rest.
    pub fn run_due_intervals(&mut self) -> Result<usize, AvmError> {
        let due = match self.external_handler.as_mut() {
            Some(handler) => handler.take_due_intervals(),
            None => return Ok(0),
        };
        for callback in &due {
            callback(self)?;
        }
        Ok(due.len())
    }

    /// Milliseconds since the AVM (or its external handler) started
    pub fn elapsed_time(&self) -> u64 {
        if let Some(handler) = &self.external_handler {
            return handler.get_time().saturating_sub(self.handler_start);
        }
        #[cfg(feature = "std")]
        {
            self.start.elapsed().as_millis() as u64
        }
        #[cfg(not(feature = "std"))]
        {
            0
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Variables
    // ═══════════════════════════════════════════════════════════════

    /// Read a global.
    ///
    /// Checks the flat table, then `_global`'s own members. A miss stores
    /// Undefined on `_global` under `name`.
    pub fn get_variable(&self, name: &str) -> Variable {
        if let Some(value) = self.variables.get(name) {
            return value.clone();
        }
        let Some(Variable::Object(global)) = self.variables.get("_global") else {
            return Variable::Undefined;
        };
        if let Some(value) = global.get_own(name) {
            return value;
        }
        global.set_member(name, Variable::Undefined);
        Variable::Undefined
    }

    /// Write the flat global table
    pub fn set_variable(&mut self, name: &str, value: Variable) {
        self.variables.insert(AvmString::from(name), value);
    }

    /// Existence check over the same tables as [`Avm::get_variable`],
    /// without creating anything.
    pub fn has_variable(&self, name: &str) -> bool {
        if self.variables.contains_key(name) {
            return true;
        }
        match self.variables.get("_global") {
            Some(Variable::Object(global)) => global.has_own(name),
            _ => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Registers
    // ═══════════════════════════════════════════════════════════════

    pub fn push_registers(&mut self, count: usize) {
        self.registers.push(count);
    }

    pub fn pop_registers(&mut self, count: usize) {
        self.registers.pop(count);
    }

    pub fn store_register(&mut self, index: usize, value: Variable) -> Result<(), AvmError> {
        self.registers.store(index, value)
    }

    pub fn get_register(&self, index: usize) -> Variable {
        self.registers.get(index)
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    // ═══════════════════════════════════════════════════════════════
    // Flags
    // ═══════════════════════════════════════════════════════════════

    pub fn set_stop_flag(&mut self) {
        self.stop_flag = true;
    }

    /// Read the stop flag, clearing it
    pub fn take_stop_flag(&mut self) -> bool {
        std::mem::take(&mut self.stop_flag)
    }

    pub fn return_value(&self) -> &Variable {
        &self.return_value
    }

    pub fn set_return_value(&mut self, value: Variable) {
        self.return_value = value;
    }

    pub fn take_return_value(&mut self) -> Variable {
        std::mem::take(&mut self.return_value)
    }

    /// Count a scripted call, failing past the configured depth
    pub fn enter_call(&mut self) -> Result<(), AvmError> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(AvmError::CallDepth {
                depth: self.config.max_call_depth,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    pub fn leave_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    // ═══════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════

    /// CallFunction dispatch.
    ///
    /// Tries the static function table, then a function-valued global
    /// (called with an undefined `this`). Anything else logs a warning and
    /// gives Undefined.
    pub fn call_function(&mut self, name: &str, args: &[Variable]) -> Result<Variable, AvmError> {
        if let Some(function) = self.functions.get(name).map(Rc::clone) {
            return function(self, args);
        }
        if self.has_variable(name) {
            if let Some(function) = self.get_variable(name).as_object().and_then(|f| f.as_function())
            {
                return function.call_with_this(self, Variable::Undefined, args);
            }
        }
        log::warn!("CallFunction: no function named {}", name);
        Ok(Variable::Undefined)
    }

    /// The NewObject protocol.
    ///
    /// `name` must resolve to a function with a `prototype` object. The new
    /// object starts as a copy of the prototype and is passed to the
    /// constructor as `this`; the constructor's return value is discarded.
    pub fn create_new_object(&mut self, name: &str, args: &[Variable]) -> Result<Variable, AvmError> {
        let class = match self.get_variable(name) {
            Variable::Object(class) if class.is_function() => class,
            _ => {
                return Err(AvmError::type_error(
                    "createNewObject",
                    format!("{} is not a function", name),
                ));
            }
        };
        let prototype = match class.get_own(PROTOTYPE) {
            Some(Variable::Object(prototype)) => prototype,
            _ => {
                return Err(AvmError::resolution_error(format!(
                    "createNewObject: {} has no prototype",
                    name
                )));
            }
        };
        let constructor = class.as_function().ok_or_else(|| {
            AvmError::resolution_error(format!("createNewObject: {} is not callable", name))
        })?;

        let object = ObjectRef::instantiate(&prototype);
        let super_ctor = prototype.get_own(CONSTRUCTOR).unwrap_or_default();
        constructor.construct(self, Variable::Object(object.cheap_clone()), super_ctor, args)?;
        Ok(Variable::Object(object))
    }

    /// Run a top-level stream with an empty constant pool and hand back its
    /// return value. The return value is cleared afterwards.
    pub fn run_script(&mut self, code: &[u8]) -> Result<Variable, AvmError> {
        self.return_value = Variable::Undefined;
        let mut buffer = AsBuffer::new(code, ConstantPool::empty());
        let outcome = buffer.run(self);
        let value = self.take_return_value();
        outcome.map(|_| value)
    }
}

impl Default for Avm {
    fn default() -> Self {
        Self::new()
    }
}
