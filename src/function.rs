//! Callable objects and the register calling conventions
//!
//! A [`Function`] carries the metadata every call site needs (register
//! count, preload flags, parameter bindings) and one of three bodies:
//! scripted bytecode, a host closure, or a no-op placeholder used as the
//! constructor of builtin classes.
//!
//! Arguments and implicit values travel through the AVM's register banks.
//! Each call site pushes the callee's registers, fills them in its own
//! order, invokes, and pops them again.

use std::fmt;
use std::rc::Rc;

use crate::avm::Avm;
use crate::bytecode::ConstantPool;
use crate::error::AvmError;
use crate::interpreter::AsBuffer;
use crate::value::{AvmString, Variable};

/// Host closure behind a native function. Arguments arrive in registers.
pub type NativeFn = Rc<dyn Fn(&mut Avm) -> Result<Variable, AvmError>>;

/// Which implicit values are copied into the callee's first registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadFlags {
    pub this: bool,
    pub super_: bool,
    pub root: bool,
    pub global: bool,
}

impl PreloadFlags {
    pub const NONE: PreloadFlags = PreloadFlags {
        this: false,
        super_: false,
        root: false,
        global: false,
    };

    pub const THIS: PreloadFlags = PreloadFlags {
        this: true,
        super_: false,
        root: false,
        global: false,
    };
}

/// A parameter bound to a register. Register 0 means the argument is
/// stored as a variable under `name` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    pub register: u8,
    pub name: AvmString,
}

/// Bytecode body carved out of a DefineFunction{,2} instruction
#[derive(Clone)]
pub struct ScriptedFunction {
    pub code: Rc<[u8]>,
    pub constants: ConstantPool,
}

#[derive(Clone)]
pub struct NativeFunction {
    pub func: NativeFn,
}

#[derive(Clone)]
pub enum FunctionBody {
    Scripted(ScriptedFunction),
    Native(NativeFunction),
    /// Returns Undefined without touching the AVM
    Dummy,
}

/// A callable value
#[derive(Clone)]
pub struct Function {
    pub name: AvmString,
    /// Explicit argument registers; `None` allocates sequentially after the
    /// preloaded values.
    pub params: Option<Rc<[ParamBinding]>>,
    /// Registers pushed for the duration of a call
    pub num_registers: u8,
    pub preload: PreloadFlags,
    pub body: FunctionBody,
}

impl Function {
    pub fn scripted(
        name: impl Into<AvmString>,
        code: Rc<[u8]>,
        constants: ConstantPool,
        params: Option<Vec<ParamBinding>>,
        num_registers: u8,
        preload: PreloadFlags,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.map(Rc::from),
            num_registers,
            preload,
            body: FunctionBody::Scripted(ScriptedFunction { code, constants }),
        }
    }

    pub fn native<F>(
        name: impl Into<AvmString>,
        num_registers: u8,
        preload: PreloadFlags,
        func: F,
    ) -> Self
    where
        F: Fn(&mut Avm) -> Result<Variable, AvmError> + 'static,
    {
        Self {
            name: name.into(),
            params: None,
            num_registers,
            preload,
            body: FunctionBody::Native(NativeFunction {
                func: Rc::new(func),
            }),
        }
    }

    /// Stand-in constructor for builtin classes
    pub fn dummy(name: impl Into<AvmString>) -> Self {
        Self {
            name: name.into(),
            params: None,
            num_registers: 0,
            preload: PreloadFlags::NONE,
            body: FunctionBody::Dummy,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "anonymous"
        } else {
            self.name.as_str()
        }
    }

    /// Run the body against `avm` with registers already prepared.
    pub fn invoke(&self, avm: &mut Avm) -> Result<Variable, AvmError> {
        match &self.body {
            FunctionBody::Scripted(scripted) => {
                avm.enter_call()?;
                let mut buffer = AsBuffer::new(&scripted.code, scripted.constants.clone());
                let outcome = buffer.run(avm);
                avm.leave_call();
                outcome?;
                Ok(avm.return_value().clone())
            }
            FunctionBody::Native(native) => (native.func)(avm),
            FunctionBody::Dummy => Ok(Variable::Undefined),
        }
    }

    /// Copy call arguments into their registers, or sequentially from `next`
    /// when the function declares no bindings.
    pub(crate) fn store_arguments(
        &self,
        avm: &mut Avm,
        mut next: usize,
        args: &[Variable],
    ) -> Result<(), AvmError> {
        match &self.params {
            Some(params) => {
                for (binding, arg) in params.iter().zip(args) {
                    if binding.register == 0 {
                        avm.set_variable(binding.name.as_str(), arg.clone());
                    } else {
                        avm.store_register(binding.register as usize, arg.clone())?;
                    }
                }
            }
            None => {
                for arg in args {
                    avm.store_register(next, arg.clone())?;
                    next += 1;
                }
            }
        }
        Ok(())
    }

    /// Invoke with the AVM return value cleared before and after the call.
    fn invoke_framed(&self, avm: &mut Avm) -> Result<Variable, AvmError> {
        avm.set_return_value(Variable::Undefined);
        let result = self.invoke(avm);
        avm.set_return_value(Variable::Undefined);
        result
    }

    /// The CallMethod convention.
    ///
    /// Preload order is this, `_root`, super, `_global`, then arguments. A
    /// super call keeps the caller's `this` instead of `target`. Register 1
    /// is restored to the caller's value before the registers are popped.
    pub fn call_method(
        &self,
        avm: &mut Avm,
        target: Variable,
        is_super: bool,
        super_ctor: Variable,
        args: &[Variable],
    ) -> Result<Variable, AvmError> {
        let saved_this = avm.get_register(1);
        let count = self.num_registers as usize;
        avm.push_registers(count);

        let outcome = (|| -> Result<Variable, AvmError> {
            let mut next = 1;
            if self.preload.this {
                let this = if is_super { saved_this.clone() } else { target };
                avm.store_register(next, this)?;
                next += 1;
            }
            if self.preload.root {
                let root = avm.get_variable("_root");
                avm.store_register(next, root)?;
                next += 1;
            }
            if self.preload.super_ {
                avm.store_register(next, super_ctor)?;
                next += 1;
            }
            if self.preload.global {
                let global = avm.get_variable("_global");
                avm.store_register(next, global)?;
                next += 1;
            }
            self.store_arguments(avm, next, args)?;
            self.invoke_framed(avm)
        })();

        let restored = avm.store_register(1, saved_this);
        avm.pop_registers(count);
        let result = outcome?;
        restored?;
        Ok(result)
    }

    /// The `Object::call` convention: `_root`, this, then arguments.
    pub fn call_with_this(
        &self,
        avm: &mut Avm,
        this: Variable,
        args: &[Variable],
    ) -> Result<Variable, AvmError> {
        let count = self.num_registers as usize;
        avm.push_registers(count);

        let outcome = (|| -> Result<Variable, AvmError> {
            let mut next = 1;
            if self.preload.root {
                let root = avm.get_variable("_root");
                avm.store_register(next, root)?;
                next += 1;
            }
            if self.preload.this {
                avm.store_register(next, this)?;
                next += 1;
            }
            self.store_arguments(avm, next, args)?;
            self.invoke_framed(avm)
        })();

        avm.pop_registers(count);
        outcome
    }

    /// The constructor convention used by NewObject: `_root`, this (the new
    /// object), super, then arguments. The constructor's return value is
    /// discarded.
    pub fn construct(
        &self,
        avm: &mut Avm,
        this: Variable,
        super_ctor: Variable,
        args: &[Variable],
    ) -> Result<(), AvmError> {
        let count = self.num_registers as usize;
        avm.push_registers(count);

        let outcome = (|| -> Result<Variable, AvmError> {
            let mut next = 1;
            if self.preload.root {
                let root = avm.get_variable("_root");
                avm.store_register(next, root)?;
                next += 1;
            }
            if self.preload.this {
                avm.store_register(next, this)?;
                next += 1;
            }
            if self.preload.super_ {
                avm.store_register(next, super_ctor)?;
                next += 1;
            }
            self.store_arguments(avm, next, args)?;
            self.invoke_framed(avm)
        })();

        avm.pop_registers(count);
        outcome.map(|_| ())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            FunctionBody::Scripted(s) => format!("scripted({} bytes)", s.code.len()),
            FunctionBody::Native(_) => "native".to_string(),
            FunctionBody::Dummy => "dummy".to_string(),
        };
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("num_registers", &self.num_registers)
            .field("preload", &self.preload)
            .field("body", &body)
            .finish()
    }
}
