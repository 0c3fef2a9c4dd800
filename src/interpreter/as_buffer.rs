//! AsBuffer - decode and dispatch loop for one instruction stream
//!
//! An `AsBuffer` runs a single function body (or frame script) against a
//! shared [`Avm`]. It owns the read cursor, the active constant pool and a
//! private evaluation stack. Calls into other scripted functions build their
//! own `AsBuffer` over the callee's code.
//!
//! Operands are pushed left to right and popped right to left: with the
//! stack `[.., b, a]`, binary operators compute `b op a`.

use std::rc::Rc;

use super::eval_stack::EvalStack;
use crate::avm::Avm;
use crate::avm::builtins::create_array;
use crate::bytecode::{ActionCode, BitReader, ByteStream, ConstantPool, is_long_opcode, push_type};
use crate::error::AvmError;
use crate::function::{Function, ParamBinding, PreloadFlags};
use crate::object::{CONSTRUCTOR, MAX_ARRAY_INDEX, ObjectRef, PROTOTYPE};
use crate::value::{AvmString, CheapClone, Variable};

/// Register count given to DefineFunction (v1) bodies
const DEFINE_FUNCTION_REGISTERS: u8 = 4;

/// URL prefix GetURL uses to address the fscommand bridge
const FSCOMMAND_PREFIX: &str = "FSCommand:";

/// Bytecode interpreter over a borrowed stream
pub struct AsBuffer<'a> {
    stream: ByteStream<'a>,
    constants: ConstantPool,
    stack: EvalStack,
    /// Bytes the current instruction moved the cursor without consuming
    /// payload (branch offsets, carved function bodies)
    adjust: i64,
}

impl<'a> AsBuffer<'a> {
    pub fn new(code: &'a [u8], constants: ConstantPool) -> Self {
        Self {
            stream: ByteStream::new(code),
            constants,
            stack: EvalStack::new(),
            adjust: 0,
        }
    }

    /// The constant pool currently in effect
    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn stack(&self) -> &EvalStack {
        &self.stack
    }

    /// Execute from the start of the stream.
    ///
    /// Stops at an End opcode, at the end of the stream, or once the AVM
    /// return value is no longer Undefined. The first error aborts the run.
    pub fn run(&mut self, avm: &mut Avm) -> Result<(), AvmError> {
        self.stream.seek(0)?;
        self.stack.clear();

        while !self.stream.at_end() {
            let offset = self.stream.pos();
            let opcode = self.stream.read_u8()?;
            if opcode == ActionCode::End.as_u8() {
                break;
            }
            let length = if is_long_opcode(opcode) {
                self.stream.read_u16()? as usize
            } else {
                0
            };
            log::trace!("{:06}: opcode 0x{:02X} length {}", offset, opcode, length);

            let payload_start = self.stream.pos();
            self.adjust = 0;
            match ActionCode::from_u8(opcode) {
                Some(code) => self.execute(code, length, avm)?,
                None => {
                    log::warn!(
                        "unknown opcode 0x{:02X} at {}, skipping {} bytes",
                        opcode,
                        offset,
                        length
                    );
                    self.stream.skip(length)?;
                }
            }

            let consumed = self.stream.pos() as i64 - payload_start as i64 - self.adjust;
            if consumed != length as i64 {
                return Err(AvmError::invalid_tag(opcode, length, consumed));
            }

            if !avm.return_value().is_undefined() {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, code: ActionCode, length: usize, avm: &mut Avm) -> Result<(), AvmError> {
        match code {
            // ═══════════════════════════════════════════════════════════════
            // Control
            // ═══════════════════════════════════════════════════════════════
            ActionCode::End => {}

            ActionCode::Stop => avm.set_stop_flag(),

            ActionCode::Jump => {
                let offset = self.stream.read_i16()? as i64;
                self.branch(offset)?;
            }

            ActionCode::If => {
                let offset = self.stream.read_i16()? as i64;
                let condition = self.stack.pop("If")?;
                if condition.as_boolean() {
                    self.branch(offset)?;
                }
            }

            ActionCode::Return => {
                let value = self.stack.pop("Return")?;
                avm.set_return_value(value);
            }

            ActionCode::Trace => {
                if let Some(value) = self.stack.try_pop() {
                    log::debug!("trace: {:?}", value);
                }
            }

            ActionCode::GetTime => {
                self.stack.push(avm.elapsed_time() as f64);
            }

            // ═══════════════════════════════════════════════════════════════
            // Stack
            // ═══════════════════════════════════════════════════════════════
            ActionCode::Push => self.push_literals(length, avm)?,

            ActionCode::Pop => {
                self.stack.try_pop();
            }

            ActionCode::PushDuplicate => {
                let top = self.stack.top("PushDuplicate")?.clone();
                self.stack.push(top);
            }

            ActionCode::StackSwap => {
                let a = self.stack.pop("StackSwap")?;
                let b = self.stack.pop("StackSwap")?;
                self.stack.push(a);
                self.stack.push(b);
            }

            ActionCode::ConstantPool => {
                let count = self.stream.read_u16()?;
                let mut entries = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    entries.push(self.stream.read_string()?);
                }
                self.constants = ConstantPool::new(entries);
            }

            ActionCode::StoreRegister => {
                let register = self.stream.read_u8()?;
                let value = self.stack.top("StoreRegister")?.clone();
                avm.store_register(register as usize, value)?;
            }

            // ═══════════════════════════════════════════════════════════════
            // Arithmetic and comparison
            // ═══════════════════════════════════════════════════════════════
            ActionCode::Add => {
                let (b, a) = self.pop_pair("Add")?;
                self.stack.push(b.as_number() + a.as_number());
            }

            ActionCode::Add2 => {
                let (b, a) = self.pop_pair("Add2")?;
                self.stack.push(b.generic_add(&a));
            }

            ActionCode::Subtract => {
                let (b, a) = self.pop_pair("Subtract")?;
                self.stack.push(b.subtract(&a));
            }

            ActionCode::Multiply => {
                let (b, a) = self.pop_pair("Multiply")?;
                self.stack.push(b.multiply(&a));
            }

            ActionCode::Divide => {
                let (b, a) = self.pop_pair("Divide")?;
                self.stack.push(b.divide(&a));
            }

            ActionCode::Modulo => {
                let (b, a) = self.pop_pair("Modulo")?;
                self.stack.push(b.modulo(&a));
            }

            ActionCode::Increment => {
                let value = self.stack.pop("Increment")?;
                self.stack.push(value.as_number() + 1.0);
            }

            ActionCode::Decrement => {
                let value = self.stack.pop("Decrement")?;
                self.stack.push(value.as_number() - 1.0);
            }

            ActionCode::Equals => {
                let (b, a) = self.pop_pair("Equals")?;
                self.stack.push(b.as_number() == a.as_number());
            }

            ActionCode::Less => {
                let (b, a) = self.pop_pair("Less")?;
                self.stack.push(b.as_number() < a.as_number());
            }

            ActionCode::Equals2 | ActionCode::StrictEquals => {
                let (b, a) = self.pop_pair("Equals2")?;
                self.stack.push(b.loose_equals(&a));
            }

            ActionCode::Less2 => {
                let (b, a) = self.pop_pair("Less2")?;
                self.stack.push(b.less_than(&a));
            }

            // a < b with the stack [.., b, a]
            ActionCode::Greater => {
                let (b, a) = self.pop_pair("Greater")?;
                self.stack.push(a.less_than(&b));
            }

            ActionCode::And => {
                let (b, a) = self.pop_pair("And")?;
                self.stack.push(b.logical_and(&a));
            }

            ActionCode::Or => {
                let (b, a) = self.pop_pair("Or")?;
                self.stack.push(b.logical_or(&a));
            }

            ActionCode::Not => {
                let value = self.stack.pop("Not")?;
                self.stack.push(!value.as_boolean());
            }

            // ═══════════════════════════════════════════════════════════════
            // Strings and conversions
            // ═══════════════════════════════════════════════════════════════
            ActionCode::StringEquals => {
                let (b, a) = self.pop_pair("StringEquals")?;
                self.stack.push(b.as_string() == a.as_string());
            }

            ActionCode::StringLength => {
                let value = self.stack.pop("StringLength")?;
                self.stack.push(value.as_string().char_count() as f64);
            }

            ActionCode::StringAdd => {
                let (b, a) = self.pop_pair("StringAdd")?;
                self.stack.push(b.as_string() + &a.as_string());
            }

            ActionCode::ToNumber => {
                let value = self.stack.pop("ToNumber")?;
                self.stack.push(value.as_number());
            }

            ActionCode::ToString => {
                let value = self.stack.pop("ToString")?;
                self.stack.push(value.as_string());
            }

            ActionCode::TypeOf => {
                let value = self.stack.pop("TypeOf")?;
                self.stack.push(value.type_of());
            }

            // ═══════════════════════════════════════════════════════════════
            // Variables
            // ═══════════════════════════════════════════════════════════════
            ActionCode::GetVariable => {
                let name = self.pop_name("GetVariable")?;
                let value = get_variable_path(avm, name.as_str())?;
                self.stack.push(value);
            }

            ActionCode::SetVariable => {
                let value = self.stack.pop("SetVariable")?;
                let name = self.pop_name("SetVariable")?;
                set_variable_path(avm, name.as_str(), value)?;
            }

            // Defines a global; there is no per-call scope
            ActionCode::DefineLocal => {
                let value = self.stack.pop("DefineLocal")?;
                let name = self.pop_name("DefineLocal")?;
                avm.set_variable(name.as_str(), value);
            }

            // ═══════════════════════════════════════════════════════════════
            // Objects
            // ═══════════════════════════════════════════════════════════════
            ActionCode::GetMember => {
                let name = self.stack.pop("GetMember")?;
                let target = self.stack.pop("GetMember")?;
                let value = get_member(&target, &name)?;
                self.stack.push(value);
            }

            ActionCode::SetMember => {
                let value = self.stack.pop("SetMember")?;
                let name = self.stack.pop("SetMember")?;
                let target = self.stack.pop("SetMember")?;
                set_member(&target, &name, value)?;
            }

            ActionCode::InitArray => {
                let count = self.stack.pop_count("InitArray")?;
                let mut elements = self.stack.pop_args(count, "InitArray")?;
                elements.reverse();
                self.stack.push(create_array(elements));
            }

            ActionCode::InitObject => {
                let count = self.stack.pop_count("InitObject")?;
                let object = ObjectRef::new_plain();
                for _ in 0..count {
                    let value = self.stack.pop("InitObject")?;
                    let name = self.stack.pop("InitObject")?;
                    object.set_member(name.as_string().as_str(), value);
                }
                self.stack.push(object);
            }

            ActionCode::NewObject => {
                let name = self.pop_name("NewObject")?;
                let count = self.stack.pop_count("NewObject")?;
                let args = self.stack.pop_args(count, "NewObject")?;
                let object = avm.create_new_object(name.as_str(), &args)?;
                self.stack.push(object);
            }

            ActionCode::Enumerate2 => {
                let target = self.stack.pop("Enumerate2")?;
                self.stack.push(Variable::Null);
                if let Variable::Object(object) = target {
                    for name in object.slot_names() {
                        self.stack.push(name);
                    }
                }
            }

            ActionCode::Extends => {
                let superclass = self.stack.pop("Extends")?;
                let subclass = self.stack.pop("Extends")?;
                extend_class(&subclass, &superclass)?;
            }

            // ═══════════════════════════════════════════════════════════════
            // Functions
            // ═══════════════════════════════════════════════════════════════
            ActionCode::DefineFunction => self.define_function(avm)?,

            ActionCode::DefineFunction2 => self.define_function2(avm)?,

            ActionCode::CallFunction => {
                let name = self.pop_name("CallFunction")?;
                let count = self.stack.pop_count("CallFunction")?;
                let args = self.stack.pop_args(count, "CallFunction")?;
                let result = avm.call_function(name.as_str(), &args)?;
                self.stack.push(result);
            }

            ActionCode::CallMethod => {
                let result = self.call_method(avm)?;
                self.stack.push(result);
            }

            // ═══════════════════════════════════════════════════════════════
            // Host bridge
            // ═══════════════════════════════════════════════════════════════
            ActionCode::GetUrl => {
                let url = self.stream.read_string()?;
                let target = self.stream.read_string()?;
                avm.fscommand(strip_fscommand(url.as_str()), target.as_str());
            }

            ActionCode::GetUrl2 => {
                let flags = self.stream.read_bytes(1)?;
                let mut bits = BitReader::new(flags);
                let send_vars = bits.read_bits(2)?;
                let reserved = bits.read_bits(4)?;
                let load_target = bits.read_bit()?;
                let load_variables = bits.read_bit()?;
                if reserved != 0 {
                    return Err(AvmError::format_error(format!(
                        "GetURL2: reserved bits set ({:#x})",
                        reserved
                    )));
                }
                log::trace!(
                    "GetURL2 send_vars={} load_target={} load_variables={}",
                    send_vars,
                    load_target,
                    load_variables
                );
                let target = self.stack.pop("GetURL2")?;
                let url = self.stack.pop("GetURL2")?;
                let url = url.as_string();
                avm.fscommand(strip_fscommand(url.as_str()), target.as_string().as_str());
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════
    // Operand helpers
    // ═══════════════════════════════════════════════════════════════

    /// Pop `a` then `b` for the stack `[.., b, a]`
    fn pop_pair(&mut self, operation: &'static str) -> Result<(Variable, Variable), AvmError> {
        let a = self.stack.pop(operation)?;
        let b = self.stack.pop(operation)?;
        Ok((b, a))
    }

    fn pop_name(&mut self, operation: &'static str) -> Result<AvmString, AvmError> {
        match self.stack.pop(operation)? {
            Variable::String(name) => Ok(name),
            _ => Err(AvmError::type_error(operation, "name is not a string")),
        }
    }

    /// Relative seek from the end of the offset field
    fn branch(&mut self, offset: i64) -> Result<(), AvmError> {
        self.stream.seek_relative(offset)?;
        self.adjust += offset;
        Ok(())
    }

    fn push_literals(&mut self, length: usize, avm: &mut Avm) -> Result<(), AvmError> {
        let start = self.stream.pos();
        while self.stream.pos() - start < length {
            let tag = self.stream.read_u8()?;
            let value = match tag {
                push_type::STRING => Variable::String(self.stream.read_string()?),
                push_type::FLOAT => Variable::Number(self.stream.read_f32()? as f64),
                push_type::NULL => Variable::Null,
                push_type::UNDEFINED => Variable::Undefined,
                push_type::REGISTER => {
                    let register = self.stream.read_u8()?;
                    avm.get_register(register as usize)
                }
                push_type::BOOLEAN => Variable::Boolean(self.stream.read_u8()? != 0),
                push_type::DOUBLE => Variable::Number(self.stream.read_swapped_f64()?),
                push_type::INTEGER => Variable::Number(self.stream.read_i32()? as f64),
                push_type::CONSTANT8 => {
                    let index = self.stream.read_u8()? as usize;
                    self.constant(index)?
                }
                push_type::CONSTANT16 => {
                    let index = self.stream.read_u16()? as usize;
                    self.constant(index)?
                }
                other => {
                    return Err(AvmError::format_error(format!(
                        "Push: unknown type tag {}",
                        other
                    )));
                }
            };
            self.stack.push(value);
        }
        Ok(())
    }

    fn constant(&self, index: usize) -> Result<Variable, AvmError> {
        self.constants
            .get(index)
            .map(|s| Variable::String(s.cheap_clone()))
            .ok_or_else(|| {
                AvmError::format_error(format!(
                    "Push: constant {} out of range ({} entries)",
                    index,
                    self.constants.len()
                ))
            })
    }

    /// Take the body that follows a function header out of the stream
    fn carve_body(&mut self, code_size: usize) -> Result<Rc<[u8]>, AvmError> {
        let body = self.stream.read_bytes(code_size)?;
        self.adjust += code_size as i64;
        Ok(Rc::from(body))
    }

    fn define_function(&mut self, avm: &mut Avm) -> Result<(), AvmError> {
        let name = self.stream.read_string()?;
        let num_params = self.stream.read_u16()?;
        let mut params = Vec::with_capacity(num_params as usize);
        for _ in 0..num_params {
            params.push(ParamBinding {
                register: 0,
                name: self.stream.read_string()?,
            });
        }
        let code_size = self.stream.read_u16()? as usize;
        let code = self.carve_body(code_size)?;

        let function = Function::scripted(
            name.cheap_clone(),
            code,
            self.constants.cheap_clone(),
            Some(params),
            DEFINE_FUNCTION_REGISTERS,
            PreloadFlags::NONE,
        );
        self.publish_function(avm, name, function);
        Ok(())
    }

    fn define_function2(&mut self, avm: &mut Avm) -> Result<(), AvmError> {
        let name = self.stream.read_string()?;
        let num_params = self.stream.read_u16()?;
        let register_count = self.stream.read_u8()?;

        let mut flags = BitReader::new(self.stream.read_bytes(2)?);
        let preload_parent = flags.read_bit()?;
        let preload_root = flags.read_bit()?;
        let suppress_super = flags.read_bit()?;
        let preload_super = flags.read_bit()?;
        let suppress_arguments = flags.read_bit()?;
        let preload_arguments = flags.read_bit()?;
        let suppress_this = flags.read_bit()?;
        let preload_this = flags.read_bit()?;
        let reserved = flags.read_bits(7)?;
        let preload_global = flags.read_bit()?;
        if reserved != 0 {
            return Err(AvmError::format_error(format!(
                "DefineFunction2 {}: reserved flag bits set ({:#x})",
                name, reserved
            )));
        }
        if preload_parent {
            log::warn!("DefineFunction2 {}: preloadParent is not supported", name);
        }
        if preload_arguments && !suppress_arguments {
            log::warn!("DefineFunction2 {}: preloadArguments is not supported", name);
        }

        let mut params = Vec::with_capacity(num_params as usize);
        for _ in 0..num_params {
            let register = self.stream.read_u8()?;
            let param = self.stream.read_string()?;
            params.push(ParamBinding {
                register,
                name: param,
            });
        }
        let code_size = self.stream.read_u16()? as usize;
        let code = self.carve_body(code_size)?;

        let preload = PreloadFlags {
            this: preload_this && !suppress_this,
            super_: preload_super && !suppress_super,
            root: preload_root,
            global: preload_global,
        };
        let function = Function::scripted(
            name.cheap_clone(),
            code,
            self.constants.cheap_clone(),
            Some(params),
            register_count,
            preload,
        );
        self.publish_function(avm, name, function);
        Ok(())
    }

    /// Push a freshly defined function, binding it as a variable when named.
    /// Each definition gets its own empty `prototype` so it can be used
    /// with NewObject.
    fn publish_function(&mut self, avm: &mut Avm, name: AvmString, function: Function) {
        let object = ObjectRef::new_function(function);
        object.set_member(PROTOTYPE, Variable::Object(ObjectRef::new_plain()));
        let value = Variable::Object(object);
        if !name.is_empty() {
            avm.set_variable(name.as_str(), value.clone());
        }
        self.stack.push(value);
    }

    fn call_method(&mut self, avm: &mut Avm) -> Result<Variable, AvmError> {
        let name = match self.stack.pop("CallMethod")? {
            Variable::Undefined => None,
            Variable::String(s) if s.is_empty() => None,
            Variable::String(s) => Some(s),
            _ => {
                return Err(AvmError::type_error(
                    "CallMethod",
                    "method name is not a string",
                ));
            }
        };
        let target = match self.stack.pop("CallMethod")? {
            Variable::Object(object) => object,
            other => {
                return Err(AvmError::type_error(
                    "CallMethod",
                    format!("{} is not an object", other.type_of()),
                ));
            }
        };
        let count = self.stack.pop_count("CallMethod")?;
        let args = self.stack.pop_args(count, "CallMethod")?;

        let Some(name) = name else {
            let function = target.as_function().ok_or_else(|| {
                AvmError::resolution_error("CallMethod: target is not a function")
            })?;
            return function.call_method(
                avm,
                Variable::Object(target),
                false,
                Variable::Undefined,
                &args,
            );
        };

        let (function, is_super) = resolve_method(&target, name.as_str()).ok_or_else(|| {
            AvmError::resolution_error(format!("CallMethod: {} is not a function", name))
        })?;
        let super_ctor = if is_super {
            avm.get_register(1)
                .as_object()
                .and_then(|this| this.get_own(CONSTRUCTOR))
                .unwrap_or_default()
        } else {
            target.get_own(CONSTRUCTOR).unwrap_or_default()
        };
        function.call_method(avm, Variable::Object(target), is_super, super_ctor, &args)
    }
}

// ═══════════════════════════════════════════════════════════════
// Member and path resolution
// ═══════════════════════════════════════════════════════════════

/// Find `name` on the target, falling back to `target.prototype.name`. The
/// flag is true when the prototype supplied it.
fn resolve_method(target: &ObjectRef, name: &str) -> Option<(Function, bool)> {
    if target.has_member(name) {
        if let Some(function) = target.get_member(name).as_object().and_then(|f| f.as_function()) {
            return Some((function, false));
        }
    }
    let prototype = match target.get_own(PROTOTYPE) {
        Some(Variable::Object(prototype)) => prototype,
        _ => return None,
    };
    if !prototype.has_member(name) {
        return None;
    }
    let function = prototype.get_member(name).as_object()?.as_function()?;
    Some((function, true))
}

fn get_member(target: &Variable, name: &Variable) -> Result<Variable, AvmError> {
    match target {
        Variable::Object(object) => match name {
            Variable::Number(n) => match array_index(*n) {
                Some(index) if object.is_array() => Ok(object.get_index(index)),
                _ => Ok(object.get_member(name.as_string().as_str())),
            },
            Variable::String(s) => Ok(get_member_path(object, s.as_str())),
            _ => Err(AvmError::type_error(
                "Object::getMember",
                "id is not a string",
            )),
        },
        Variable::String(s) => match name.as_str() {
            Some("length") => Ok(Variable::Number(s.char_count() as f64)),
            Some(_) => Ok(Variable::Undefined),
            None => Err(AvmError::type_error(
                "Object::getMember",
                "id is not a string",
            )),
        },
        other => Err(AvmError::type_error(
            "GetMember",
            format!("{} is not an object", other.type_of()),
        )),
    }
}

fn set_member(target: &Variable, name: &Variable, value: Variable) -> Result<(), AvmError> {
    let Variable::Object(object) = target else {
        return Err(AvmError::type_error(
            "SetMember",
            format!("{} is not an object", target.type_of()),
        ));
    };
    match name {
        Variable::Number(n) => {
            match array_index(*n) {
                Some(index) if object.is_array() => {
                    object.set_index(index, value);
                }
                _ => object.set_member(name.as_string().as_str(), value),
            }
            Ok(())
        }
        Variable::String(s) => set_member_path(object, s.as_str(), value),
        _ => Err(AvmError::type_error(
            "Object::setMember",
            "id is not a string",
        )),
    }
}

/// A number usable as an element position: a whole, non-negative value no
/// larger than [`MAX_ARRAY_INDEX`]. Anything else names an ordinary slot.
fn array_index(n: f64) -> Option<usize> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_ARRAY_INDEX as f64 {
        Some(n as usize)
    } else {
        None
    }
}

/// Walk `a.b.c` from `object`
fn get_member_path(object: &ObjectRef, path: &str) -> Variable {
    let mut current = Variable::Object(object.cheap_clone());
    for segment in path.split('.') {
        current = match &current {
            Variable::Object(obj) => obj.get_member(segment),
            Variable::String(s) if segment == "length" => Variable::Number(s.char_count() as f64),
            _ => return Variable::Undefined,
        };
    }
    current
}

fn set_member_path(object: &ObjectRef, path: &str, value: Variable) -> Result<(), AvmError> {
    let (parent, member) = match path.rsplit_once('.') {
        Some((parent_path, member)) => match get_member_path(object, parent_path) {
            Variable::Object(parent) => (parent, member),
            other => {
                return Err(AvmError::type_error(
                    "Object::setMember",
                    format!("{} in {} is not an object", other.type_of(), path),
                ));
            }
        },
        None => (object.cheap_clone(), path),
    };
    parent.set_member(member, value);
    Ok(())
}

fn get_variable_path(avm: &mut Avm, path: &str) -> Result<Variable, AvmError> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let root = avm.get_variable(head);
    let Some(rest) = rest else {
        return Ok(root);
    };
    match root {
        Variable::Object(object) => Ok(get_member_path(&object, rest)),
        other => Err(AvmError::type_error(
            "GetVariable",
            format!("{} in {} is not an object", other.type_of(), path),
        )),
    }
}

fn set_variable_path(avm: &mut Avm, path: &str, value: Variable) -> Result<(), AvmError> {
    let Some((head, rest)) = path.split_once('.') else {
        avm.set_variable(path, value);
        return Ok(());
    };
    match avm.get_variable(head) {
        Variable::Object(object) => set_member_path(&object, rest, value),
        other => Err(AvmError::type_error(
            "SetVariable",
            format!("{} in {} is not an object", other.type_of(), path),
        )),
    }
}

/// Set up `subclass.prototype` as a copy of the superclass prototype that
/// points back at the superclass.
fn extend_class(subclass: &Variable, superclass: &Variable) -> Result<(), AvmError> {
    let (Variable::Object(sub), Variable::Object(sup)) = (subclass, superclass) else {
        return Err(AvmError::type_error("Extends", "class is not an object"));
    };
    if !sub.is_function() || !sup.is_function() {
        return Err(AvmError::type_error("Extends", "class is not a function"));
    }
    let super_proto = sup.get_own(PROTOTYPE).unwrap_or_default();
    let prototype = match &super_proto {
        Variable::Object(proto) => ObjectRef::instantiate(proto),
        _ => ObjectRef::new_plain(),
    };
    prototype.set_member(CONSTRUCTOR, superclass.clone());
    prototype.set_member("__proto__", super_proto);
    sub.set_member(PROTOTYPE, Variable::Object(prototype));
    Ok(())
}

fn strip_fscommand(url: &str) -> &str {
    url.strip_prefix(FSCOMMAND_PREFIX).unwrap_or(url)
}
