//! BytecodeBuilder - assembler for action streams
//!
//! Emits opcodes with correct long-form lengths and supports forward jump
//! patching and backward jumps to labels. Used by hosts that generate small
//! scripts at runtime and throughout the test suite.

use super::opcode::{ActionCode, push_type};

/// A literal operand of the Push opcode
#[derive(Debug, Clone, PartialEq)]
pub enum PushValue {
    String(String),
    Float(f32),
    Null,
    Undefined,
    Register(u8),
    Boolean(bool),
    Double(f64),
    Integer(i32),
    /// Constant pool index; encoded as one byte when it fits
    Constant(u16),
}

impl From<&str> for PushValue {
    fn from(s: &str) -> Self {
        PushValue::String(s.to_string())
    }
}

impl From<f64> for PushValue {
    fn from(n: f64) -> Self {
        PushValue::Double(n)
    }
}

impl From<i32> for PushValue {
    fn from(n: i32) -> Self {
        PushValue::Integer(n)
    }
}

impl From<bool> for PushValue {
    fn from(b: bool) -> Self {
        PushValue::Boolean(b)
    }
}

/// Placeholder for a forward branch whose offset is patched later
#[derive(Debug, Clone, Copy)]
pub struct JumpPlaceholder {
    /// Position of the i16 offset field
    offset_pos: usize,
}

/// A branch target recorded before the branch that uses it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// The DefineFunction2 flag word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Function2Flags {
    pub preload_parent: bool,
    pub preload_root: bool,
    pub suppress_super: bool,
    pub preload_super: bool,
    pub suppress_arguments: bool,
    pub preload_arguments: bool,
    pub suppress_this: bool,
    pub preload_this: bool,
    pub preload_global: bool,
}

impl Function2Flags {
    /// Encode as the two flag bytes, first flag in the most significant bit
    pub fn to_bytes(self) -> [u8; 2] {
        let bits = [
            self.preload_parent,
            self.preload_root,
            self.suppress_super,
            self.preload_super,
            self.suppress_arguments,
            self.preload_arguments,
            self.suppress_this,
            self.preload_this,
        ];
        let first = bits
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | bit as u8);
        [first, self.preload_global as u8]
    }
}

/// Builder for action streams
#[derive(Debug, Default, Clone)]
pub struct BytecodeBuilder {
    code: Vec<u8>,
}

impl BytecodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current write position
    pub fn position(&self) -> usize {
        self.code.len()
    }

    /// Emit a short opcode (no payload)
    pub fn op(&mut self, code: ActionCode) -> &mut Self {
        self.code.push(code.as_u8());
        self
    }

    /// Emit any opcode byte with a raw payload. Long-form opcodes get the
    /// payload length prefix.
    pub fn raw(&mut self, opcode: u8, payload: &[u8]) -> &mut Self {
        self.code.push(opcode);
        if opcode >= 0x80 {
            self.code
                .extend_from_slice(&(payload.len() as u16).to_le_bytes());
        }
        self.code.extend_from_slice(payload);
        self
    }

    fn long(&mut self, code: ActionCode, payload: &[u8]) -> &mut Self {
        self.raw(code.as_u8(), payload)
    }

    pub fn push(&mut self, values: &[PushValue]) -> &mut Self {
        let mut payload = Vec::new();
        for value in values {
            encode_push_value(&mut payload, value);
        }
        self.long(ActionCode::Push, &payload)
    }

    pub fn push_one(&mut self, value: impl Into<PushValue>) -> &mut Self {
        let value = value.into();
        self.push(std::slice::from_ref(&value))
    }

    pub fn constant_pool(&mut self, entries: &[&str]) -> &mut Self {
        let mut payload = Vec::new();
        payload.extend_from_slice(&(entries.len() as u16).to_le_bytes());
        for entry in entries {
            write_string(&mut payload, entry);
        }
        self.long(ActionCode::ConstantPool, &payload)
    }

    pub fn store_register(&mut self, register: u8) -> &mut Self {
        self.long(ActionCode::StoreRegister, &[register])
    }

    fn branch(&mut self, code: ActionCode, offset: i16) -> JumpPlaceholder {
        self.long(code, &offset.to_le_bytes());
        JumpPlaceholder {
            offset_pos: self.code.len() - 2,
        }
    }

    /// Emit an unconditional jump to be patched later
    pub fn jump(&mut self) -> JumpPlaceholder {
        self.branch(ActionCode::Jump, 0)
    }

    /// Emit a conditional jump to be patched later
    pub fn if_true(&mut self) -> JumpPlaceholder {
        self.branch(ActionCode::If, 0)
    }

    /// Point a placeholder at the current position
    pub fn patch(&mut self, placeholder: JumpPlaceholder) -> &mut Self {
        let target = self.code.len() as i64;
        let offset = (target - (placeholder.offset_pos as i64 + 2)) as i16;
        let bytes = offset.to_le_bytes();
        if let Some(field) = self
            .code
            .get_mut(placeholder.offset_pos..placeholder.offset_pos + 2)
        {
            field.copy_from_slice(&bytes);
        }
        self
    }

    /// Record the current position as a branch target
    pub fn label(&self) -> Label {
        Label(self.code.len())
    }

    fn branch_back(&mut self, code: ActionCode, label: Label) -> &mut Self {
        // opcode + length + offset field
        let after = self.code.len() as i64 + 5;
        let offset = (label.0 as i64 - after) as i16;
        self.long(code, &offset.to_le_bytes())
    }

    pub fn jump_to(&mut self, label: Label) -> &mut Self {
        self.branch_back(ActionCode::Jump, label)
    }

    pub fn if_to(&mut self, label: Label) -> &mut Self {
        self.branch_back(ActionCode::If, label)
    }

    /// DefineFunction with name-bound parameters. `body` follows the header.
    pub fn define_function(&mut self, name: &str, params: &[&str], body: &[u8]) -> &mut Self {
        let mut header = Vec::new();
        write_string(&mut header, name);
        header.extend_from_slice(&(params.len() as u16).to_le_bytes());
        for param in params {
            write_string(&mut header, param);
        }
        header.extend_from_slice(&(body.len() as u16).to_le_bytes());
        self.long(ActionCode::DefineFunction, &header);
        self.code.extend_from_slice(body);
        self
    }

    /// DefineFunction2. Each param is `(register, name)`; register 0 binds
    /// the argument as a variable.
    pub fn define_function2(
        &mut self,
        name: &str,
        register_count: u8,
        flags: Function2Flags,
        params: &[(u8, &str)],
        body: &[u8],
    ) -> &mut Self {
        let mut header = Vec::new();
        write_string(&mut header, name);
        header.extend_from_slice(&(params.len() as u16).to_le_bytes());
        header.push(register_count);
        header.extend_from_slice(&flags.to_bytes());
        for (register, param) in params {
            header.push(*register);
            write_string(&mut header, param);
        }
        header.extend_from_slice(&(body.len() as u16).to_le_bytes());
        self.long(ActionCode::DefineFunction2, &header);
        self.code.extend_from_slice(body);
        self
    }

    pub fn get_url(&mut self, url: &str, target: &str) -> &mut Self {
        let mut payload = Vec::new();
        write_string(&mut payload, url);
        write_string(&mut payload, target);
        self.long(ActionCode::GetUrl, &payload)
    }

    /// GetURL2 with a raw flag byte; url and target come from the stack
    pub fn get_url2(&mut self, flags: u8) -> &mut Self {
        self.long(ActionCode::GetUrl2, &[flags])
    }

    pub fn end(&mut self) -> &mut Self {
        self.op(ActionCode::End)
    }

    pub fn build(&self) -> Vec<u8> {
        self.code.clone()
    }
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

fn encode_push_value(out: &mut Vec<u8>, value: &PushValue) {
    match value {
        PushValue::String(s) => {
            out.push(push_type::STRING);
            write_string(out, s);
        }
        PushValue::Float(f) => {
            out.push(push_type::FLOAT);
            out.extend_from_slice(&f.to_le_bytes());
        }
        PushValue::Null => out.push(push_type::NULL),
        PushValue::Undefined => out.push(push_type::UNDEFINED),
        PushValue::Register(r) => {
            out.push(push_type::REGISTER);
            out.push(*r);
        }
        PushValue::Boolean(b) => {
            out.push(push_type::BOOLEAN);
            out.push(*b as u8);
        }
        PushValue::Double(d) => {
            // high word first, each word little-endian
            let bits = d.to_bits();
            out.push(push_type::DOUBLE);
            out.extend_from_slice(&((bits >> 32) as u32).to_le_bytes());
            out.extend_from_slice(&(bits as u32).to_le_bytes());
        }
        PushValue::Integer(i) => {
            out.push(push_type::INTEGER);
            out.extend_from_slice(&i.to_le_bytes());
        }
        PushValue::Constant(index) => {
            if let Ok(small) = u8::try_from(*index) {
                out.push(push_type::CONSTANT8);
                out.push(small);
            } else {
                out.push(push_type::CONSTANT16);
                out.extend_from_slice(&index.to_le_bytes());
            }
        }
    }
}
