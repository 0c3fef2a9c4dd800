//! Action opcodes understood by the interpreter

/// An action opcode.
///
/// Opcodes at or above 0x80 are long-form: a little-endian u16 payload
/// length follows the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionCode {
    End = 0x00,
    Stop = 0x07,
    Add = 0x0A,
    Subtract = 0x0B,
    Multiply = 0x0C,
    Divide = 0x0D,
    Equals = 0x0E,
    Less = 0x0F,
    And = 0x10,
    Or = 0x11,
    Not = 0x12,
    StringEquals = 0x13,
    StringLength = 0x14,
    Pop = 0x17,
    GetVariable = 0x1C,
    SetVariable = 0x1D,
    StringAdd = 0x21,
    Trace = 0x26,
    GetTime = 0x34,
    DefineLocal = 0x3C,
    CallFunction = 0x3D,
    Return = 0x3E,
    Modulo = 0x3F,
    NewObject = 0x40,
    InitArray = 0x42,
    InitObject = 0x43,
    TypeOf = 0x44,
    Add2 = 0x47,
    Less2 = 0x48,
    Equals2 = 0x49,
    ToNumber = 0x4A,
    ToString = 0x4B,
    PushDuplicate = 0x4C,
    StackSwap = 0x4D,
    GetMember = 0x4E,
    SetMember = 0x4F,
    Increment = 0x50,
    Decrement = 0x51,
    CallMethod = 0x52,
    Enumerate2 = 0x55,
    StrictEquals = 0x66,
    Greater = 0x67,
    Extends = 0x69,
    GetUrl = 0x83,
    StoreRegister = 0x87,
    ConstantPool = 0x88,
    DefineFunction2 = 0x8E,
    Push = 0x96,
    Jump = 0x99,
    GetUrl2 = 0x9A,
    DefineFunction = 0x9B,
    If = 0x9D,
}

impl ActionCode {
    /// Decode an opcode byte. Unknown opcodes give `None`.
    pub fn from_u8(byte: u8) -> Option<ActionCode> {
        use ActionCode::*;
        let code = match byte {
            0x00 => End,
            0x07 => Stop,
            0x0A => Add,
            0x0B => Subtract,
            0x0C => Multiply,
            0x0D => Divide,
            0x0E => Equals,
            0x0F => Less,
            0x10 => And,
            0x11 => Or,
            0x12 => Not,
            0x13 => StringEquals,
            0x14 => StringLength,
            0x17 => Pop,
            0x1C => GetVariable,
            0x1D => SetVariable,
            0x21 => StringAdd,
            0x26 => Trace,
            0x34 => GetTime,
            0x3C => DefineLocal,
            0x3D => CallFunction,
            0x3E => Return,
            0x3F => Modulo,
            0x40 => NewObject,
            0x42 => InitArray,
            0x43 => InitObject,
            0x44 => TypeOf,
            0x47 => Add2,
            0x48 => Less2,
            0x49 => Equals2,
            0x4A => ToNumber,
            0x4B => ToString,
            0x4C => PushDuplicate,
            0x4D => StackSwap,
            0x4E => GetMember,
            0x4F => SetMember,
            0x50 => Increment,
            0x51 => Decrement,
            0x52 => CallMethod,
            0x55 => Enumerate2,
            0x66 => StrictEquals,
            0x67 => Greater,
            0x69 => Extends,
            0x83 => GetUrl,
            0x87 => StoreRegister,
            0x88 => ConstantPool,
            0x8E => DefineFunction2,
            0x96 => Push,
            0x99 => Jump,
            0x9A => GetUrl2,
            0x9B => DefineFunction,
            0x9D => If,
            _ => return None,
        };
        Some(code)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Long-form opcodes carry a u16 payload length
    pub fn is_long(self) -> bool {
        is_long_opcode(self as u8)
    }
}

#[inline]
pub fn is_long_opcode(byte: u8) -> bool {
    byte >= 0x80
}

/// Push operand type tags
pub mod push_type {
    pub const STRING: u8 = 0;
    pub const FLOAT: u8 = 1;
    pub const NULL: u8 = 2;
    pub const UNDEFINED: u8 = 3;
    pub const REGISTER: u8 = 4;
    pub const BOOLEAN: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const INTEGER: u8 = 7;
    pub const CONSTANT8: u8 = 8;
    pub const CONSTANT16: u8 = 9;
}
