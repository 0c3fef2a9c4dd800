//! Instruction stream primitives
//!
//! - [`ActionCode`]: the opcode table
//! - [`ByteStream`] / [`BitReader`]: decoding cursors
//! - [`ConstantPool`]: the string table shared by a stream and the functions
//!   it defines
//! - [`BytecodeBuilder`]: an assembler for producing streams by hand

pub mod builder;
pub mod opcode;
pub mod stream;

use std::fmt;
use std::rc::Rc;

use crate::value::{AvmString, CheapClone};

pub use builder::{BytecodeBuilder, Function2Flags, JumpPlaceholder, Label, PushValue};
pub use opcode::{ActionCode, is_long_opcode, push_type};
pub use stream::{BitReader, ByteStream};

/// Ordered string table installed by the ConstantPool opcode
#[derive(Clone, Default, PartialEq)]
pub struct ConstantPool(Rc<[AvmString]>);

impl CheapClone for ConstantPool {}

impl ConstantPool {
    pub fn new(entries: Vec<AvmString>) -> Self {
        Self(Rc::from(entries))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&AvmString> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AvmString> {
        self.0.iter()
    }
}

impl fmt::Debug for ConstantPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<S: Into<AvmString>> FromIterator<S> for ConstantPool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
