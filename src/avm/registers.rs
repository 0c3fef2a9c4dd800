//! Register banks
//!
//! Each of the 256 registers is its own stack. A call pushes one slot on
//! each bank it uses and pops it on return, so reads and writes always see
//! the innermost active call while outer calls keep their values below.
//! Bank 0 is never pushed or popped.

use crate::error::AvmError;
use crate::value::Variable;

pub const REGISTER_BANKS: usize = 256;

#[derive(Debug)]
pub struct RegisterFile {
    banks: Vec<Vec<Variable>>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            banks: vec![Vec::new(); REGISTER_BANKS],
        }
    }

    /// Push an Undefined slot on banks `1..count`
    pub fn push(&mut self, count: usize) {
        for bank in self.banks.iter_mut().take(count).skip(1) {
            bank.push(Variable::Undefined);
        }
    }

    /// Pop one slot from banks `1..count`
    pub fn pop(&mut self, count: usize) {
        for bank in self.banks.iter_mut().take(count).skip(1) {
            bank.pop();
        }
    }

    /// Overwrite the top of a bank, or start it when empty
    pub fn store(&mut self, index: usize, value: Variable) -> Result<(), AvmError> {
        let bank = self.banks.get_mut(index).ok_or_else(|| {
            AvmError::format_error(format!("register {} out of range", index))
        })?;
        match bank.last_mut() {
            Some(top) => *top = value,
            None => bank.push(value),
        }
        Ok(())
    }

    /// Top of a bank; Undefined when empty or out of range
    pub fn get(&self, index: usize) -> Variable {
        self.banks
            .get(index)
            .and_then(|bank| bank.last())
            .cloned()
            .unwrap_or_default()
    }

    /// Number of slots stacked on a bank
    pub fn depth(&self, index: usize) -> usize {
        self.banks.get(index).map_or(0, Vec::len)
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
