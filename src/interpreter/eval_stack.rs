//! Evaluation stack owned by one AsBuffer run

use crate::error::AvmError;
use crate::value::Variable;

/// Operand stack for a single instruction stream.
///
/// Popping an empty stack is a format error naming the opcode that
/// underflowed.
#[derive(Debug, Default)]
pub struct EvalStack {
    values: Vec<Variable>,
}

impl EvalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: impl Into<Variable>) {
        self.values.push(value.into());
    }

    pub fn pop(&mut self, operation: &'static str) -> Result<Variable, AvmError> {
        self.values
            .pop()
            .ok_or_else(|| AvmError::stack_underflow(operation))
    }

    /// Pop if anything is there
    pub fn try_pop(&mut self) -> Option<Variable> {
        self.values.pop()
    }

    pub fn top(&self, operation: &'static str) -> Result<&Variable, AvmError> {
        self.values
            .last()
            .ok_or_else(|| AvmError::stack_underflow(operation))
    }

    /// Pop a count operand. Negative and non-numeric counts read as zero.
    pub fn pop_count(&mut self, operation: &'static str) -> Result<usize, AvmError> {
        let n = self.pop(operation)?.as_number();
        Ok(if n.is_finite() && n > 0.0 { n as usize } else { 0 })
    }

    /// Pop `count` values; the first popped becomes element 0.
    pub fn pop_args(
        &mut self,
        count: usize,
        operation: &'static str,
    ) -> Result<Vec<Variable>, AvmError> {
        let mut args = Vec::with_capacity(count.min(self.values.len()));
        for _ in 0..count {
            args.push(self.pop(operation)?);
        }
        Ok(args)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
