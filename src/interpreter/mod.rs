//! Bytecode interpreter
//!
//! [`AsBuffer`] decodes and executes one instruction stream; [`EvalStack`]
//! is its operand stack.

mod as_buffer;
mod eval_stack;

pub use as_buffer::AsBuffer;
pub use eval_stack::EvalStack;
