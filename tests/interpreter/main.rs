//! Integration tests for the AVM, organized by feature
//!
//! Scripts are assembled with `BytecodeBuilder` and run through the public
//! API.

mod arithmetic;
mod errors;
mod functions;
mod host;

use avm::bytecode::BytecodeBuilder;
use avm::{Avm, AvmError, ObjectRef, Variable};

/// Run a top-level script on a fresh AVM and return its return value
pub fn run(code: &[u8]) -> Variable {
    run_with(&mut Avm::new(), code)
}

/// Run a top-level script on an existing AVM
pub fn run_with(avm: &mut Avm, code: &[u8]) -> Variable {
    avm.run_script(code).expect("script failed")
}

pub fn try_run(code: &[u8]) -> Result<Variable, AvmError> {
    Avm::new().run_script(code)
}

/// Build and run in one go
pub fn eval(build: impl FnOnce(&mut BytecodeBuilder)) -> Variable {
    let mut builder = BytecodeBuilder::new();
    build(&mut builder);
    run(&builder.build())
}

pub fn object(value: &Variable) -> ObjectRef {
    value.as_object().expect("expected an object").clone()
}

pub fn number(n: f64) -> Variable {
    Variable::Number(n)
}
