//! ActionScript 2 bytecode virtual machine for Flash/Scaleform GUI scripts
//!
//! The host builds an [`Avm`], installs its callbacks, and runs each frame
//! script or function body through an [`AsBuffer`].
//!
//! # Example
//!
//! ```
//! use avm::{Avm, Variable};
//! use avm::bytecode::{ActionCode, BytecodeBuilder};
//!
//! let code = BytecodeBuilder::new()
//!     .constant_pool(&["hello"])
//!     .push(&[avm::bytecode::PushValue::Constant(0)])
//!     .op(ActionCode::Return)
//!     .build();
//!
//! let mut avm = Avm::new();
//! let result = avm.run_script(&code).unwrap();
//! assert_eq!(result, Variable::from("hello"));
//! ```

pub mod avm;
pub mod bytecode;
pub mod config;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod json;
pub mod object;
pub mod platform;
pub mod prelude;
pub mod value;

pub use avm::Avm;
pub use bytecode::ConstantPool;
pub use config::AvmConfig;
pub use error::AvmError;
pub use function::{Function, FunctionBody, ParamBinding, PreloadFlags};
pub use interpreter::AsBuffer;
pub use object::{Object, ObjectKind, ObjectRef};
pub use platform::{
    ExternalHandler, FsCommandFunction, IntervalCallback, NoOpExternalHandler,
    RegisterClassFunction, StaticFunction,
};
#[cfg(feature = "std")]
pub use platform::StdExternalHandler;
pub use value::{AvmString, CheapClone, Variable, VariableType};
