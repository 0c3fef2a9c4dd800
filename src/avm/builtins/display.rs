//! Display-list stand-ins: Stage, MovieClip, TextField and boxed strings
//!
//! The host owns the real display list. These objects carry the members
//! scripts read and forward timeline control to the fscommand bridge.

use crate::avm::Avm;
use crate::config::AvmConfig;
use crate::error::AvmError;
use crate::function::{Function, PreloadFlags};
use crate::object::{ObjectKind, ObjectRef};
use crate::value::{AvmString, Variable};

/// The `Stage` object with the configured dimensions
pub fn create_stage(config: &AvmConfig) -> ObjectRef {
    let stage = ObjectRef::with_kind(ObjectKind::Stage);
    stage.set_member("width", Variable::Number(config.stage_width));
    stage.set_member("height", Variable::Number(config.stage_height));
    stage
}

/// A MovieClip whose timeline members forward to fscommand
pub fn create_movie_clip() -> ObjectRef {
    let clip = ObjectRef::with_kind(ObjectKind::MovieClip);
    for command in ["gotoAndPlay", "gotoAndStop", "play", "stop"] {
        clip.set_member(command, timeline_command(command));
    }
    clip
}

/// A TextField with empty `text` and `htmlText`
pub fn create_text_field() -> ObjectRef {
    let field = ObjectRef::with_kind(ObjectKind::TextField);
    field.set_member("text", Variable::from(""));
    field.set_member("htmlText", Variable::from(""));
    field
}

/// A boxed String; `length` is a pseudo-member
pub fn create_string(value: impl Into<AvmString>) -> ObjectRef {
    ObjectRef::with_kind(ObjectKind::String(value.into()))
}

/// Native forwarding `command(arg)` to fscommand, argument in register 1
pub(crate) fn timeline_command(command: &'static str) -> Variable {
    let function = Function::native(
        command,
        2,
        PreloadFlags::NONE,
        move |avm: &mut Avm| -> Result<Variable, AvmError> {
            let arg = avm.get_register(1).as_string();
            Ok(avm.fscommand(command, arg.as_str()))
        },
    );
    Variable::Object(ObjectRef::new_function(function))
}
