//! Global object bootstrap
//!
//! Populates a fresh AVM with `_global`, `_root`, the builtin classes
//! (`Object`, `Array`, `String`, `MovieClip`, `TextField`), `Stage`,
//! `flash.external.ExternalInterface` and the `setInterval` /
//! `clearInterval` static functions.

mod array;
mod display;
mod host;

pub use array::create_array;
pub use display::{create_movie_clip, create_stage, create_string, create_text_field};
pub use host::{clear_interval, set_interval};

use std::rc::Rc;

use crate::avm::Avm;
use crate::function::Function;
use crate::object::{ObjectRef, PROTOTYPE};
use crate::value::Variable;

pub(crate) fn install(avm: &mut Avm) {
    avm.set_variable("_global", Variable::Object(ObjectRef::new_plain()));

    let root = ObjectRef::new_plain();
    root.set_member("gotoAndPlay", display::timeline_command("gotoAndPlay"));
    avm.set_variable("_root", Variable::Object(root));

    let object_class = builtin_class("Object", ObjectRef::new_plain());
    object_class.set_member(
        "registerClass",
        Variable::Object(ObjectRef::new_function(host::register_class_function())),
    );
    avm.set_variable("Object", Variable::Object(object_class));

    let classes = [
        ("Array", create_array(Vec::new())),
        ("String", create_string("")),
        ("MovieClip", create_movie_clip()),
        ("TextField", create_text_field()),
    ];
    for (name, prototype) in classes {
        avm.set_variable(name, Variable::Object(builtin_class(name, prototype)));
    }

    let stage = create_stage(avm.config());
    avm.set_variable("Stage", Variable::Object(stage));

    let external_interface = ObjectRef::new_plain();
    external_interface.set_member(
        "call",
        Variable::Object(ObjectRef::new_function(host::external_interface_call())),
    );
    let external = ObjectRef::new_plain();
    external.set_member("ExternalInterface", Variable::Object(external_interface));
    let flash = ObjectRef::new_plain();
    flash.set_member("external", Variable::Object(external));
    avm.set_variable("flash", Variable::Object(flash));

    avm.register_static_function("setInterval", Rc::new(set_interval));
    avm.register_static_function("clearInterval", Rc::new(clear_interval));
}

/// Dummy constructor carrying `prototype`
fn builtin_class(name: &str, prototype: ObjectRef) -> ObjectRef {
    let class = ObjectRef::new_function(Function::dummy(name));
    class.set_member(PROTOTYPE, Variable::Object(prototype));
    class
}
