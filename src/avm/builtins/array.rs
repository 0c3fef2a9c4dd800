//! Array construction and its push/pop members

use crate::avm::Avm;
use crate::error::AvmError;
use crate::function::{Function, PreloadFlags};
use crate::object::{ObjectKind, ObjectRef};
use crate::value::Variable;

/// Create an Array holding `elements`, with `push` and `pop` installed as
/// own members.
///
/// Both members take `this` from register 1, so they keep working on
/// arrays copied from a prototype.
pub fn create_array(elements: Vec<Variable>) -> ObjectRef {
    let array = ObjectRef::with_kind(ObjectKind::Array(elements));
    array.set_member(
        "push",
        Variable::Object(ObjectRef::new_function(Function::native(
            "push",
            3,
            PreloadFlags::THIS,
            array_push,
        ))),
    );
    array.set_member(
        "pop",
        Variable::Object(ObjectRef::new_function(Function::native(
            "pop",
            2,
            PreloadFlags::THIS,
            array_pop,
        ))),
    );
    array
}

fn this_array(avm: &Avm, operation: &'static str) -> Result<ObjectRef, AvmError> {
    match avm.get_register(1) {
        Variable::Object(obj) if obj.is_array() => Ok(obj),
        other => Err(AvmError::type_error(
            operation,
            format!("{} is not an array", other.type_of()),
        )),
    }
}

/// `push(value)`: append and return the new length
fn array_push(avm: &mut Avm) -> Result<Variable, AvmError> {
    let array = this_array(avm, "Array.push")?;
    let value = avm.get_register(2);
    let mut obj = array.borrow_mut();
    let ObjectKind::Array(elements) = &mut obj.kind else {
        return Err(AvmError::type_error("Array.push", "this is not an array"));
    };
    elements.push(value);
    Ok(Variable::Number(elements.len() as f64))
}

/// `pop()`: remove and return the last element, Undefined when empty
fn array_pop(avm: &mut Avm) -> Result<Variable, AvmError> {
    let array = this_array(avm, "Array.pop")?;
    let mut obj = array.borrow_mut();
    let ObjectKind::Array(elements) = &mut obj.kind else {
        return Err(AvmError::type_error("Array.pop", "this is not an array"));
    };
    Ok(elements.pop().unwrap_or_default())
}
