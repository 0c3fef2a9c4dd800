//! Conversion between [`Variable`] and `serde_json::Value`
//!
//! Used by `ExternalInterface.call` to hand structured arguments to the host
//! and available to hosts that feed data into scripts.

use crate::avm::builtins::create_array;
use crate::error::AvmError;
use crate::object::{ObjectKind, ObjectRef};
use crate::prelude::FxHashSet;
use crate::value::{AvmString, Variable};

/// Convert a Variable to JSON.
///
/// Undefined, null, functions and non-finite numbers become `null`. Arrays
/// convert element-wise, other objects by their own slots (Undefined
/// members are left out). Circular structures are an error.
pub fn variable_to_json(value: &Variable) -> Result<serde_json::Value, AvmError> {
    let mut visited = FxHashSet::default();
    variable_to_json_with_visited(value, &mut visited)
}

fn variable_to_json_with_visited(
    value: &Variable,
    visited: &mut FxHashSet<usize>,
) -> Result<serde_json::Value, AvmError> {
    Ok(match value {
        Variable::Undefined | Variable::Null => serde_json::Value::Null,
        Variable::Boolean(b) => serde_json::Value::Bool(*b),
        Variable::Number(n) => number_to_json(*n),
        Variable::String(s) => serde_json::Value::String(s.to_string()),
        Variable::Object(obj) => {
            let id = obj.id();
            if !visited.insert(id) {
                return Err(AvmError::type_error(
                    "variable_to_json",
                    "Converting circular structure to JSON",
                ));
            }
            let result = object_to_json(obj, visited);
            visited.remove(&id);
            result?
        }
    })
}

fn object_to_json(
    obj: &ObjectRef,
    visited: &mut FxHashSet<usize>,
) -> Result<serde_json::Value, AvmError> {
    // Collect first so no borrow is held across the recursion
    let (elements, slots) = {
        let object = obj.borrow();
        let elements = match &object.kind {
            ObjectKind::Function(_) => return Ok(serde_json::Value::Null),
            ObjectKind::String(s) => return Ok(serde_json::Value::String(s.to_string())),
            ObjectKind::Array(elements) => Some(elements.clone()),
            _ => None,
        };
        let slots: Vec<(AvmString, Variable)> = object
            .slots
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        (elements, slots)
    };

    if let Some(elements) = elements {
        let mut array = Vec::with_capacity(elements.len());
        for element in &elements {
            array.push(variable_to_json_with_visited(element, visited)?);
        }
        return Ok(serde_json::Value::Array(array));
    }

    let mut map = serde_json::Map::new();
    for (key, value) in slots {
        if value.is_undefined() {
            continue;
        }
        map.insert(key.to_string(), variable_to_json_with_visited(&value, visited)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Build a Variable from JSON. Arrays become Array objects with their
/// `push`/`pop` members, objects become plain objects.
pub fn json_to_variable(value: &serde_json::Value) -> Variable {
    match value {
        serde_json::Value::Null => Variable::Null,
        serde_json::Value::Bool(b) => Variable::Boolean(*b),
        serde_json::Value::Number(n) => Variable::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Variable::from(s.as_str()),
        serde_json::Value::Array(items) => {
            Variable::Object(create_array(items.iter().map(json_to_variable).collect()))
        }
        serde_json::Value::Object(map) => {
            let object = ObjectRef::new_plain();
            for (key, item) in map {
                object.set_member(key, json_to_variable(item));
            }
            Variable::Object(object)
        }
    }
}

/// Render a Variable as JSON text
pub fn to_json_string(value: &Variable) -> Result<String, AvmError> {
    let json = variable_to_json(value)?;
    serde_json::to_string(&json)
        .map_err(|e| AvmError::internal_error(format!("JSON serialization failed: {}", e)))
}
