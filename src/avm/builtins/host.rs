//! Builtins that bridge to host callbacks

use std::rc::Rc;

use crate::avm::Avm;
use crate::error::AvmError;
use crate::function::{Function, PreloadFlags};
use crate::json::to_json_string;
use crate::object::ObjectRef;
use crate::platform::IntervalCallback;
use crate::value::Variable;

/// `Object.registerClass(name, class)`, arguments in registers 1 and 2
pub fn register_class_function() -> Function {
    Function::native("registerClass", 3, PreloadFlags::NONE, |avm| {
        let name = avm.get_register(1).as_string();
        let class = match avm.get_register(2) {
            Variable::Object(class) => class,
            other => {
                return Err(AvmError::type_error(
                    "Object.registerClass",
                    format!("{} is not an object", other.type_of()),
                ));
            }
        };
        avm.register_class(name.as_str(), class);
        Ok(Variable::Boolean(true))
    })
}

/// `ExternalInterface.call(name, value)`.
///
/// Strings are forwarded as-is, anything else as JSON text. The bridge's
/// answer is the call's result.
pub fn external_interface_call() -> Function {
    Function::native("call", 3, PreloadFlags::NONE, |avm| {
        let name = avm.get_register(1).as_string();
        let value = match avm.get_register(2) {
            Variable::String(s) => s.to_string(),
            other => to_json_string(&other)?,
        };
        Ok(avm.fscommand(name.as_str(), &value))
    })
}

/// `setInterval(function, ms, ...args)` or
/// `setInterval(object, "method", ms, ...args)`.
///
/// Returns the host's interval id, or Undefined when no external handler
/// is installed.
pub fn set_interval(avm: &mut Avm, args: &[Variable]) -> Result<Variable, AvmError> {
    let (function, this, interval, extra) = match args {
        [Variable::Object(obj), rest @ ..] if obj.is_function() => {
            let function = obj.as_function();
            let (interval, extra) = split_interval(rest);
            (function, Variable::Undefined, interval, extra)
        }
        [Variable::Object(obj), Variable::String(method), rest @ ..] => {
            let function = obj
                .get_member(method.as_str())
                .as_object()
                .and_then(ObjectRef::as_function);
            let (interval, extra) = split_interval(rest);
            (function, Variable::Object(obj.clone()), interval, extra)
        }
        _ => (None, Variable::Undefined, 0, Vec::new()),
    };
    let function = function
        .ok_or_else(|| AvmError::type_error("setInterval", "callback is not a function"))?;

    let callback: IntervalCallback = Rc::new(move |avm: &mut Avm| {
        function.call_with_this(avm, this.clone(), &extra).map(|_| ())
    });
    match avm.set_interval(interval, callback) {
        Some(id) => Ok(Variable::Number(id as f64)),
        None => {
            log::warn!("setInterval called without an external handler");
            Ok(Variable::Undefined)
        }
    }
}

/// `clearInterval(id)`
pub fn clear_interval(avm: &mut Avm, args: &[Variable]) -> Result<Variable, AvmError> {
    if let Some(id) = args.first() {
        avm.clear_interval(id.as_number() as u32);
    }
    Ok(Variable::Undefined)
}

fn split_interval(rest: &[Variable]) -> (u32, Vec<Variable>) {
    match rest.split_first() {
        Some((interval, extra)) => (interval.as_number().max(0.0) as u32, extra.to_vec()),
        None => (0, Vec::new()),
    }
}
