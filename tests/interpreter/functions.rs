//! Function definition and the call protocols

use std::cell::RefCell;
use std::rc::Rc;

use super::{number, object, run_with};
use avm::bytecode::{ActionCode, BytecodeBuilder, Function2Flags, PushValue};
use avm::{Avm, AvmConfig, AvmError, Function, ObjectRef, PreloadFlags, Variable};

/// Native that records registers 1..=3 at call time
fn recorder(seen: Rc<RefCell<Vec<Variable>>>) -> Variable {
    let function = Function::native("record", 4, PreloadFlags::THIS, move |avm| {
        let mut seen = seen.borrow_mut();
        for register in 1..=3 {
            seen.push(avm.get_register(register));
        }
        Ok(Variable::from("recorded"))
    });
    Variable::Object(ObjectRef::new_function(function))
}

// ═══════════════════════════════════════════════════════════════════════════
// CallMethod
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_call_method_preloads_this_and_restores_caller_this() {
    let mut avm = Avm::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let target = ObjectRef::new_plain();
    target.set_member("record", recorder(seen.clone()));
    avm.set_variable("target", Variable::Object(target.clone()));

    let code = BytecodeBuilder::new()
        // caller's this
        .push_one("caller")
        .store_register(1)
        .op(ActionCode::Pop)
        // target.record("first", "second")
        .push(&[
            "second".into(),
            "first".into(),
            PushValue::Integer(2),
            "target".into(),
        ])
        .op(ActionCode::GetVariable)
        .push_one("record")
        .op(ActionCode::CallMethod)
        .op(ActionCode::Pop)
        .push(&[PushValue::Register(1)])
        .op(ActionCode::Return)
        .build();

    assert_eq!(run_with(&mut avm, &code), Variable::from("caller"));
    let seen = seen.borrow();
    assert_eq!(seen[0], Variable::Object(target));
    assert_eq!(seen[1], Variable::from("first"));
    assert_eq!(seen[2], Variable::from("second"));
}

#[test]
fn test_call_method_result_is_pushed() {
    let mut avm = Avm::new();
    let target = ObjectRef::new_plain();
    target.set_member("record", recorder(Rc::new(RefCell::new(Vec::new()))));
    avm.set_variable("target", Variable::Object(target));
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0), "target".into()])
        .op(ActionCode::GetVariable)
        .push_one("record")
        .op(ActionCode::CallMethod)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), Variable::from("recorded"));
}

#[test]
fn test_super_call_keeps_caller_this() {
    let mut avm = Avm::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let class = ObjectRef::new_function(Function::dummy("Base"));
    let prototype = ObjectRef::new_plain();
    prototype.set_member("record", recorder(seen.clone()));
    class.set_member("prototype", Variable::Object(prototype));
    avm.set_variable("Base", Variable::Object(class));

    let code = BytecodeBuilder::new()
        .push_one("me")
        .store_register(1)
        .op(ActionCode::Pop)
        .push(&[PushValue::Integer(0), "Base".into()])
        .op(ActionCode::GetVariable)
        .push_one("record")
        .op(ActionCode::CallMethod)
        .build();
    run_with(&mut avm, &code);
    assert_eq!(seen.borrow()[0], Variable::from("me"));
}

#[test]
fn test_call_method_without_name_calls_target() {
    let mut avm = Avm::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    avm.set_variable("fn", recorder(seen.clone()));
    let code = BytecodeBuilder::new()
        .push(&["arg".into(), PushValue::Integer(1), "fn".into()])
        .op(ActionCode::GetVariable)
        .push(&[PushValue::Undefined])
        .op(ActionCode::CallMethod)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), Variable::from("recorded"));
    assert_eq!(seen.borrow()[1], Variable::from("arg"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Scripted functions
// ═══════════════════════════════════════════════════════════════════════════

/// `function sub(a, b) { return a - b; }` with a in r1 and b in r2
fn define_sub(code: &mut BytecodeBuilder) {
    let body = BytecodeBuilder::new()
        .push(&[PushValue::Register(1), PushValue::Register(2)])
        .op(ActionCode::Subtract)
        .op(ActionCode::Return)
        .build();
    code.define_function2("sub", 3, Function2Flags::default(), &[(1, "a"), (2, "b")], &body)
        .op(ActionCode::Pop);
}

#[test]
fn test_call_function_falls_back_to_defined_function() {
    let mut code = BytecodeBuilder::new();
    define_sub(&mut code);
    // sub(10, 4)
    code.push(&[
        PushValue::Integer(4),
        PushValue::Integer(10),
        PushValue::Integer(2),
        "sub".into(),
    ])
    .op(ActionCode::CallFunction)
    .op(ActionCode::Return);
    assert_eq!(run_with(&mut Avm::new(), &code.build()), number(6.0));
}

#[test]
fn test_nested_return_does_not_stop_caller() {
    let mut code = BytecodeBuilder::new();
    define_sub(&mut code);
    code.push(&[
        PushValue::Integer(1),
        PushValue::Integer(3),
        PushValue::Integer(2),
        "sub".into(),
    ])
    .op(ActionCode::CallFunction)
    .push_one(100)
    .op(ActionCode::Add2)
    .op(ActionCode::Return);
    assert_eq!(run_with(&mut Avm::new(), &code.build()), number(102.0));
}

#[test]
fn test_define_function_binds_params_as_variables() {
    let mut avm = Avm::new();
    let body = BytecodeBuilder::new()
        .push_one("greeting")
        .op(ActionCode::GetVariable)
        .push_one("!")
        .op(ActionCode::Add2)
        .op(ActionCode::Return)
        .build();
    let mut code = BytecodeBuilder::new();
    code.define_function("shout", &["greeting"], &body)
        .op(ActionCode::Pop);
    code.push(&["hey".into(), PushValue::Integer(1), "shout".into()])
        .op(ActionCode::CallFunction)
        .op(ActionCode::Return);
    assert_eq!(run_with(&mut avm, &code.build()), Variable::from("hey!"));
    // parameters leak into the globals
    assert_eq!(avm.get_variable("greeting"), Variable::from("hey"));
}

#[test]
fn test_define_function_captures_constant_pool() {
    let body = BytecodeBuilder::new()
        .push(&[PushValue::Constant(1)])
        .op(ActionCode::Return)
        .build();
    let mut code = BytecodeBuilder::new();
    code.constant_pool(&["unused", "from pool"]);
    code.define_function("f", &[], &body).op(ActionCode::Pop);
    code.push(&[PushValue::Integer(0), "f".into()])
        .op(ActionCode::CallFunction)
        .op(ActionCode::Return);
    assert_eq!(run_with(&mut Avm::new(), &code.build()), Variable::from("from pool"));
}

#[test]
fn test_preload_root_and_global_through_call_method() {
    // function f() { return [r1, r2]; } with root in r1 and global in r2
    let body = BytecodeBuilder::new()
        .push(&[
            PushValue::Register(1),
            PushValue::Register(2),
            PushValue::Integer(2),
        ])
        .op(ActionCode::InitArray)
        .op(ActionCode::Return)
        .build();
    let flags = Function2Flags {
        preload_root: true,
        preload_global: true,
        ..Default::default()
    };
    let mut code = BytecodeBuilder::new();
    code.define_function2("f", 3, flags, &[], &body)
        .op(ActionCode::Pop);
    // holder = {}; holder.f = f; return holder.f();
    code.push(&["holder".into(), PushValue::Integer(0)])
        .op(ActionCode::InitObject)
        .op(ActionCode::SetVariable);
    code.push(&["holder".into()])
        .op(ActionCode::GetVariable)
        .push(&["f".into(), "f".into()])
        .op(ActionCode::GetVariable)
        .op(ActionCode::SetMember);
    code.push(&[PushValue::Integer(0), "holder".into()])
        .op(ActionCode::GetVariable)
        .push_one("f")
        .op(ActionCode::CallMethod)
        .op(ActionCode::Return);

    let mut avm = Avm::new();
    let result = object(&run_with(&mut avm, &code.build()));
    let root = object(&avm.get_variable("_root"));
    let global = object(&avm.get_variable("_global"));
    assert!(object(&result.get_index(0)).ptr_eq(&root));
    assert!(object(&result.get_index(1)).ptr_eq(&global));
}

#[test]
fn test_recursion_hits_call_depth_limit() {
    let body = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0), "loop".into()])
        .op(ActionCode::CallFunction)
        .op(ActionCode::Return)
        .build();
    let mut code = BytecodeBuilder::new();
    code.define_function("loop", &[], &body).op(ActionCode::Pop);
    code.push(&[PushValue::Integer(0), "loop".into()])
        .op(ActionCode::CallFunction);
    let mut avm = Avm::with_config(AvmConfig {
        max_call_depth: 8,
        ..AvmConfig::default()
    });
    let err = avm.run_script(&code.build()).unwrap_err();
    assert!(matches!(err, AvmError::CallDepth { depth: 8 }));
    assert_eq!(avm.call_depth(), 0);
}

#[test]
fn test_static_function_takes_priority() {
    let mut avm = Avm::new();
    avm.register_static_function(
        "twice",
        Rc::new(|_, args| Ok(Variable::Number(args.first().map_or(0.0, Variable::as_number) * 2.0))),
    );
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(21), PushValue::Integer(1), "twice".into()])
        .op(ActionCode::CallFunction)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), number(42.0));
}

#[test]
fn test_object_call_protocol() {
    let mut avm = Avm::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let target = ObjectRef::new_plain();
    target.set_member("record", recorder(seen.clone()));
    let result = target
        .call("record", &mut avm, &[Variable::Number(1.0)])
        .unwrap();
    assert_eq!(result, Variable::from("recorded"));
    let seen = seen.borrow();
    assert!(object(&seen[0]).ptr_eq(&target));
    assert_eq!(seen[1], number(1.0));
}
