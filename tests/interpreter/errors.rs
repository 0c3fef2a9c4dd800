//! Malformed streams and runtime faults

use super::{number, try_run};
use avm::bytecode::{ActionCode, BytecodeBuilder, PushValue, push_type};
use avm::{Avm, AvmError};

#[test]
fn test_unknown_push_tag_is_format_error() {
    let code = BytecodeBuilder::new()
        .raw(ActionCode::Push.as_u8(), &[10, 0])
        .build();
    let err = try_run(&code).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_declared_length_must_match_payload() {
    // StoreRegister reads one byte but declares two
    let code = BytecodeBuilder::new()
        .push_one(1)
        .raw(ActionCode::StoreRegister.as_u8(), &[1, 0])
        .build();
    let err = try_run(&code).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("Invalid tag"));

    // Push overruns a declared length of three
    let code = BytecodeBuilder::new()
        .raw(0x96, &[push_type::INTEGER, 1, 0])
        .raw(0x00, &[0, 0, 0, 0])
        .build();
    assert!(try_run(&code).unwrap_err().is_format_error());
}

#[test]
fn test_stack_underflow() {
    let code = BytecodeBuilder::new()
        .push_one(1)
        .op(ActionCode::Subtract)
        .build();
    let err = try_run(&code).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("Subtract"));
}

#[test]
fn test_get_member_on_number_is_type_error() {
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(3), "foo".into()])
        .op(ActionCode::GetMember)
        .build();
    assert!(try_run(&code).unwrap_err().is_type_error());
}

#[test]
fn test_get_variable_needs_string_name() {
    let code = BytecodeBuilder::new()
        .push_one(7)
        .op(ActionCode::GetVariable)
        .build();
    assert!(try_run(&code).unwrap_err().is_type_error());
}

#[test]
fn test_call_method_on_missing_member_is_resolution_error() {
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0), PushValue::Integer(0)])
        .op(ActionCode::InitObject)
        .push_one("missing")
        .op(ActionCode::CallMethod)
        .build();
    assert!(try_run(&code).unwrap_err().is_resolution_error());
}

#[test]
fn test_call_method_on_primitive_is_type_error() {
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0), "text".into(), "toUpperCase".into()])
        .op(ActionCode::CallMethod)
        .build();
    assert!(try_run(&code).unwrap_err().is_type_error());
}

#[test]
fn test_new_object_of_unknown_class_is_type_error() {
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0), "NoSuchClass".into()])
        .op(ActionCode::NewObject)
        .build();
    assert!(try_run(&code).unwrap_err().is_type_error());
}

#[test]
fn test_define_function2_reserved_bits() {
    let mut header = Vec::new();
    header.extend_from_slice(b"f\0");
    header.extend_from_slice(&0u16.to_le_bytes());
    header.push(1);
    header.extend_from_slice(&[0, 0b0000_0010]);
    header.extend_from_slice(&0u16.to_le_bytes());
    let code = BytecodeBuilder::new()
        .raw(ActionCode::DefineFunction2.as_u8(), &header)
        .build();
    let err = try_run(&code).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_get_url2_reserved_bits() {
    let code = BytecodeBuilder::new()
        .push(&["FSCommand:x".into(), "".into()])
        .get_url2(0b0001_0000)
        .build();
    assert!(try_run(&code).unwrap_err().is_format_error());
}

#[test]
fn test_constant_index_out_of_range() {
    let code = BytecodeBuilder::new()
        .constant_pool(&["only"])
        .push(&[PushValue::Constant(1)])
        .build();
    assert!(try_run(&code).unwrap_err().is_format_error());
}

#[test]
fn test_unknown_opcode_is_skipped() {
    let code = BytecodeBuilder::new()
        .raw(0x2F, &[])
        .raw(0xC0, &[1, 2, 3])
        .push_one(9)
        .op(ActionCode::Return)
        .build();
    assert_eq!(try_run(&code).unwrap(), number(9.0));
}

#[test]
fn test_effects_before_a_fault_persist() {
    let mut avm = Avm::new();
    let code = BytecodeBuilder::new()
        .push(&["saved".into(), PushValue::Integer(1)])
        .op(ActionCode::SetVariable)
        .op(ActionCode::Subtract)
        .build();
    let err = avm.run_script(&code).unwrap_err();
    assert!(matches!(err, AvmError::Format { .. }));
    assert_eq!(avm.get_variable("saved"), number(1.0));
}

#[test]
fn test_truncated_stream_is_format_error() {
    // long-form opcode whose length runs past the end of the stream
    let code = [ActionCode::Push.as_u8(), 8, 0, push_type::INTEGER];
    assert!(try_run(&code).unwrap_err().is_format_error());
}

#[test]
fn test_failed_call_leaves_stack_depth_balanced() {
    let mut avm = Avm::new();
    let body = BytecodeBuilder::new().op(ActionCode::Subtract).build();
    let mut code = BytecodeBuilder::new();
    code.define_function("broken", &[], &body)
        .op(ActionCode::Pop)
        .push(&[PushValue::Integer(0), "broken".into()])
        .op(ActionCode::CallFunction);
    assert!(avm.run_script(&code.build()).is_err());
    assert_eq!(avm.call_depth(), 0);
    assert!(avm.get_variable("broken").as_object().is_some());
}
