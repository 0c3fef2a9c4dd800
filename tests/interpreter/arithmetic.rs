//! Arithmetic, comparison and coercion opcodes

use super::{eval, number};
use avm::Variable;
use avm::bytecode::{ActionCode, PushValue};

fn binary(b: PushValue, a: PushValue, op: ActionCode) -> Variable {
    eval(|code| {
        code.push(&[b, a]).op(op).op(ActionCode::Return);
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Operand order
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_non_commutative_operand_order() {
    use PushValue::Integer;
    assert_eq!(binary(Integer(10), Integer(4), ActionCode::Subtract), number(6.0));
    assert_eq!(binary(Integer(12), Integer(3), ActionCode::Divide), number(4.0));
    assert_eq!(binary(Integer(6), Integer(7), ActionCode::Multiply), number(42.0));
    assert_eq!(binary(Integer(2), Integer(5), ActionCode::Add2), number(7.0));
    assert_eq!(binary(Integer(7), Integer(3), ActionCode::Modulo), number(1.0));
}

#[test]
fn test_add2_concatenates_in_order() {
    let result = binary("foo".into(), "bar".into(), ActionCode::Add2);
    assert_eq!(result, Variable::from("foobar"));

    let result = binary("n=".into(), PushValue::Integer(5), ActionCode::Add2);
    assert_eq!(result, Variable::from("n=5"));
}

#[test]
fn test_add2_mismatched_non_strings_is_zero() {
    let result = binary(PushValue::Boolean(true), PushValue::Integer(5), ActionCode::Add2);
    assert_eq!(result, number(0.0));
}

#[test]
fn test_arithmetic_on_non_numbers_is_undefined() {
    let result = binary("10".into(), PushValue::Integer(1), ActionCode::Subtract);
    assert_eq!(result, Variable::Undefined);
}

#[test]
fn test_divide_by_zero_is_infinite() {
    let result = binary(PushValue::Integer(1), PushValue::Integer(0), ActionCode::Divide);
    assert_eq!(result, number(f64::INFINITY));
}

#[test]
fn test_legacy_add_coerces() {
    let result = binary(PushValue::Boolean(true), PushValue::Integer(2), ActionCode::Add);
    assert_eq!(result, number(3.0));
}

#[test]
fn test_increment_decrement() {
    let result = eval(|code| {
        code.push_one(5)
            .op(ActionCode::Increment)
            .op(ActionCode::Increment)
            .op(ActionCode::Decrement)
            .op(ActionCode::Return);
    });
    assert_eq!(result, number(6.0));
}

// ═══════════════════════════════════════════════════════════════════════════
// Comparison
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_less2_and_greater() {
    use PushValue::Integer;
    assert_eq!(binary(Integer(1), Integer(2), ActionCode::Less2), Variable::Boolean(true));
    assert_eq!(binary(Integer(2), Integer(1), ActionCode::Less2), Variable::Boolean(false));
    assert_eq!(binary(Integer(2), Integer(1), ActionCode::Greater), Variable::Boolean(true));
    assert_eq!(binary(Integer(1), Integer(2), ActionCode::Greater), Variable::Boolean(false));
}

#[test]
fn test_equals2_numbers_and_null() {
    use PushValue::{Integer, Null, Undefined};
    assert_eq!(binary(Integer(3), Integer(3), ActionCode::Equals2), Variable::Boolean(true));
    assert_eq!(binary(Null, Null, ActionCode::Equals2), Variable::Boolean(true));
    assert_eq!(binary(Undefined, Undefined, ActionCode::Equals2), Variable::Boolean(true));
    assert_eq!(binary(Null, Undefined, ActionCode::Equals2), Variable::Boolean(false));
}

/// Strings and booleans of the same value compare unequal through `==`.
/// Scripts compiled against this runtime may rely on it.
#[test]
fn test_equals2_string_and_boolean_quirk() {
    assert_eq!(
        binary("a".into(), "a".into(), ActionCode::Equals2),
        Variable::Boolean(false)
    );
    assert_eq!(
        binary(PushValue::Boolean(true), PushValue::Boolean(true), ActionCode::Equals2),
        Variable::Boolean(false)
    );
}

#[test]
fn test_string_equals_compares_text() {
    assert_eq!(
        binary("a".into(), "a".into(), ActionCode::StringEquals),
        Variable::Boolean(true)
    );
}

#[test]
fn test_logical_ops_require_numbers() {
    use PushValue::{Boolean, Integer};
    assert_eq!(binary(Integer(1), Integer(2), ActionCode::And), Variable::Boolean(true));
    assert_eq!(binary(Integer(0), Integer(2), ActionCode::Or), Variable::Boolean(true));
    assert_eq!(binary(Boolean(true), Integer(2), ActionCode::Or), Variable::Boolean(false));
}

#[test]
fn test_not() {
    let result = eval(|code| {
        code.push_one(0).op(ActionCode::Not).op(ActionCode::Return);
    });
    assert_eq!(result, Variable::Boolean(true));
}

// ═══════════════════════════════════════════════════════════════════════════
// Literals and conversions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_push_double_word_order() {
    let result = eval(|code| {
        code.push(&[PushValue::Double(-2.75)]).op(ActionCode::Return);
    });
    assert_eq!(result, number(-2.75));
}

#[test]
fn test_push_float() {
    let result = eval(|code| {
        code.push(&[PushValue::Float(0.5)]).op(ActionCode::Return);
    });
    assert_eq!(result, number(0.5));
}

#[test]
fn test_multiple_literals_in_one_push() {
    let result = eval(|code| {
        code.push(&[
            PushValue::Null,
            PushValue::Boolean(true),
            PushValue::Integer(-3),
            PushValue::Undefined,
        ])
        .op(ActionCode::Pop)
        .op(ActionCode::Return);
    });
    assert_eq!(result, number(-3.0));
}

#[test]
fn test_to_string_and_string_ops() {
    let result = eval(|code| {
        code.push(&[PushValue::Double(1.5)])
            .op(ActionCode::ToString)
            .push_one("!")
            .op(ActionCode::StringAdd)
            .op(ActionCode::Return);
    });
    assert_eq!(result, Variable::from("1.5!"));

    let result = eval(|code| {
        code.push_one("héllo")
            .op(ActionCode::StringLength)
            .op(ActionCode::Return);
    });
    assert_eq!(result, number(5.0));
}

#[test]
fn test_to_number() {
    let result = eval(|code| {
        code.push_one(true).op(ActionCode::ToNumber).op(ActionCode::Return);
    });
    assert_eq!(result, number(1.0));
}

#[test]
fn test_type_of() {
    let cases: [(PushValue, &str); 5] = [
        (PushValue::Undefined, "undefined"),
        (PushValue::Null, "null"),
        (PushValue::Integer(1), "number"),
        (PushValue::Boolean(false), "boolean"),
        ("s".into(), "string"),
    ];
    for (value, expected) in cases {
        let result = eval(|code| {
            code.push(&[value]).op(ActionCode::TypeOf).op(ActionCode::Return);
        });
        assert_eq!(result, Variable::from(expected));
    }
}

#[test]
fn test_stack_swap_and_duplicate() {
    let result = eval(|code| {
        code.push(&[PushValue::Integer(10), PushValue::Integer(4)])
            .op(ActionCode::StackSwap)
            .op(ActionCode::Subtract)
            .op(ActionCode::PushDuplicate)
            .op(ActionCode::Add2)
            .op(ActionCode::Return);
    });
    // (4 - 10) * 2
    assert_eq!(result, number(-12.0));
}
