//! ActionScript value representation
//!
//! `Variable` is the tagged value every register, stack slot and object
//! member holds. Its operators implement the loose typing rules of the
//! bytecode: they never fail, and hand back falsy results when the operand
//! types do not line up.

use std::fmt;
use std::rc::Rc;

use crate::object::ObjectRef;

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// This trait makes it explicit when a clone is cheap (just incrementing a reference count)
/// vs when it might be expensive (copying data).
///
/// # Examples
/// - `ObjectRef` (Rc<RefCell<Object>>) - cheap clone
/// - `AvmString` (Rc<str>) - cheap clone
pub trait CheapClone: Clone {
    /// Create a cheap (reference-counted) clone of this value.
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Rc<T> {}

/// The type tag reported by [`Variable::get_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    Undefined,
    Null,
    Number,
    Boolean,
    String,
    Object,
}

/// An ActionScript value
///
/// Copies are by value except for `Object`, whose payload is a shared
/// reference: two copies alias the same object.
#[derive(Clone, Default)]
pub enum Variable {
    #[default]
    Undefined,
    Null,
    Number(f64),
    Boolean(bool),
    String(AvmString),
    Object(ObjectRef),
}

impl Variable {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Variable::Undefined)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Variable::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Variable::Number(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Variable::Object(_))
    }

    /// Check if this value holds a callable object
    pub fn is_function(&self) -> bool {
        match self {
            Variable::Object(obj) => obj.is_function(),
            _ => false,
        }
    }

    /// The dynamic type of this value.
    ///
    /// An object that is not a function and has no slots reports `Null`:
    /// auto-vivified members and bare `{}` behave as falsy empties.
    pub fn get_type(&self) -> VariableType {
        match self {
            Variable::Undefined => VariableType::Undefined,
            Variable::Null => VariableType::Null,
            Variable::Number(_) => VariableType::Number,
            Variable::Boolean(_) => VariableType::Boolean,
            Variable::String(_) => VariableType::String,
            Variable::Object(obj) => {
                if !obj.is_function() && obj.slot_count() == 0 {
                    VariableType::Null
                } else {
                    VariableType::Object
                }
            }
        }
    }

    /// Get the object payload, if any
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Variable::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variable::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric coercion: Number is itself, Boolean is 0/1, anything else 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Variable::Number(n) => *n,
            Variable::Boolean(true) => 1.0,
            Variable::Boolean(false) => 0.0,
            _ => 0.0,
        }
    }

    /// String coercion: Number is formatted, String is itself, anything else
    /// is the empty string.
    pub fn as_string(&self) -> AvmString {
        match self {
            Variable::Number(n) => AvmString::from(format_number(*n)),
            Variable::String(s) => s.cheap_clone(),
            _ => AvmString::default(),
        }
    }

    /// Boolean coercion: nonzero numbers, `true` and any object reference are
    /// truthy. Strings, null and undefined are not.
    pub fn as_boolean(&self) -> bool {
        match self {
            Variable::Number(n) => *n != 0.0,
            Variable::Boolean(b) => *b,
            Variable::Object(_) => true,
            _ => false,
        }
    }

    /// Generic `+`: numeric sum, or concatenation when either side is a
    /// string. Mismatched non-string types yield 0.
    pub fn generic_add(&self, rhs: &Variable) -> Variable {
        let (lt, rt) = (self.get_type(), rhs.get_type());
        if lt == VariableType::String || rt == VariableType::String {
            return Variable::String(self.as_string() + &rhs.as_string());
        }
        if lt != rt {
            return Variable::Number(0.0);
        }
        Variable::Number(self.as_number() + rhs.as_number())
    }

    pub fn subtract(&self, rhs: &Variable) -> Variable {
        self.numeric(rhs, |a, b| a - b)
    }

    pub fn multiply(&self, rhs: &Variable) -> Variable {
        self.numeric(rhs, |a, b| a * b)
    }

    pub fn divide(&self, rhs: &Variable) -> Variable {
        self.numeric(rhs, |a, b| a / b)
    }

    pub fn modulo(&self, rhs: &Variable) -> Variable {
        self.numeric(rhs, |a, b| a % b)
    }

    fn numeric(&self, rhs: &Variable, op: impl FnOnce(f64, f64) -> f64) -> Variable {
        match (self.get_type(), rhs.get_type()) {
            (VariableType::Number, VariableType::Number) => {
                Variable::Number(op(self.as_number(), rhs.as_number()))
            }
            _ => Variable::Undefined,
        }
    }

    /// `&&` over numbers only; any non-number operand gives `false`.
    pub fn logical_and(&self, rhs: &Variable) -> Variable {
        match (self.get_type(), rhs.get_type()) {
            (VariableType::Number, VariableType::Number) => {
                Variable::Boolean(self.as_number() != 0.0 && rhs.as_number() != 0.0)
            }
            _ => Variable::Boolean(false),
        }
    }

    /// `||` over numbers only; any non-number operand gives `false`.
    pub fn logical_or(&self, rhs: &Variable) -> Variable {
        match (self.get_type(), rhs.get_type()) {
            (VariableType::Number, VariableType::Number) => {
                Variable::Boolean(self.as_number() != 0.0 || rhs.as_number() != 0.0)
            }
            _ => Variable::Boolean(false),
        }
    }

    /// The bytecode's `==`.
    ///
    /// Types are compared first. Numbers compare numerically, null and
    /// undefined equal themselves. Every other same-type pair (strings,
    /// booleans, objects) compares unequal.
    pub fn loose_equals(&self, rhs: &Variable) -> bool {
        let ty = self.get_type();
        if ty != rhs.get_type() {
            return false;
        }
        match ty {
            VariableType::Number => self.as_number() == rhs.as_number(),
            VariableType::Undefined | VariableType::Null => true,
            _ => false,
        }
    }

    /// The bytecode's `<`, defined for numbers only.
    pub fn less_than(&self, rhs: &Variable) -> bool {
        match (self.get_type(), rhs.get_type()) {
            (VariableType::Number, VariableType::Number) => self.as_number() < rhs.as_number(),
            _ => false,
        }
    }

    /// Name reported by the TypeOf action
    pub fn type_of(&self) -> &'static str {
        match self {
            Variable::Undefined => "undefined",
            Variable::Null => "null",
            Variable::Number(_) => "number",
            Variable::Boolean(_) => "boolean",
            Variable::String(_) => "string",
            Variable::Object(obj) => obj.type_name(),
        }
    }

    /// Identity comparison: same variant and same payload, objects by
    /// reference. This is what `PartialEq` uses; the bytecode's own `==` is
    /// [`Variable::loose_equals`].
    pub fn same_value(&self, other: &Variable) -> bool {
        match (self, other) {
            (Variable::Undefined, Variable::Undefined) => true,
            (Variable::Null, Variable::Null) => true,
            (Variable::Number(a), Variable::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Variable::Boolean(a), Variable::Boolean(b)) => a == b,
            (Variable::String(a), Variable::String(b)) => a == b,
            (Variable::Object(a), Variable::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Default numeric-to-text conversion
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Undefined => write!(f, "undefined"),
            Variable::Null => write!(f, "null"),
            Variable::Number(n) => write!(f, "{}", n),
            Variable::Boolean(b) => write!(f, "{}", b),
            Variable::String(s) => write!(f, "\"{}\"", s.as_str()),
            Variable::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl std::ops::Add for &Variable {
    type Output = Variable;

    fn add(self, rhs: &Variable) -> Variable {
        self.generic_add(rhs)
    }
}

impl std::ops::Sub for &Variable {
    type Output = Variable;

    fn sub(self, rhs: &Variable) -> Variable {
        self.subtract(rhs)
    }
}

impl std::ops::Mul for &Variable {
    type Output = Variable;

    fn mul(self, rhs: &Variable) -> Variable {
        self.multiply(rhs)
    }
}

impl std::ops::Div for &Variable {
    type Output = Variable;

    fn div(self, rhs: &Variable) -> Variable {
        self.divide(rhs)
    }
}

// Conversions from Rust types

impl From<bool> for Variable {
    fn from(b: bool) -> Self {
        Variable::Boolean(b)
    }
}

impl From<f64> for Variable {
    fn from(n: f64) -> Self {
        Variable::Number(n)
    }
}

impl From<i32> for Variable {
    fn from(n: i32) -> Self {
        Variable::Number(n as f64)
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Variable::String(AvmString::from(s))
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Self {
        Variable::String(AvmString::from(s))
    }
}

impl From<AvmString> for Variable {
    fn from(s: AvmString) -> Self {
        Variable::String(s)
    }
}

impl From<ObjectRef> for Variable {
    fn from(obj: ObjectRef) -> Self {
        Variable::Object(obj)
    }
}

/// Reference-counted string shared by constant pools, slots and values
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AvmString(Rc<str>);

// AvmString wraps Rc<str>, so clone is cheap (just reference count increment)
impl CheapClone for AvmString {}

impl AvmString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of characters, which is what ActionScript calls `length`
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl Default for AvmString {
    fn default() -> Self {
        AvmString(Rc::from(""))
    }
}

impl AsRef<str> for AvmString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for AvmString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AvmString {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for AvmString {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl From<&str> for AvmString {
    fn from(s: &str) -> Self {
        AvmString(s.into())
    }
}

impl From<String> for AvmString {
    fn from(s: String) -> Self {
        AvmString(s.into())
    }
}

impl fmt::Debug for AvmString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl fmt::Display for AvmString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<&AvmString> for AvmString {
    type Output = AvmString;

    fn add(self, other: &AvmString) -> AvmString {
        let mut s = String::from(&*self.0);
        s.push_str(&other.0);
        AvmString::from(s)
    }
}
