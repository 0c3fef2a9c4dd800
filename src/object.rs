//! Prototype-based object model
//!
//! Objects are shared, mutable maps from member name to [`Variable`]. Reads
//! delegate through the object's own `constructor` slot before looking at
//! the object's own slots; writes always land in the object's own slots.
//! A read of a missing member creates an empty object under that name.
//!
//! Objects are reference counted. Cycles (a prototype whose `constructor`
//! reaches back to it) are allowed and simply keep each other alive.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::avm::Avm;
use crate::error::AvmError;
use crate::function::Function;
use crate::prelude::{IndexMap, index_map_new};
use crate::value::{AvmString, CheapClone, Variable};

/// Name of the slot reads delegate through
pub const CONSTRUCTOR: &str = "constructor";

/// Name of the slot classes keep their instance template in
pub const PROTOTYPE: &str = "prototype";

/// Largest element index positional writes accept. Numeric names beyond
/// it are stored as ordinary slots.
pub const MAX_ARRAY_INDEX: usize = 1 << 20;

/// Constructor chains longer than this are treated as cyclic and end the
/// delegation walk.
const MAX_CONSTRUCTOR_DEPTH: usize = 64;

/// Builtin object variants
#[derive(Clone)]
pub enum ObjectKind {
    /// Plain `Object`
    Plain,
    /// `Array` with positional elements
    Array(Vec<Variable>),
    /// Boxed `String`
    String(AvmString),
    /// The `Stage` singleton
    Stage,
    /// `MovieClip` instance
    MovieClip,
    /// `TextField` instance
    TextField,
    /// Any callable
    Function(Function),
}

impl ObjectKind {
    /// The kind an object copied from a prototype of this kind gets.
    fn instance_kind(&self) -> ObjectKind {
        match self {
            ObjectKind::Array(elements) => ObjectKind::Array(elements.clone()),
            ObjectKind::String(s) => ObjectKind::String(s.cheap_clone()),
            ObjectKind::MovieClip => ObjectKind::MovieClip,
            ObjectKind::TextField => ObjectKind::TextField,
            ObjectKind::Plain | ObjectKind::Stage | ObjectKind::Function(_) => ObjectKind::Plain,
        }
    }
}

/// An ActionScript object
pub struct Object {
    /// Own members, in insertion order
    pub slots: IndexMap<AvmString, Variable>,
    /// Builtin behavior
    pub kind: ObjectKind,
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            slots: index_map_new(),
            kind,
        }
    }
}

/// Shared reference to an [`Object`]
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

// ObjectRef wraps Rc<RefCell<Object>>, so clone is cheap
impl CheapClone for ObjectRef {}

impl ObjectRef {
    pub fn new(object: Object) -> Self {
        ObjectRef(Rc::new(RefCell::new(object)))
    }

    pub fn with_kind(kind: ObjectKind) -> Self {
        Self::new(Object::new(kind))
    }

    /// Create an empty plain object
    pub fn new_plain() -> Self {
        Self::with_kind(ObjectKind::Plain)
    }

    /// Wrap a callable in an object with no members
    pub fn new_function(function: Function) -> Self {
        Self::with_kind(ObjectKind::Function(function))
    }

    /// Create a new object that starts as a copy of `prototype`'s members.
    pub fn instantiate(prototype: &ObjectRef) -> Self {
        let proto = prototype.borrow();
        ObjectRef::new(Object {
            slots: proto.slots.clone(),
            kind: proto.kind.instance_kind(),
        })
    }

    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Address-based identity, stable for the object's lifetime
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Check whether two references point at the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.borrow().kind, ObjectKind::Function(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.borrow().kind, ObjectKind::Array(_))
    }

    /// Clone out the callable, releasing the borrow before it is invoked
    pub fn as_function(&self) -> Option<Function> {
        match &self.borrow().kind {
            ObjectKind::Function(f) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.borrow().slots.len()
    }

    /// Name reported by the TypeOf action
    pub fn type_name(&self) -> &'static str {
        match self.borrow().kind {
            ObjectKind::Function(_) => "function",
            ObjectKind::MovieClip => "movieclip",
            _ => "object",
        }
    }

    pub fn has_own(&self, id: &str) -> bool {
        self.borrow().slots.contains_key(id)
    }

    /// Read an own slot without delegation or auto-vivification
    pub fn get_own(&self, id: &str) -> Option<Variable> {
        self.borrow().slots.get(id).cloned()
    }

    fn constructor(&self) -> Option<ObjectRef> {
        match self.borrow().slots.get(CONSTRUCTOR) {
            Some(Variable::Object(ctor)) => Some(ctor.cheap_clone()),
            _ => None,
        }
    }

    /// True when the constructor chain or the object itself has `id`.
    pub fn has_member(&self, id: &str) -> bool {
        self.has_member_at(id, 0)
    }

    fn has_member_at(&self, id: &str, depth: usize) -> bool {
        if depth < MAX_CONSTRUCTOR_DEPTH {
            if let Some(ctor) = self.constructor() {
                if ctor.has_member_at(id, depth + 1) {
                    return true;
                }
            }
        }
        self.pseudo_member(id).is_some() || self.has_own(id)
    }

    /// Read a member.
    ///
    /// Delegates to the constructor when it has `id`, then falls back to the
    /// own slot. A miss stores and returns a fresh empty object, so repeated
    /// reads of the same missing name return the same object.
    pub fn get_member(&self, id: &str) -> Variable {
        self.get_member_at(id, 0)
    }

    fn get_member_at(&self, id: &str, depth: usize) -> Variable {
        if let Some(value) = self.pseudo_member(id) {
            return value;
        }
        if depth < MAX_CONSTRUCTOR_DEPTH {
            if let Some(ctor) = self.constructor() {
                if ctor.has_member_at(id, depth + 1) {
                    return ctor.get_member_at(id, depth + 1);
                }
            }
        }
        if let Some(value) = self.get_own(id) {
            return value;
        }
        let created = Variable::Object(ObjectRef::new_plain());
        self.borrow_mut()
            .slots
            .insert(AvmString::from(id), created.clone());
        created
    }

    /// Write an own slot. Never delegates.
    pub fn set_member(&self, id: &str, value: Variable) {
        self.borrow_mut().slots.insert(AvmString::from(id), value);
    }

    /// Members computed from the builtin kind rather than stored in slots
    fn pseudo_member(&self, id: &str) -> Option<Variable> {
        match &self.borrow().kind {
            ObjectKind::Array(elements) => {
                if id == "length" {
                    return Some(Variable::Number(elements.len() as f64));
                }
                let index = id.parse::<usize>().ok()?;
                elements.get(index).cloned()
            }
            ObjectKind::String(s) if id == "length" => {
                Some(Variable::Number(s.char_count() as f64))
            }
            _ => None,
        }
    }

    /// Positional read; out-of-range and non-array reads give Undefined.
    pub fn get_index(&self, index: usize) -> Variable {
        match &self.borrow().kind {
            ObjectKind::Array(elements) => elements.get(index).cloned().unwrap_or_default(),
            _ => Variable::Undefined,
        }
    }

    /// Positional write, growing the array with Undefined as needed.
    /// Returns false when this object is not an array or `index` is past
    /// [`MAX_ARRAY_INDEX`].
    pub fn set_index(&self, index: usize, value: Variable) -> bool {
        if index > MAX_ARRAY_INDEX {
            return false;
        }
        let mut obj = self.borrow_mut();
        let ObjectKind::Array(elements) = &mut obj.kind else {
            return false;
        };
        if index >= elements.len() {
            let Some(len) = index.checked_add(1) else {
                return false;
            };
            elements.resize(len, Variable::Undefined);
        }
        if let Some(slot) = elements.get_mut(index) {
            *slot = value;
        }
        true
    }

    /// Call the member `name` with this object as `this`.
    ///
    /// Uses the `_root`, this, arguments preload order.
    pub fn call(
        &self,
        name: &str,
        avm: &mut Avm,
        args: &[Variable],
    ) -> Result<Variable, AvmError> {
        let member = self.get_member(name);
        let function = member
            .as_object()
            .and_then(|obj| obj.as_function())
            .ok_or_else(|| {
                AvmError::resolution_error(format!("Object::call: {} is not a function", name))
            })?;
        function.call_with_this(avm, Variable::Object(self.cheap_clone()), args)
    }

    /// Names visited by Enumerate2: array indices first, then own slots.
    pub fn slot_names(&self) -> Vec<AvmString> {
        let obj = self.borrow();
        let mut names = Vec::with_capacity(obj.slots.len());
        if let ObjectKind::Array(elements) = &obj.kind {
            names.extend((0..elements.len()).map(|i| AvmString::from(i.to_string())));
        }
        names.extend(obj.slots.keys().map(|k| k.cheap_clone()));
        names
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(obj) = self.0.try_borrow() else {
            return write!(f, "[object <borrowed>]");
        };
        match &obj.kind {
            ObjectKind::Plain => write!(f, "{{{} members}}", obj.slots.len()),
            ObjectKind::Array(elements) => write!(f, "[Array({})]", elements.len()),
            ObjectKind::String(s) => write!(f, "[String {:?}]", s),
            ObjectKind::Stage => write!(f, "[Stage]"),
            ObjectKind::MovieClip => write!(f, "[MovieClip]"),
            ObjectKind::TextField => write!(f, "[TextField]"),
            ObjectKind::Function(func) => write!(f, "[Function: {}]", func.display_name()),
        }
    }
}
