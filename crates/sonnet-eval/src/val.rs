//! The runtime value graph: environments, thunks, lazy objects and arrays,
//! and functions.
//!
//! Laziness lives in [`Thunk`]: a shared single-assignment cell holding a
//! deferred `(env, expr)` pair until someone forces it, then the cached value
//! or error forever after. Environments are persistent chains, so extension
//! is O(1) and closures capture them by cheap clone.

use crate::error::Error;
use always::always;
use rustc_hash::FxHashMap;
use sonnet_core::{Assert, ExprId, Id, Lit, Num, Str, Vis};
use sonnet_std_sig::StdFn;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A Jsonnet value.
///
/// Arrays and objects are lazy: they contain thunks, not values. Forcing
/// happens on demand, when the evaluator needs a weak head-normal form.
#[derive(Debug, Clone)]
pub enum Val {
  Lit(Lit),
  Array(Array),
  Object(Object),
  Fn(Fn),
}

impl Val {
  /// The name of this value's type, as reported in type errors.
  #[must_use]
  pub fn type_name(&self) -> &'static str {
    match self {
      Val::Lit(lit) => lit.type_name(),
      Val::Array(_) => "array",
      Val::Object(_) => "object",
      Val::Fn(_) => "function",
    }
  }
}

impl From<bool> for Val {
  fn from(b: bool) -> Self {
    Val::Lit(Lit::Bool(b))
  }
}

impl From<Num> for Val {
  fn from(n: Num) -> Self {
    Val::Lit(Lit::Num(n))
  }
}

impl From<Str> for Val {
  fn from(s: Str) -> Self {
    Val::Lit(Lit::Str(s))
  }
}

impl From<Array> for Val {
  fn from(xs: Array) -> Self {
    Val::Array(xs)
  }
}

impl From<Object> for Val {
  fn from(obj: Object) -> Self {
    Val::Object(obj)
  }
}

/// A single-assignment cell: a deferred computation, or its cached result.
#[derive(Debug, Clone)]
pub struct Thunk(Rc<RefCell<ThunkState>>);

#[derive(Debug)]
enum ThunkState {
  Unforced(Env, ExprId),
  InProgress,
  Forced(Val),
  Failed(Error),
}

/// What a force found in the cell.
pub(crate) enum ForceState {
  /// Already forced (or failed); here is the cached result.
  Done(Result<Val, Error>),
  /// The cell is being forced further up the stack: infinite recursion.
  Cycle,
  /// The deferred computation; the cell is now marked in-progress.
  Eval(Env, ExprId),
}

impl Thunk {
  #[must_use]
  pub fn new(env: Env, expr: ExprId) -> Self {
    Self(Rc::new(RefCell::new(ThunkState::Unforced(env, expr))))
  }

  #[must_use]
  pub fn forced(val: Val) -> Self {
    Self(Rc::new(RefCell::new(ThunkState::Forced(val))))
  }

  pub(crate) fn take(&self) -> ForceState {
    let mut state = self.0.borrow_mut();
    match std::mem::replace(&mut *state, ThunkState::InProgress) {
      ThunkState::Unforced(env, expr) => ForceState::Eval(env, expr),
      ThunkState::InProgress => ForceState::Cycle,
      ThunkState::Forced(val) => {
        *state = ThunkState::Forced(val.clone());
        ForceState::Done(Ok(val))
      }
      ThunkState::Failed(err) => {
        *state = ThunkState::Failed(err.clone());
        ForceState::Done(Err(err))
      }
    }
  }

  /// Writes the result of the deferred computation. The cell must be
  /// in-progress.
  pub(crate) fn fulfill(&self, result: Result<Val, Error>) -> Result<Val, Error> {
    let mut state = self.0.borrow_mut();
    always!(matches!(*state, ThunkState::InProgress), "fulfill a thunk not in progress");
    match result {
      Ok(val) => {
        *state = ThunkState::Forced(val.clone());
        Ok(val)
      }
      Err(err) => {
        *state = ThunkState::Failed(err.clone());
        Err(err)
      }
    }
  }
}

/// An environment: a persistent chain of bind frames and `self` anchors.
///
/// `self` resolves to the newest anchor, `super` to its parent chain, and `$`
/// to the *oldest* anchor, which is the first object on the path from the
/// program root to the expression under evaluation.
#[derive(Debug, Clone, Default)]
pub struct Env(Option<Rc<Node>>);

#[derive(Debug)]
struct Node {
  elem: EnvElem,
  prev: Env,
}

#[derive(Debug)]
enum EnvElem {
  /// Written only while the frame is being built, then effectively frozen.
  Binds(RefCell<FxHashMap<Id, Thunk>>),
  This(Object),
}

impl Env {
  #[must_use]
  pub fn empty() -> Self {
    Self(None)
  }

  /// Pushes an empty bind frame. Bindings inserted afterwards may capture the
  /// returned env, which is how recursive `local` closes the knot.
  #[must_use]
  pub fn push_binds(&self) -> Env {
    let elem = EnvElem::Binds(RefCell::new(FxHashMap::default()));
    Env(Some(Rc::new(Node { elem, prev: self.clone() })))
  }

  /// Inserts into the newest frame, which must be a bind frame.
  pub fn insert(&self, id: Id, thunk: Thunk) {
    let Some(node) = &self.0 else {
      always!(false, "insert into an empty env");
      return;
    };
    match &node.elem {
      EnvElem::Binds(map) => {
        map.borrow_mut().insert(id, thunk);
      }
      EnvElem::This(_) => {
        always!(false, "insert into a `self` anchor");
      }
    }
  }

  /// A new env with a single extra binding.
  #[must_use]
  pub fn bind(&self, id: Id, thunk: Thunk) -> Env {
    let env = self.push_binds();
    env.insert(id, thunk);
    env
  }

  /// A new env anchored on `obj` as the current object.
  #[must_use]
  pub fn with_this(&self, obj: &Object) -> Env {
    let elem = EnvElem::This(obj.as_self());
    Env(Some(Rc::new(Node { elem, prev: self.clone() })))
  }

  fn nodes(&self) -> impl Iterator<Item = &Node> {
    let mut cur = self.0.as_deref();
    std::iter::from_fn(move || {
      let node = cur?;
      cur = node.prev.0.as_deref();
      Some(node)
    })
  }

  /// Looks up an ordinary identifier, newest frame first.
  #[must_use]
  pub fn lookup(&self, id: &Id) -> Option<Thunk> {
    self.nodes().find_map(|node| match &node.elem {
      EnvElem::Binds(map) => map.borrow().get(id).cloned(),
      EnvElem::This(_) => None,
    })
  }

  /// What `self` refers to: the newest anchor.
  #[must_use]
  pub fn this(&self) -> Option<Object> {
    self.nodes().find_map(|node| match &node.elem {
      EnvElem::This(obj) => Some(obj.clone()),
      EnvElem::Binds(_) => None,
    })
  }

  /// What `$` refers to: the oldest anchor.
  #[must_use]
  pub fn outermost(&self) -> Option<Object> {
    let mut ret = None;
    for node in self.nodes() {
      if let EnvElem::This(obj) = &node.elem {
        ret = Some(obj.clone());
      }
    }
    ret
  }
}

/// A lazy object: an ancestry chain from `+`, most-derived link first.
///
/// The chain links are shared (`Rc`), but every composite gets fresh links so
/// each composite owns its own field memo cache and assert bookkeeping: a
/// field forced through `a + b` is a different computation than the same
/// field forced through `a` alone, because `self` differs.
#[derive(Debug, Clone)]
pub struct Object {
  data: Rc<ObjectData>,
  /// A `super` view: field dispatch skips the head link, but `self` inside
  /// any dispatched field still refers to the whole object.
  is_super: bool,
}

#[derive(Debug)]
struct ObjectData {
  parent: Option<Object>,
  kind: ObjectKind,
  /// Memo of forced field thunks, keyed by (ancestry depth, field name).
  cache: RefCell<FxHashMap<(u32, Str), Thunk>>,
  asserts_checked: Cell<bool>,
}

#[derive(Debug, Clone)]
enum ObjectKind {
  /// The standard library: every [`StdFn`], hidden.
  Std,
  Lit(LitObject),
}

#[derive(Debug, Clone)]
struct LitObject {
  env: Env,
  asserts: Vec<Assert>,
  fields: BTreeMap<Str, ObjField>,
}

/// A field definition: its visibility, the env to close its expression over
/// (without a `self` anchor; that is supplied at force time), and the
/// expression.
#[derive(Debug, Clone)]
pub struct ObjField {
  pub vis: Vis,
  pub env: Env,
  pub expr: ExprId,
}

/// Where a field lookup landed.
pub enum FieldSrc {
  /// A regular field at the given ancestry depth.
  Expr { depth: u32, vis: Vis, env: Env, expr: ExprId },
  /// A standard library function.
  Std(StdFn),
}

impl Object {
  #[must_use]
  pub fn new_lit(env: Env, asserts: Vec<Assert>, fields: BTreeMap<Str, ObjField>) -> Self {
    let kind = ObjectKind::Lit(LitObject { env, asserts, fields });
    Self::from_kind(kind, None)
  }

  /// Returns the standard library object.
  #[must_use]
  pub fn std_lib() -> Self {
    Self::from_kind(ObjectKind::Std, None)
  }

  fn from_kind(kind: ObjectKind, parent: Option<Object>) -> Self {
    let data = ObjectData {
      parent,
      kind,
      cache: RefCell::new(FxHashMap::default()),
      asserts_checked: Cell::new(false),
    };
    Self { data: Rc::new(data), is_super: false }
  }

  /// `lhs + rhs`: the right chain re-anchored on the left. The links are
  /// copied so the composite gets fresh memo caches and re-runs asserts.
  #[must_use]
  pub fn compose(lhs: &Object, rhs: &Object) -> Object {
    let links: Vec<ObjectKind> = rhs.ancestry().map(|data| data.kind.clone()).collect();
    let mut cur = lhs.as_self();
    for kind in links.into_iter().rev() {
      cur = Self::from_kind(kind, Some(cur));
    }
    cur
  }

  /// The `super` view of this object.
  #[must_use]
  pub fn parent_view(&self) -> Object {
    Object { data: Rc::clone(&self.data), is_super: true }
  }

  /// This object as `self`: the full chain, super-ness cleared.
  #[must_use]
  pub fn as_self(&self) -> Object {
    Object { data: Rc::clone(&self.data), is_super: false }
  }

  /// A stable identity for the whole chain, used to guard against cyclic
  /// assert checking.
  #[must_use]
  pub fn identity(&self) -> usize {
    Rc::as_ptr(&self.data) as usize
  }

  fn ancestry(&self) -> impl Iterator<Item = &ObjectData> {
    let mut cur = Some(&self.data);
    std::iter::from_fn(move || {
      let data = cur?;
      cur = data.parent.as_ref().map(|obj| &obj.data);
      Some(&**data)
    })
  }

  /// Finds a field by name, most-derived link first. A `super` view skips
  /// the head link.
  #[must_use]
  pub fn get_field(&self, name: &str) -> Option<FieldSrc> {
    for (depth, data) in self.ancestry().enumerate() {
      if depth == 0 && self.is_super {
        continue;
      }
      match &data.kind {
        ObjectKind::Std => {
          if let Some(f) = StdFn::from_name(name) {
            return Some(FieldSrc::Std(f));
          }
        }
        ObjectKind::Lit(lit) => {
          if let Some(field) = lit.fields.get(name) {
            #[allow(clippy::cast_possible_truncation)]
            return Some(FieldSrc::Expr {
              depth: depth as u32,
              vis: field.vis,
              env: field.env.clone(),
              expr: field.expr,
            });
          }
        }
      }
    }
    None
  }

  /// Every field name with its final visibility after combination across the
  /// ancestry, in lexicographic order.
  #[must_use]
  pub fn fields(&self) -> Vec<(Str, Vis)> {
    let mut acc = BTreeMap::<Str, Vis>::new();
    let links: Vec<&ObjectData> = self
      .ancestry()
      .enumerate()
      .filter_map(|(depth, data)| (!(depth == 0 && self.is_super)).then_some(data))
      .collect();
    // deepest first, so each shallower link overrides what is under it
    for data in links.into_iter().rev() {
      match &data.kind {
        ObjectKind::Std => {
          for &f in StdFn::ALL {
            let name = Str::new(f.name());
            let vis = acc.get(&name).map_or(Vis::Hidden, |&base| Vis::combine(base, Vis::Hidden));
            acc.insert(name, vis);
          }
        }
        ObjectKind::Lit(lit) => {
          for (name, field) in &lit.fields {
            let vis =
              acc.get(name).map_or(field.vis, |&base| Vis::combine(base, field.vis));
            acc.insert(name.clone(), vis);
          }
        }
      }
    }
    acc.into_iter().collect()
  }

  /// Whether the object has the field, counting hidden fields only when
  /// `include_hidden`.
  #[must_use]
  pub fn has_field(&self, name: &str, include_hidden: bool) -> bool {
    if include_hidden {
      self.get_field(name).is_some()
    } else {
      self.fields().iter().any(|(n, vis)| n.as_str() == name && *vis != Vis::Hidden)
    }
  }

  /// The memoized thunk for a field, creating it with `mk` on first force.
  pub fn field_thunk<F>(&self, depth: u32, name: &Str, mk: F) -> Thunk
  where
    F: FnOnce() -> Thunk,
  {
    let mut cache = self.data.cache.borrow_mut();
    cache.entry((depth, name.clone())).or_insert_with(mk).clone()
  }

  /// Every assert in the ancestry, each with its env anchored on this whole
  /// object as `self`.
  #[must_use]
  pub fn asserts(&self) -> Vec<(Env, Assert)> {
    let mut out = Vec::new();
    for data in self.ancestry() {
      if let ObjectKind::Lit(lit) = &data.kind {
        for assert in &lit.asserts {
          out.push((lit.env.with_this(self), assert.clone()));
        }
      }
    }
    out
  }

  #[must_use]
  pub fn asserts_checked(&self) -> bool {
    self.data.asserts_checked.get()
  }

  pub fn set_asserts_checked(&self) {
    self.data.asserts_checked.set(true);
  }
}

/// A lazy array: a vector of thunks.
#[derive(Debug, Clone, Default)]
pub struct Array {
  elems: Vec<Thunk>,
}

impl Array {
  #[must_use]
  pub fn new(elems: Vec<Thunk>) -> Self {
    Self { elems }
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.elems.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.elems.is_empty()
  }

  #[must_use]
  pub fn get(&self, idx: usize) -> Option<&Thunk> {
    self.elems.get(idx)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Thunk> {
    self.elems.iter()
  }

  pub fn push(&mut self, thunk: Thunk) {
    self.elems.push(thunk);
  }

  pub fn append(&mut self, other: &mut Self) {
    self.elems.append(&mut other.elems);
  }
}

impl FromIterator<Thunk> for Array {
  fn from_iter<T: IntoIterator<Item = Thunk>>(iter: T) -> Self {
    Self { elems: iter.into_iter().collect() }
  }
}

/// A function.
#[derive(Debug, Clone)]
pub enum Fn {
  /// A regular user-written function.
  Regular(RegularFn),
  /// A standard library function.
  Std(StdFn),
}

/// A closure: the captured env, the parameters with optional defaults, and
/// the body.
#[derive(Debug, Clone)]
pub struct RegularFn {
  pub env: Env,
  pub params: Vec<(Id, Option<ExprId>)>,
  pub body: ExprId,
}
