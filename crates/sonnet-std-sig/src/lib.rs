//! The names, parameter names, and argument kinds of the standard library
//! functions.
//!
//! This is pure data: the implementations live in the evaluator. The argument
//! kinds are what the evaluator checks before dispatch, so a call with a
//! wrongly-typed argument fails with a type mismatch naming the expected
//! kind.

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
  /// Its name, usable as a named argument.
  pub name: &'static str,
  /// The kind of value it accepts.
  pub kind: Kind,
}

/// The expected kind of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
  Any,
  Bool,
  Num,
  Str,
  Arr,
  Obj,
  Fn,
  StrOrArr,
  NumOrNull,
}

impl Kind {
  /// The name reported in type mismatches.
  #[must_use]
  pub fn description(self) -> &'static str {
    match self {
      Kind::Any => "any",
      Kind::Bool => "boolean",
      Kind::Num => "number",
      Kind::Str => "string",
      Kind::Arr => "array",
      Kind::Obj => "object",
      Kind::Fn => "function",
      Kind::StrOrArr => "string or array",
      Kind::NumOrNull => "number or null",
    }
  }
}

macro_rules! std_fns {
  ( $( $variant:ident / $name:literal ( $( $pname:literal : $kind:ident ),* ), )* ) => {
    /// A standard library function.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StdFn {
      $( $variant, )*
    }

    impl StdFn {
      /// Every standard library function, in declaration order.
      pub const ALL: &'static [StdFn] = &[ $( StdFn::$variant, )* ];

      /// The `std` field name of this function.
      #[must_use]
      pub fn name(self) -> &'static str {
        match self {
          $( StdFn::$variant => $name, )*
        }
      }

      /// The parameters, in declaration order. All are required.
      #[must_use]
      pub fn params(self) -> &'static [Param] {
        match self {
          $( StdFn::$variant => &[ $( Param { name: $pname, kind: Kind::$kind }, )* ], )*
        }
      }

      /// Looks a function up by its `std` field name.
      #[must_use]
      pub fn from_name(s: &str) -> Option<Self> {
        match s {
          $( $name => Some(StdFn::$variant), )*
          _ => None,
        }
      }
    }
  };
}

std_fns! {
  // type predicates
  Type / "type"("x": Any),
  IsString / "isString"("v": Any),
  IsBoolean / "isBoolean"("v": Any),
  IsNumber / "isNumber"("v": Any),
  IsObject / "isObject"("v": Any),
  IsArray / "isArray"("v": Any),
  IsFunction / "isFunction"("v": Any),
  // equality
  Equals / "equals"("a": Any, "b": Any),
  AssertEqual / "assertEqual"("a": Any, "b": Any),
  // object introspection
  ObjectFields / "objectFields"("o": Obj),
  ObjectHas / "objectHas"("o": Obj, "f": Str),
  ObjectHasEx / "objectHasEx"("o": Obj, "f": Str, "inc_hidden": Bool),
  ObjectHasAll / "objectHasAll"("o": Obj, "f": Str),
  // length
  Length / "length"("x": Any),
  // arithmetic
  Abs / "abs"("n": Num),
  Sign / "sign"("n": Num),
  Max / "max"("a": Num, "b": Num),
  Min / "min"("a": Num, "b": Num),
  Pow / "pow"("x": Num, "n": Num),
  Exp / "exp"("n": Num),
  Log / "log"("n": Num),
  Exponent / "exponent"("n": Num),
  Mantissa / "mantissa"("n": Num),
  Floor / "floor"("n": Num),
  Ceil / "ceil"("n": Num),
  Sqrt / "sqrt"("n": Num),
  Sin / "sin"("n": Num),
  Cos / "cos"("n": Num),
  Tan / "tan"("n": Num),
  Asin / "asin"("n": Num),
  Acos / "acos"("n": Num),
  Atan / "atan"("n": Num),
  Mod / "mod"("a": Num, "b": Num),
  // strings
  ToString / "toString"("a": Any),
  Codepoint / "codepoint"("str": Str),
  Char / "char"("n": Num),
  Substr / "substr"("str": Str, "from": Num, "len": Num),
  StartsWith / "startsWith"("a": Str, "b": Str),
  EndsWith / "endsWith"("a": Str, "b": Str),
  StripChars / "stripChars"("str": Str, "chars": Str),
  LstripChars / "lstripChars"("str": Str, "chars": Str),
  RstripChars / "rstripChars"("str": Str, "chars": Str),
  Split / "split"("str": Str, "c": Str),
  StrReplace / "strReplace"("str": Str, "from": Str, "to": Str),
  AsciiLower / "asciiLower"("str": Str),
  AsciiUpper / "asciiUpper"("str": Str),
  StringChars / "stringChars"("str": Str),
  ParseInt / "parseInt"("str": Str),
  ParseOctal / "parseOctal"("str": Str),
  ParseHex / "parseHex"("str": Str),
  EncodeUtf8 / "encodeUTF8"("str": Str),
  DecodeUtf8 / "decodeUTF8"("arr": Arr),
  Lines / "lines"("arr": Arr),
  Join / "join"("sep": StrOrArr, "arr": Arr),
  // arrays
  MakeArray / "makeArray"("sz": Num, "func": Fn),
  Member / "member"("arr": StrOrArr, "x": Any),
  Count / "count"("arr": Arr, "x": Any),
  Find / "find"("value": Any, "arr": Arr),
  Map / "map"("func": Fn, "arr": Arr),
  MapWithIndex / "mapWithIndex"("func": Fn, "arr": Arr),
  FilterMap / "filterMap"("filter_func": Fn, "map_func": Fn, "arr": Arr),
  FlatMap / "flatMap"("func": Fn, "arr": Arr),
  Filter / "filter"("func": Fn, "arr": Arr),
  Foldl / "foldl"("func": Fn, "arr": Arr, "init": Any),
  Foldr / "foldr"("func": Fn, "arr": Arr, "init": Any),
  Range / "range"("from": Num, "to": Num),
  Repeat / "repeat"("what": StrOrArr, "count": Num),
  Reverse / "reverse"("arr": Arr),
  Slice / "slice"("indexable": StrOrArr, "index": NumOrNull, "end": NumOrNull, "step": NumOrNull),
  FlattenArrays / "flattenArrays"("arrs": Arr),
  // manifestation
  ManifestYamlDoc / "manifestYamlDoc"("value": Any),
  ManifestJsonEx / "manifestJsonEx"("value": Any, "indent": Str),
}
