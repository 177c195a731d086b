//! The standard library, called through the evaluator.

use crate::check::{exec_err, manifests_to};
use crate::dsl::{
  array, bin, call, call_named, field, func, null, num, obj, std_fn, str_, var, vis_field,
};
use serde_json::json;
use sonnet_core::{BinOp, Vis};

#[test]
fn type_of() {
  manifests_to(call(std_fn("type"), vec![array(Vec::new())]), json!("array"));
  manifests_to(call(std_fn("type"), vec![num(1.0)]), json!("number"));
  manifests_to(call(std_fn("type"), vec![null()]), json!("null"));
  manifests_to(call(std_fn("type"), vec![std_fn("length")]), json!("function"));
}

#[test]
fn predicates() {
  manifests_to(call(std_fn("isNumber"), vec![num(1.0)]), json!(true));
  manifests_to(call(std_fn("isString"), vec![num(1.0)]), json!(false));
  manifests_to(call(std_fn("isObject"), vec![obj(Vec::new())]), json!(true));
  manifests_to(call(std_fn("isFunction"), vec![std_fn("abs")]), json!(true));
}

#[test]
fn equals() {
  let mk = || obj(vec![field("a", array(vec![num(1.0)]))]);
  manifests_to(call(std_fn("equals"), vec![mk(), mk()]), json!(true));
  manifests_to(call(std_fn("equals"), vec![num(1.0), str_("1")]), json!(false));
}

#[test]
fn assert_equal_fails() {
  exec_err(call(std_fn("assertEqual"), vec![num(1.0), num(2.0)]), "assertion failed: 1 != 2");
}

#[test]
fn object_fields_sorted_visible_only() {
  let o = obj(vec![
    field("b", num(1.0)),
    field("a", num(2.0)),
    vis_field("c", Vis::Hidden, num(3.0)),
  ]);
  manifests_to(call(std_fn("objectFields"), vec![o]), json!(["a", "b"]));
}

#[test]
fn object_has() {
  let o = || obj(vec![vis_field("a", Vis::Hidden, num(1.0))]);
  manifests_to(call(std_fn("objectHas"), vec![o(), str_("a")]), json!(false));
  manifests_to(call(std_fn("objectHasAll"), vec![o(), str_("a")]), json!(true));
  manifests_to(call(std_fn("objectHasEx"), vec![o(), str_("a"), crate::dsl::bool_(true)]), json!(true));
}

#[test]
fn length() {
  manifests_to(call(std_fn("length"), vec![str_("héllo")]), json!(5));
  manifests_to(call(std_fn("length"), vec![array(vec![num(1.0), num(2.0)])]), json!(2));
  let o = obj(vec![field("a", num(1.0)), vis_field("h", Vis::Hidden, num(2.0))]);
  manifests_to(call(std_fn("length"), vec![o]), json!(1));
  manifests_to(call(std_fn("length"), vec![func(vec![("x", None), ("y", None)], num(0.0))]), json!(2));
}

#[test]
fn arithmetic() {
  manifests_to(call(std_fn("abs"), vec![num(-3.0)]), json!(3));
  manifests_to(call(std_fn("sign"), vec![num(-2.0)]), json!(-1));
  manifests_to(call(std_fn("max"), vec![num(2.0), num(3.0)]), json!(3));
  manifests_to(call(std_fn("min"), vec![num(2.0), num(3.0)]), json!(2));
  manifests_to(call(std_fn("pow"), vec![num(2.0), num(10.0)]), json!(1024));
  manifests_to(call(std_fn("floor"), vec![num(2.7)]), json!(2));
  manifests_to(call(std_fn("ceil"), vec![num(2.1)]), json!(3));
  manifests_to(call(std_fn("sqrt"), vec![num(9.0)]), json!(3));
  manifests_to(call(std_fn("mod"), vec![num(5.0), num(3.0)]), json!(2));
}

#[test]
fn exponent_mantissa() {
  manifests_to(call(std_fn("exponent"), vec![num(8.0)]), json!(4));
  manifests_to(call(std_fn("mantissa"), vec![num(8.0)]), json!(0.5));
  manifests_to(call(std_fn("exponent"), vec![num(0.0)]), json!(0));
}

#[test]
fn sqrt_of_negative_is_an_error() {
  exec_err(call(std_fn("sqrt"), vec![num(-1.0)]), "not a finite number: not a number");
}

#[test]
fn to_string() {
  manifests_to(call(std_fn("toString"), vec![str_("x")]), json!("x"));
  manifests_to(call(std_fn("toString"), vec![num(3.0)]), json!("3"));
  manifests_to(
    call(std_fn("toString"), vec![obj(vec![field("a", num(1.0))])]),
    json!("{\"a\": 1}"),
  );
}

#[test]
fn codepoint_char() {
  manifests_to(call(std_fn("codepoint"), vec![str_("a")]), json!(97));
  manifests_to(call(std_fn("char"), vec![num(97.0)]), json!("a"));
}

#[test]
fn substr() {
  manifests_to(call(std_fn("substr"), vec![str_("hello"), num(1.0), num(3.0)]), json!("ell"));
}

#[test]
fn starts_ends_with() {
  manifests_to(call(std_fn("startsWith"), vec![str_("hello"), str_("he")]), json!(true));
  manifests_to(call(std_fn("endsWith"), vec![str_("hello"), str_("lo")]), json!(true));
}

#[test]
fn strip_chars() {
  manifests_to(call(std_fn("stripChars"), vec![str_("  x "), str_(" ")]), json!("x"));
  manifests_to(call(std_fn("lstripChars"), vec![str_("xxa"), str_("x")]), json!("a"));
  manifests_to(call(std_fn("rstripChars"), vec![str_("axx"), str_("x")]), json!("a"));
}

#[test]
fn split() {
  manifests_to(call(std_fn("split"), vec![str_("a,b,c"), str_(",")]), json!(["a", "b", "c"]));
}

#[test]
fn str_replace() {
  manifests_to(
    call(std_fn("strReplace"), vec![str_("aXbX"), str_("X"), str_("-")]),
    json!("a-b-"),
  );
}

#[test]
fn ascii_case() {
  manifests_to(call(std_fn("asciiUpper"), vec![str_("aB")]), json!("AB"));
  manifests_to(call(std_fn("asciiLower"), vec![str_("aB")]), json!("ab"));
}

#[test]
fn string_chars() {
  manifests_to(call(std_fn("stringChars"), vec![str_("ab")]), json!(["a", "b"]));
}

#[test]
fn parse_numbers() {
  manifests_to(call(std_fn("parseInt"), vec![str_("-42")]), json!(-42));
  manifests_to(call(std_fn("parseHex"), vec![str_("ff")]), json!(255));
  manifests_to(call(std_fn("parseOctal"), vec![str_("755")]), json!(493));
  exec_err(call(std_fn("parseInt"), vec![str_("4.5")]), "parseInt: invalid integer \"4.5\"");
}

#[test]
fn utf8_round_trip() {
  manifests_to(call(std_fn("encodeUTF8"), vec![str_("hi")]), json!([104, 105]));
  let round = call(std_fn("decodeUTF8"), vec![call(std_fn("encodeUTF8"), vec![str_("hé")])]);
  manifests_to(round, json!("hé"));
}

#[test]
fn lines() {
  manifests_to(call(std_fn("lines"), vec![array(vec![str_("a"), str_("b")])]), json!("a\nb\n"));
}

#[test]
fn join() {
  manifests_to(
    call(std_fn("join"), vec![str_(","), array(vec![str_("a"), str_("b")])]),
    json!("a,b"),
  );
  // null elements are skipped
  manifests_to(
    call(std_fn("join"), vec![str_(","), array(vec![str_("a"), null(), str_("b")])]),
    json!("a,b"),
  );
  manifests_to(
    call(
      std_fn("join"),
      vec![array(vec![num(0.0)]), array(vec![array(vec![num(1.0)]), array(vec![num(2.0)])])],
    ),
    json!([1, 0, 2]),
  );
}

#[test]
fn make_array() {
  let double = func(vec![("i", None)], bin(var("i"), BinOp::Mul, num(2.0)));
  manifests_to(call(std_fn("makeArray"), vec![num(3.0), double]), json!([0, 2, 4]));
}

#[test]
fn member_count_find() {
  let arr = || array(vec![num(1.0), num(2.0), num(2.0)]);
  manifests_to(call(std_fn("member"), vec![arr(), num(2.0)]), json!(true));
  manifests_to(call(std_fn("member"), vec![str_("hello"), str_("ell")]), json!(true));
  manifests_to(call(std_fn("count"), vec![arr(), num(2.0)]), json!(2));
  manifests_to(call(std_fn("find"), vec![num(2.0), arr()]), json!([1, 2]));
}

#[test]
fn map_filter() {
  let inc = || func(vec![("x", None)], crate::dsl::add(var("x"), num(1.0)));
  manifests_to(
    call(std_fn("map"), vec![inc(), array(vec![num(1.0), num(2.0)])]),
    json!([2, 3]),
  );
  let gt1 = func(vec![("x", None)], bin(var("x"), BinOp::Gt, num(1.0)));
  manifests_to(
    call(std_fn("filter"), vec![gt1, array(vec![num(1.0), num(2.0), num(3.0)])]),
    json!([2, 3]),
  );
}

#[test]
fn map_with_index() {
  let f = func(vec![("i", None), ("x", None)], crate::dsl::add(var("x"), var("i")));
  manifests_to(
    call(std_fn("mapWithIndex"), vec![f, array(vec![num(10.0), num(20.0)])]),
    json!([10, 21]),
  );
}

#[test]
fn filter_map() {
  let keep = func(vec![("x", None)], bin(var("x"), BinOp::Gt, num(1.0)));
  let by10 = func(vec![("x", None)], bin(var("x"), BinOp::Mul, num(10.0)));
  manifests_to(
    call(std_fn("filterMap"), vec![keep, by10, array(vec![num(1.0), num(2.0), num(3.0)])]),
    json!([20, 30]),
  );
}

#[test]
fn flat_map() {
  let dup = func(vec![("x", None)], array(vec![var("x"), var("x")]));
  manifests_to(
    call(std_fn("flatMap"), vec![dup, array(vec![num(1.0), num(2.0)])]),
    json!([1, 1, 2, 2]),
  );
}

#[test]
fn folds() {
  let sum = func(vec![("acc", None), ("x", None)], crate::dsl::add(var("acc"), var("x")));
  manifests_to(
    call(std_fn("foldl"), vec![sum, array(vec![num(1.0), num(2.0), num(3.0)]), num(0.0)]),
    json!(6),
  );
  let sub = func(vec![("x", None), ("acc", None)], bin(var("x"), BinOp::Sub, var("acc")));
  manifests_to(
    call(std_fn("foldr"), vec![sub, array(vec![num(1.0), num(2.0), num(3.0)]), num(0.0)]),
    json!(2),
  );
}

#[test]
fn range() {
  manifests_to(call(std_fn("range"), vec![num(1.0), num(3.0)]), json!([1, 2, 3]));
  manifests_to(call(std_fn("range"), vec![num(3.0), num(1.0)]), json!([]));
}

#[test]
fn repeat() {
  manifests_to(call(std_fn("repeat"), vec![str_("ab"), num(2.0)]), json!("abab"));
  manifests_to(call(std_fn("repeat"), vec![array(vec![num(1.0)]), num(2.0)]), json!([1, 1]));
}

#[test]
fn reverse() {
  manifests_to(call(std_fn("reverse"), vec![array(vec![num(1.0), num(2.0)])]), json!([2, 1]));
}

#[test]
fn slice_direct_call() {
  manifests_to(
    call(std_fn("slice"), vec![str_("hello"), num(1.0), num(4.0), null()]),
    json!("ell"),
  );
  let arr = array(vec![num(1.0), num(2.0), num(3.0), num(4.0), num(5.0)]);
  manifests_to(call(std_fn("slice"), vec![arr, num(0.0), null(), num(2.0)]), json!([1, 3, 5]));
}

#[test]
fn slice_sugar() {
  manifests_to(
    crate::dsl::slice(str_("hello"), Some(num(1.0)), Some(num(4.0)), None),
    json!("ell"),
  );
  let arr = array(vec![num(1.0), num(2.0), num(3.0)]);
  manifests_to(crate::dsl::slice(arr, Some(num(1.0)), None, None), json!([2, 3]));
}

#[test]
fn slice_named_args() {
  let program = call_named(
    std_fn("slice"),
    Vec::new(),
    vec![
      ("indexable", str_("hello")),
      ("index", num(1.0)),
      ("end", num(4.0)),
      ("step", null()),
    ],
  );
  manifests_to(program, json!("ell"));
}

#[test]
fn flatten_arrays() {
  manifests_to(
    call(
      std_fn("flattenArrays"),
      vec![array(vec![array(vec![num(1.0)]), array(vec![num(2.0), num(3.0)])])],
    ),
    json!([1, 2, 3]),
  );
}

#[test]
fn manifest_json_ex() {
  let program = call(std_fn("manifestJsonEx"), vec![obj(vec![field("a", num(1.0))]), str_("    ")]);
  manifests_to(program, json!("{\n    \"a\": 1\n}"));
}

#[test]
fn manifest_yaml_doc() {
  let program = call(
    std_fn("manifestYamlDoc"),
    vec![obj(vec![field("a", num(1.0)), field("b", array(vec![num(1.0), num(2.0)]))])],
  );
  manifests_to(program, json!("\"a\": 1\n\"b\":\n  - 1\n  - 2"));
}

#[test]
fn wrong_argument_kind() {
  exec_err(call(std_fn("abs"), vec![str_("x")]), "type mismatch: expected number, found string");
  exec_err(
    call(std_fn("objectFields"), vec![num(1.0)]),
    "type mismatch: expected object, found number",
  );
}

#[test]
fn std_fn_missing_arg() {
  exec_err(
    call(std_fn("substr"), vec![str_("x")]),
    "parameter `from` was not defined at the function call site",
  );
}

#[test]
fn unknown_std_field() {
  exec_err(call(std_fn("noSuchFn"), vec![]), "no such field: noSuchFn");
}
