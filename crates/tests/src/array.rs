use crate::check::{exec_err, manifests_to};
use crate::dsl::{add, array, index, num, str_};
use serde_json::json;

#[test]
fn literal() {
  manifests_to(array(vec![num(1.0), num(2.0)]), json!([1, 2]));
}

#[test]
fn nested() {
  manifests_to(array(vec![array(Vec::new()), array(vec![num(1.0)])]), json!([[], [1]]));
}

#[test]
fn indexing() {
  manifests_to(index(array(vec![num(1.0), num(2.0), num(3.0)]), num(0.0)), json!(1));
  manifests_to(index(array(vec![num(1.0), num(2.0), num(3.0)]), num(2.0)), json!(3));
}

#[test]
fn out_of_bounds() {
  exec_err(index(array(vec![num(1.0)]), num(5.0)), "index out of bounds: 5");
}

#[test]
fn negative_index() {
  exec_err(index(array(vec![num(1.0)]), num(-1.0)), "index out of bounds: -1");
}

#[test]
fn non_integer_index() {
  exec_err(index(array(vec![num(1.0)]), num(0.5)), "invalid index of type non-integer number");
}

#[test]
fn string_key_on_array() {
  exec_err(index(array(vec![num(1.0)]), str_("a")), "invalid index of type string");
}

#[test]
fn concat() {
  manifests_to(add(array(vec![num(1.0)]), array(vec![num(2.0)])), json!([1, 2]));
}

#[test]
fn string_indexing() {
  manifests_to(index(str_("abc"), num(1.0)), json!("b"));
}

#[test]
fn string_index_out_of_bounds() {
  exec_err(index(str_("abc"), num(9.0)), "index out of bounds: 9");
}
