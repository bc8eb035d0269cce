use pretty_assertions::assert_eq;

use super::*;
use crate::{RecordValue, TypeRegistry};

#[test]
fn equal_strings_share_one_allocation() {
    let mut table = ValueTable::new();
    let first = table.intern(Value::string("hello"));
    let second = table.intern(Value::string("hello"));
    assert!(first.ptr_eq(&second));
    assert_eq!(table.len(), 1);
}

#[test]
fn numbers_intern_across_representations() {
    let mut table = ValueTable::new();
    let integer = table.intern(Value::integer(7));
    let real = table.intern(Value::real(7.0));
    assert!(integer.ptr_eq(&real));
    assert_eq!(table.len(), 1);
}

#[test]
fn records_pass_through() {
    let mut registry = TypeRegistry::new();
    let Ok(ty) = registry.create_record(&[("x", crate::TypeId::NUMBER)]) else {
        panic!("record type");
    };
    let Ok(record) = RecordValue::create(&registry, ty, &[Value::integer(1)]) else {
        panic!("record value");
    };
    let record = Value::record(record);
    let mut table = ValueTable::new();
    let interned = table.intern(record.clone());
    assert!(interned.ptr_eq(&record));
    assert!(table.is_empty());
}

#[test]
fn purge_drops_unreferenced_entries() {
    let mut table = ValueTable::new();
    let kept = table.intern(Value::string("kept"));
    table.intern(Value::string("dropped"));
    table.purge();
    assert_eq!(table.len(), 1);
    assert!(table.get(&kept).is_some_and(|value| value.ptr_eq(&kept)));
}
