use super::*;
use crate::{
    error::TermError,
    expr::Param,
    value::{Value, ValueKind},
};
use std::cell::Cell;

///
/// IntRefusingConverter
/// Declares integers unsupported and records whether `convert` ran.
///

#[derive(Default)]
struct IntRefusingConverter {
    converted: Cell<bool>,
}

impl DatumConverterFactory for IntRefusingConverter {
    fn supports(&self, kind: ValueKind) -> bool {
        kind != ValueKind::Int
    }

    fn convert(&self, value: &Value) -> Result<Datum, ConvertError> {
        self.converted.set(true);
        DefaultConverterFactory::default().convert(value)
    }
}

#[test]
fn default_converter_maps_documents_to_ordered_objects() {
    let converter = DefaultConverterFactory::default();
    let value = Value::object([
        ("name", Value::from("ice")),
        ("age", Value::from(10)),
        ("tags", Value::list(["a", "b"])),
    ]);

    let datum = converter.convert(&value).expect("document should convert");
    let Datum::Object(object) = datum else {
        panic!("expected object datum");
    };

    let keys: Vec<_> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["age", "name", "tags"]);
    assert_eq!(object["age"], Datum::Number(10.0));
    assert_eq!(
        object["tags"],
        Datum::Array(vec![Datum::string("a"), Datum::string("b")])
    );
}

#[test]
fn default_converter_rejects_unrepresentable_values() {
    let converter = DefaultConverterFactory::default();

    let err = converter.convert(&Value::Float(f64::NAN)).unwrap_err();
    assert_eq!(err.kind, ValueKind::Float);
    assert_eq!(err.target, "number");

    let err = converter.convert(&Value::Uint(u64::MAX)).unwrap_err();
    assert_eq!(err.kind, ValueKind::Uint);

    let err = converter
        .convert(&Value::Map(vec![(Value::Int(1), Value::Null)]))
        .unwrap_err();
    assert_eq!(err.target, "object");

    let err = converter
        .convert(&Value::object([("a", 1), ("a", 2)]))
        .unwrap_err();
    assert!(err.reason.contains("duplicate key"));
}

#[test]
fn lossy_integers_can_be_allowed() {
    let converter = DefaultConverterFactory::new(ConverterConfig {
        allow_lossy_integers: true,
        ..ConverterConfig::default()
    });

    assert!(converter.convert(&Value::Int(i64::MIN)).is_ok());
}

#[test]
fn nesting_beyond_limit_is_rejected() {
    let converter = DefaultConverterFactory::new(ConverterConfig {
        max_depth: 2,
        ..ConverterConfig::default()
    });
    let nested = Value::List(vec![Value::List(vec![Value::List(vec![Value::Null])])]);

    let err = converter.convert(&nested).unwrap_err();
    assert!(err.reason.contains("nesting"));
}

#[test]
fn context_checks_support_before_converting() {
    let converter = DefaultConverterFactory::default();
    let ctx = TermContext::new(&converter);

    let err = ctx.literal(&Value::Blob(vec![1, 2])).unwrap_err();
    assert_eq!(
        err,
        TermError::Convert(ConvertError::unsupported(ValueKind::Blob))
    );
    assert!(err.to_string().starts_with("value not convertible: blob"));
}

#[test]
fn context_checks_support_of_nested_kinds() {
    let converter = IntRefusingConverter::default();
    let ctx = TermContext::new(&converter);

    let err = ctx.literal(&Value::list([1_i64])).unwrap_err();
    assert_eq!(err, TermError::Convert(ConvertError::unsupported(ValueKind::Int)));

    let keyed = Value::Map(vec![(Value::Int(1), Value::from("x"))]);
    let err = ctx.literal(&keyed).unwrap_err();
    assert_eq!(err, TermError::Convert(ConvertError::unsupported(ValueKind::Int)));

    let deep = Value::object([("a", Value::list([Value::list([2_i64])]))]);
    assert!(ctx.literal(&deep).is_err());
    assert!(!converter.converted.get());

    let term = ctx.literal(&Value::list(["a", "b"])).unwrap();
    assert_eq!(
        term,
        Term::datum(Datum::Array(vec![Datum::string("a"), Datum::string("b")]))
    );
    assert!(converter.converted.get());
}

#[test]
fn scopes_resolve_innermost_binding_first() {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);
    let (outer, inner) = (Param::fresh(), Param::fresh());

    assert_eq!(ctx.enter_scope(&[outer]), vec![1]);
    assert_eq!(ctx.enter_scope(&[inner, outer]), vec![2, 3]);
    assert_eq!(ctx.resolve(outer), Some(3));
    assert_eq!(ctx.resolve(inner), Some(2));

    ctx.exit_scope(2);
    assert_eq!(ctx.resolve(outer), Some(1));
    assert_eq!(ctx.resolve(inner), None);

    ctx.exit_scope(1);
    assert_eq!(ctx.resolve(outer), None);
}

#[test]
fn context_allocates_variables_in_order() {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);

    assert_eq!(ctx.fresh_var(), 1);
    assert_eq!(ctx.fresh_var(), 2);
    assert_eq!(ctx.fresh_var(), 3);
}

#[test]
fn optargs_are_name_ordered_and_ignored_on_datums() {
    let term = Term::apply(TermKind::Between, vec![])
        .with_optarg("right_bound", Term::datum(Datum::string("open")))
        .with_optarg("index", Term::datum(Datum::string("age")));

    let Term::Apply { optargs, .. } = &term else {
        panic!("expected apply node");
    };
    let names: Vec<_> = optargs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["index", "right_bound"]);

    let leaf = Term::datum(Datum::Null).with_optarg("index", Term::datum(Datum::Null));
    assert_eq!(leaf.optarg("index"), None);
}

#[test]
fn fingerprint_tracks_structure() {
    let a = Term::apply(TermKind::Limit, vec![Term::datum(Datum::Number(10.0))]);
    let b = Term::apply(TermKind::Limit, vec![Term::datum(Datum::Number(10.0))]);
    let c = Term::apply(TermKind::Skip, vec![Term::datum(Datum::Number(10.0))]);

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().as_hex().len(), 64);
}

#[test]
fn term_kind_tags_are_stable() {
    assert_eq!(TermKind::Datum.tag(), 1);
    assert_eq!(TermKind::Table.tag(), 15);
    assert_eq!(TermKind::Filter.tag(), 39);
    assert_eq!(TermKind::GetAll.tag(), 78);
}

#[test]
fn term_serializes() {
    let term = Term::apply(TermKind::Table, vec![Term::datum(Datum::string("users"))]);
    let json = serde_json::to_string(&term).expect("term should serialize");

    assert!(json.contains("Table"));
    assert!(json.contains("users"));
}
