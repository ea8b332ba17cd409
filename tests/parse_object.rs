mod common;

use anyhow::Result;
use chrono::NaiveDate;
use indoc::indoc;
use yamlify::{Binding, Error, Field, YamlParser, Yamlify, from_reader, from_str};

use common::{City, NewStudent, Student};

#[test]
fn parse_student() -> Result<()> {
    let yaml = indoc! {"
        name: Maria Candida
        nr: 873435
        from: Oleiros
    "};
    let st: Student = from_str(yaml)?;
    assert_eq!(st.name, "Maria Candida");
    assert_eq!(st.nr, 873435);
    assert_eq!(st.from, "Oleiros");
    assert_eq!(st.address, None);
    assert!(st.grades.is_empty());
    assert_eq!(st.birth, None);
    Ok(())
}

#[test]
fn alias_is_accepted_as_source_key() -> Result<()> {
    let yaml = indoc! {"
        name: Maria Candida
        origin: Oleiros
        nr: 873435
    "};
    let st: Student = from_str(yaml)?;
    assert_eq!(st.from, "Oleiros");
    Ok(())
}

#[derive(Debug)]
struct Pair {
    a: u32,
    c: u32,
}

impl Yamlify for Pair {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Pair")
            .field(Field::<u32>::new("a").alias("b"))
            .field(Field::<u32>::new("c"))
            .construct(|args| Ok(Pair { a: args.take()?, c: args.take()? }))
    }
}

#[test]
fn name_and_alias_together_count_once() -> Result<()> {
    let pair: Pair = from_str("a: 1\nb: 2\nc: 3\n")?;
    assert_eq!((pair.a, pair.c), (2, 3));

    let pair: Pair = from_str("b: 2\nc: 3\na: 1\n")?;
    assert_eq!((pair.a, pair.c), (1, 3));
    Ok(())
}

#[test]
fn converter_builds_the_date() -> Result<()> {
    let yaml = indoc! {"
        name: Maria Candida
        from: Oleiros
        nr: 873435
        birth: 1999-12-12
    "};
    let st: Student = from_str(yaml)?;
    assert_eq!(st.birth, NaiveDate::from_ymd_opt(1999, 12, 12));
    Ok(())
}

#[test]
fn default_fills_absent_converted_field() -> Result<()> {
    let yaml = indoc! {"
        name: Maria Candida
        from: Oleiros
        nr: 873435
    "};
    let st: NewStudent = from_str(yaml)?;
    assert_eq!(st.birth, common::enrollment_day());
    Ok(())
}

#[test]
fn nested_objects_two_levels_deep() -> Result<()> {
    let yaml = indoc! {"
        name: Maria Candida
        nr: 873435
        address:
          street: Rua Rosa
          nr: 78
          city:
            name: Lisbon
            country: Portugal
        from: Oleiros
    "};
    let st: NewStudent = from_str(yaml)?;
    assert_eq!(st.from, "Oleiros");
    let address = st.address.expect("address");
    assert_eq!(address.street, "Rua Rosa");
    assert_eq!(address.nr, 78);
    assert_eq!(
        address.city,
        City {
            name: "Lisbon".into(),
            country: "Portugal".into(),
        }
    );
    Ok(())
}

#[test]
fn unknown_key_is_rejected() {
    let yaml = indoc! {"
        name: Maria Candida
        country: Oleiros
        nr: 873435
    "};
    let err = from_str::<Student>(yaml).unwrap_err();
    match err.without_snippet() {
        Error::UnknownKey { type_name, key, location } => {
            assert_eq!(*type_name, "Student");
            assert_eq!(key, "country");
            assert_eq!(location.line(), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_properties_fail_the_arity_check() {
    let yaml = indoc! {"
        name: Maria Candida
        from: Oleiros
    "};
    let err = from_str::<Student>(yaml).unwrap_err();
    match err.without_snippet() {
        Error::ArityMismatch { supplied, mandatory, total, .. } => {
            assert_eq!((*supplied, *mandatory, *total), (2, 3, 6));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn mandatory_field_replaced_by_optionals_is_missing() {
    // Three keys satisfy the arity but `nr` is still absent.
    let yaml = indoc! {"
        name: Maria Candida
        from: Oleiros
        birth: 1999-12-12
    "};
    let err = from_str::<Student>(yaml).unwrap_err();
    assert!(err.is_shape_error());
    match err.without_snippet() {
        Error::MissingField { field, .. } => assert_eq!(*field, "nr"),
        other => panic!("unexpected error: {other:?}"),
    }
}

struct Window {
    width: u32,
    height: u32,
    title: String,
    resizable: bool,
}

impl Yamlify for Window {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Window")
            .field(Field::<u32>::new("width"))
            .field(Field::<u32>::new("height"))
            .field(Field::<String>::new("title").default_with(|| "untitled".to_owned()))
            .field(Field::<bool>::new("resizable").optional())
            .construct(|args| {
                Ok(Window {
                    width: args.take()?,
                    height: args.take()?,
                    title: args.take()?,
                    resizable: args.take()?,
                })
            })
    }
}

#[test]
fn record_bindings_describe_their_parameters() -> Result<()> {
    let parser = YamlParser::<Window>::new()?;
    let binding = parser.binding();
    assert!(!binding.is_scalar());
    assert_eq!(binding.arity(), Some(2..=4));
    assert!(binding.accepts("title"));
    assert!(!binding.accepts("depth"));

    let student = YamlParser::<Student>::new()?;
    assert!(student.binding().accepts("from"));
    assert!(student.binding().accepts("origin"));

    let number = YamlParser::<u32>::new()?;
    assert_eq!(number.binding().arity(), None);
    assert!(!number.binding().accepts("nr"));
    Ok(())
}

#[test]
fn arity_law_holds_at_its_bounds() -> Result<()> {
    let below = from_str::<Window>("width: 640\n");
    assert!(matches!(
        below.map_err(Error::into_inner),
        Err(Error::ArityMismatch { supplied: 1, mandatory: 2, total: 4, .. })
    ));

    let at_mandatory: Window = from_str("width: 640\nheight: 480\n")?;
    assert_eq!(at_mandatory.title, "untitled");
    assert!(!at_mandatory.resizable);

    let at_total: Window = from_str(indoc! {"
        width: 640
        height: 480
        title: Editor
        resizable: yes
    "})?;
    assert_eq!((at_total.width, at_total.height), (640, 480));
    assert_eq!(at_total.title, "Editor");
    assert!(at_total.resizable);
    Ok(())
}

#[derive(Debug)]
struct Ticket {
    nr: i32,
}

impl Yamlify for Ticket {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Ticket")
            .field(Field::<i32>::new("nr").converter(|text| text.parse::<i32>().map(|n| n * 10)))
            .construct(|args| Ok(Ticket { nr: args.take()? }))
    }
}

#[test]
fn converter_wins_over_derived_coercion() -> Result<()> {
    let ticket: Ticket = from_str("nr: 7\n")?;
    assert_eq!(ticket.nr, 70);
    Ok(())
}

#[test]
fn converter_applied_to_a_block_fails() {
    let yaml = indoc! {"
        nr:
          value: 7
    "};
    let err = from_str::<Ticket>(yaml).unwrap_err();
    assert!(matches!(err.without_snippet(), Error::ConversionFailure { .. }));
}

#[test]
fn scalar_for_nested_object_fails() {
    let yaml = indoc! {"
        name: Maria Candida
        nr: 873435
        from: Oleiros
        address: Rua Rosa
    "};
    let err = from_str::<Student>(yaml).unwrap_err();
    match err.without_snippet() {
        Error::ConversionFailure { value, target, location, .. } => {
            assert_eq!(value, "Rua Rosa");
            assert_eq!(*target, "Address");
            assert_eq!((location.line(), location.column()), (4, 10));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unparsable_integer_reports_its_text() {
    let err = from_str::<Student>("name: Maria\nnr: many\nfrom: Oleiros\n").unwrap_err();
    match err.without_snippet() {
        Error::ConversionFailure { value, target, .. } => {
            assert_eq!(value, "many");
            assert_eq!(*target, "u32");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[derive(Debug)]
struct Opaque;

impl Yamlify for Opaque {}

#[derive(Debug)]
struct Holder {
    _opaque: Opaque,
}

impl Yamlify for Holder {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Holder")
            .field(Field::<Opaque>::new("opaque"))
            .construct(|args| Ok(Holder { _opaque: args.take()? }))
    }
}

#[test]
fn type_without_constructor_is_unsupported() {
    assert!(matches!(YamlParser::<Opaque>::new(), Err(Error::UnsupportedType { .. })));
    // Nested types are resolved when first coerced.
    let err = from_str::<Holder>("opaque: x\n").unwrap_err();
    assert!(matches!(err.without_snippet(), Error::UnsupportedType { .. }));
}

struct Clashing;

impl Yamlify for Clashing {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Clashing")
            .field(Field::<String>::new("from"))
            .field(Field::<String>::new("origin").alias("from"))
            .construct(|_| Ok(Clashing))
    }
}

#[test]
fn colliding_source_keys_are_unsupported() {
    match YamlParser::<Clashing>::new() {
        Err(Error::UnsupportedType { type_name, reason }) => {
            assert_eq!(type_name, "Clashing");
            assert!(reason.contains("from"), "{reason}");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[derive(Debug)]
struct Even(u32);

impl Yamlify for Even {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Even")
            .field(Field::<u32>::new("value"))
            .construct(|args| {
                let value: u32 = args.take()?;
                if value % 2 == 0 {
                    Ok(Even(value))
                } else {
                    Err(Error::custom(format!("{value} is odd")))
                }
            })
    }
}

#[test]
fn constructor_failures_propagate() {
    let err = from_str::<Even>("value: 3\n").unwrap_err();
    match err.without_snippet() {
        Error::Message { msg, location } => {
            assert_eq!(msg, "3 is odd");
            assert_eq!(location.line(), 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(from_str::<Even>("value: 4\n").map(|e| e.0).ok(), Some(4));
}

#[derive(Debug)]
struct Greedy;

impl Yamlify for Greedy {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Greedy")
            .field(Field::<u32>::new("a"))
            .construct(|args| {
                let _: u32 = args.take()?;
                assert_eq!(args.remaining(), 0);
                let _: u32 = args.take()?;
                Ok(Greedy)
            })
    }
}

#[test]
fn taking_too_many_arguments_is_an_error() {
    let err = from_str::<Greedy>("a: 1\n").unwrap_err();
    assert!(matches!(err.without_snippet(), Error::Message { .. }));
}

#[test]
fn duplicate_keys_keep_the_last_value() -> Result<()> {
    let st: Student = from_str("name: A\nnr: 1\nfrom: X\nnr: 2\n")?;
    assert_eq!(st.nr, 2);
    Ok(())
}

#[test]
fn reader_input_is_decoded() -> Result<()> {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice("name: João\nnr: 1\nfrom: Évora\n".as_bytes());
    let st: Student = from_reader(bytes.as_slice())?;
    assert_eq!(st.name, "João");
    assert_eq!(st.from, "Évora");
    Ok(())
}

#[test]
fn empty_document_is_malformed() {
    let err = from_str::<Student>("\n   \n").unwrap_err();
    assert!(matches!(err.without_snippet(), Error::MalformedDocument { .. }));
}
