// Policy behavior matrix, including what gets logged
mod common;

use common::{capture, document, Captured};
use log::Level;
use std::io::Cursor;
use tmx_codec::errors::{DeserializationError, SerializationError};
use tmx_codec::policy::{
    DuplicateBehavior, MissingTextBehavior, PolicyValue, RaiseOrIgnore,
};
use tmx_codec::{
    DeserializationPolicy, Error, Loader, Note, Prop, Result, Saver, SerializationPolicy, Tmx,
};

fn load(xml: &str, policy: DeserializationPolicy) -> Result<Tmx> {
    Loader::new().policy(policy).load_reader(Cursor::new(xml.to_string()))
}

fn at(records: &[Captured], level: Level) -> Vec<&Captured> {
    records.iter().filter(|record| record.level == level).collect()
}

fn with_missing_text(behavior: MissingTextBehavior) -> DeserializationPolicy {
    DeserializationPolicy {
        missing_text: PolicyValue::new(behavior, Level::Warn),
        ..DeserializationPolicy::default()
    }
}

const EMPTY_NOTE: &str = r#"<tu><note/><note>kept</note></tu>"#;

#[test]
fn test_missing_text_raise() {
    let (result, records) = capture(|| load(&document(EMPTY_NOTE), with_missing_text(MissingTextBehavior::Raise)));
    assert!(matches!(
        result,
        Err(Error::Deserialization(DeserializationError::MissingText { ref tag })) if tag == "note"
    ));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Warn);
}

#[test]
fn test_missing_text_ignore_keeps_note() {
    let units = r#"<tu><note xml:lang="de"/><note>kept</note></tu>"#;
    let (result, records) = capture(|| load(&document(units), with_missing_text(MissingTextBehavior::Ignore)));
    let tmx = result.unwrap();
    let notes = &tmx.body[0].notes;
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].text, None);
    assert_eq!(notes[0].lang.as_deref(), Some("de"));
    assert_eq!(notes[1], Note::new("kept"));
    assert_eq!(at(&records, Level::Warn).len(), 1);
    assert_eq!(records[0].message, "<note> has no text content");
}

#[test]
fn test_missing_text_empty() {
    let (result, records) = capture(|| load(&document(EMPTY_NOTE), with_missing_text(MissingTextBehavior::Empty)));
    let tmx = result.unwrap();
    assert_eq!(tmx.body[0].notes, vec![Note::new(""), Note::new("kept")]);
    assert_eq!(records.len(), 1);
}

#[test]
fn test_configured_level_is_used() {
    let policy = DeserializationPolicy {
        missing_text: PolicyValue::new(MissingTextBehavior::Empty, Level::Info),
        ..DeserializationPolicy::default()
    };
    let (_, records) = capture(|| load(&document(EMPTY_NOTE), policy));
    assert_eq!(at(&records, Level::Info).len(), 1);
    assert!(at(&records, Level::Warn).is_empty());
}

#[test]
fn test_prop_without_type() {
    let err = load(&document(r#"<tu><prop>v</prop></tu>"#), DeserializationPolicy::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Deserialization(DeserializationError::MissingAttribute { ref tag, ref attribute })
            if tag == "prop" && attribute == "type"
    ));
}

#[test]
fn test_enum_rejection_logged_once() {
    let xml = r#"<tmx version="1.4"><header creationtool="t" creationtoolversion="1" segtype="not-a-type" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/><body/></tmx>"#;
    let (result, records) = capture(|| load(xml, DeserializationPolicy::default()));

    let Err(Error::Deserialization(DeserializationError::InvalidAttributeValue { attribute, value, cause, .. })) = result else {
        panic!("expected an invalid attribute value");
    };
    assert_eq!(attribute, "segtype");
    assert_eq!(value, "not-a-type");
    assert!(cause.is_some());
    assert_eq!(at(&records, Level::Error).len(), 1);
    assert_eq!(records.len(), 1);
}

#[test]
fn test_lenient_recovers_everything() {
    let units = r#"
        <tu usagecount="many" segtype="word">
            <prop>untyped</prop>
            <foo/>
            <tuv><seg>no lang</seg></tuv>
            <tuv xml:lang="en"><seg>one</seg><seg>two</seg></tuv>
            <tuv xml:lang="fr"/>
        </tu>"#;
    let (result, records) = capture(|| load(&document(units), DeserializationPolicy::lenient()));
    let tmx = result.unwrap();
    let tu = &tmx.body[0];

    assert_eq!(tu.usagecount, None);
    assert_eq!(tu.segtype, None);
    assert!(tu.props.is_empty());
    assert_eq!(tu.variants.len(), 2);
    assert_eq!(tu.variants[0].plain_text(), "one");
    assert!(tu.variants[1].content.is_empty());

    // usagecount, segtype, prop type, foo, tuv lang, second seg, missing seg
    assert_eq!(at(&records, Level::Warn).len(), 7);
}

#[test]
fn test_duplicate_header_keep_last() {
    let xml = r#"<tmx version="1.4">
        <header creationtool="first" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/>
        <header creationtool="second" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/>
        <body/>
    </tmx>"#;
    let policy = DeserializationPolicy {
        multiple_headers: PolicyValue::new(DuplicateBehavior::KeepLast, Level::Warn),
        ..DeserializationPolicy::default()
    };
    assert_eq!(load(xml, policy).unwrap().header.creationtool, "second");

    let err = load(xml, DeserializationPolicy::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Deserialization(DeserializationError::DuplicateChild { ref child, .. }) if child == "header"
    ));
}

#[test]
fn test_missing_body() {
    let xml = r#"<tmx version="1.4"><header creationtool="t" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/></tmx>"#;
    assert!(matches!(
        load(xml, DeserializationPolicy::default()),
        Err(Error::Deserialization(DeserializationError::MissingChild { .. }))
    ));
    let policy = DeserializationPolicy {
        missing_body: PolicyValue::new(RaiseOrIgnore::Ignore, Level::Warn),
        ..DeserializationPolicy::default()
    };
    assert!(load(xml, policy).unwrap().body.is_empty());
}

#[test]
fn test_serialization_policy_logs_once() {
    let mut tmx = Tmx::new(common::header());
    tmx.header.props.push(Prop::new("", "orphan"));

    let (result, records) = capture(|| Saver::new().write(&tmx, Vec::new()));
    assert!(matches!(
        result,
        Err(Error::Serialization(SerializationError::MissingAttribute { .. }))
    ));
    assert_eq!(at(&records, Level::Error).len(), 1);

    let (result, records) = capture(|| {
        let mut out = Vec::new();
        Saver::new()
            .policy(SerializationPolicy::lenient())
            .write(&tmx, &mut out)
            .map(|()| String::from_utf8(out).unwrap())
    });
    assert!(result.unwrap().contains("<prop>orphan</prop>"));
    assert_eq!(at(&records, Level::Warn).len(), 1);
}
