use super::*;
use crate::backend::DomBackend;
use crate::errors::SerializationError;
use crate::model::{Segtype, Tuv};
use crate::policy::{PolicyValue, RaiseOrIgnore};
use log::Level;
use std::io::Cursor;
use tempfile::TempDir;

const MINIMAL: &str = r#"<tmx version="1.4"><header creationtool="t" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/><body/></tmx>"#;

fn header() -> Header {
    Header::new("t", "1", Segtype::Sentence, "f", "en", "en", "plain")
}

#[test]
fn test_load_minimal_document() {
    let tmx = Loader::new().load_reader(Cursor::new(MINIMAL)).unwrap();
    assert_eq!(tmx.header.creationtool, "t");
    assert_eq!(tmx.header.tmf, "f");
    assert!(tmx.body.is_empty());
}

#[test]
fn test_save_then_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/out.tmx");
    let tmx = Tmx::new(header()).with_unit(Tu::new().with_tuid("1").with_variant(Tuv::new("en").with_part("hi")));

    save(&tmx, &path).unwrap();
    assert_eq!(load(&path).unwrap(), tmx);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tmx version=\"1.4\">"));
}

#[test]
fn test_failed_save_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.tmx");
    let good = Tmx::new(header()).with_unit(Tu::new().with_tuid("1"));
    save(&good, &path).unwrap();
    let before = fs::read(&path).unwrap();

    let mut bad = good.clone();
    bad.header.creationtool = String::new();
    assert!(matches!(
        save(&bad, &path),
        Err(Error::Serialization(SerializationError::MissingAttribute { .. }))
    ));
    assert!(matches!(
        Saver::new().encoding("ebcdic-37").save(&good, &path),
        Err(Error::Backend(BackendError::UnsupportedEncoding(_)))
    ));

    assert_eq!(fs::read(&path).unwrap(), before);
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.tmx");
    fs::write(&path, "old contents").unwrap();

    let tmx = Tmx::new(header()).with_unit(Tu::new().with_tuid("new"));
    save(&tmx, &path).unwrap();
    assert_eq!(load(&path).unwrap(), tmx);
}

#[test]
fn test_utf16_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("utf16.tmx");
    let tmx = Tmx::new(header())
        .with_unit(Tu::new().with_variant(Tuv::new("ja").with_part("翻訳メモリ")));

    Saver::new().encoding("utf-16").save(&tmx, &path).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
    assert_eq!(load(&path).unwrap(), tmx);
    assert_eq!(Loader::with_backend(DomBackend::new()).load(&path).unwrap(), tmx);

    let mut writer = Saver::new()
        .encoding("UTF-16BE")
        .unit_writer(Vec::new(), &tmx.header)
        .unwrap();
    writer.write_units(&tmx.body).unwrap();
    let bytes = writer.finish().unwrap();
    assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
    assert_eq!(Loader::new().load_reader(Cursor::new(bytes)).unwrap(), tmx);
}

#[test]
fn test_missing_path_and_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.tmx");

    assert!(matches!(load(&missing), Err(Error::NotFound(ref p)) if p == &missing));
    assert!(matches!(load(dir.path()), Err(Error::IsADirectory(_))));
    assert!(matches!(
        Loader::new().stream(&missing, &TagFilter::all()),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(save(&Tmx::new(header()), dir.path()), Err(Error::IsADirectory(_))));
}

#[test]
fn test_root_must_be_tmx() {
    let err = Loader::new().load_reader(Cursor::new("<tu/>")).unwrap_err();
    assert!(matches!(err, Error::NotTmx { ref found } if found == "tu"));
}

#[test]
fn test_root_omitted_by_policy() {
    let policy = DeserializationPolicy {
        missing_header: PolicyValue::new(RaiseOrIgnore::Ignore, Level::Warn),
        ..DeserializationPolicy::default()
    };
    let err = Loader::new()
        .policy(policy)
        .load_reader(Cursor::new(r#"<tmx version="1.4"><body/></tmx>"#))
        .unwrap_err();
    assert!(matches!(err, Error::Omitted { ref tag } if tag == "tmx"));
}

#[test]
fn test_write_with_dom_backend_and_encoding_label() {
    let mut out = Vec::new();
    Saver::with_backend(DomBackend::new())
        .encoding("UTF8")
        .write(&Tmx::new(header()), &mut out)
        .unwrap();
    let xml = String::from_utf8(out).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.ends_with("<body/></tmx>"));
}

#[test]
fn test_unsupported_encoding() {
    let err = Saver::new()
        .encoding("ebcdic-37")
        .write(&Tmx::new(header()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, Error::Backend(BackendError::UnsupportedEncoding(_))));
}

#[test]
fn test_unit_writer_matches_whole_document() {
    let units: Vec<Tu> = (0..5)
        .map(|i| Tu::new().with_tuid(i.to_string()).with_variant(Tuv::new("en").with_part("x")))
        .collect();
    let tmx = Tmx::new(header()).with_units(units.clone());

    let mut whole = Vec::new();
    Saver::new().write(&tmx, &mut whole).unwrap();

    let saver = Saver::new();
    let mut writer = saver.unit_writer(Vec::new(), &tmx.header).unwrap().flush_every(2);
    writer.write_units(&units).unwrap();
    assert_eq!(writer.written(), 5);
    let incremental = writer.finish().unwrap();

    // The incremental writer always opens <body>, so compare parsed results
    let reparsed = Loader::new().load_reader(Cursor::new(incremental)).unwrap();
    assert_eq!(reparsed, tmx);
    assert_eq!(Loader::new().load_reader(Cursor::new(whole)).unwrap(), tmx);
}

#[test]
fn test_unit_writer_releases_units() {
    let units: Vec<Tu> = (0..50).map(|i| Tu::new().with_tuid(i.to_string())).collect();
    let mut writer = Saver::new().unit_writer(Vec::new(), &header()).unwrap();
    for tu in &units {
        writer.write_unit(tu).unwrap();
        assert_eq!(writer.ser.backend().live_nodes(), 1);
    }
    let xml = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert!(xml.ends_with("<tu tuid=\"49\"/></body></tmx>"));
}

#[test]
fn test_stream_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("units.tmx");
    let tmx = Tmx::new(header()).with_units((0..3).map(|i| Tu::new().with_tuid(i.to_string())));
    save(&tmx, &path).unwrap();

    let ids: Vec<String> = Loader::new()
        .stream(&path, &TagFilter::only("tu"))
        .unwrap()
        .map(|item| Tu::try_from(item.unwrap()).unwrap().tuid.unwrap())
        .collect();
    assert_eq!(ids, ["0", "1", "2"]);
}
