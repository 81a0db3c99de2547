use std::io::Write;
use transync_core::interchange::Channel;
use transync_core::{decode, decode_file, InterchangeError};

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en-US" target-language="fr-FR" datatype="plaintext" original="post-12">
    <body>
      <trans-unit id="1" resname="title">
        <source>Hello</source>
        <target>Bonjour</target>
      </trans-unit>
      <trans-unit id="2" resname="body">
        <source>Body text</source>
        <target>Texte <g id="b">important</g></target>
      </trans-unit>
      <trans-unit id="3" resname="taxonomy" wp_taxonomy="category" wp_id="12">
        <source>News</source>
        <target>Actualités</target>
      </trans-unit>
      <trans-unit id="4" resname="taxonomy" wp_taxonomy="category" wp_id="7">
        <source>Sport</source>
        <target>Sports</target>
      </trans-unit>
      <trans-unit id="5" resname="meta" wp_meta="subtitle">
        <source>Sub</source>
        <target>Sous-titre</target>
      </trans-unit>
      NOTE_SLOT
    </body>
  </file>
</xliff>"#;

fn document(note: &str) -> String {
    DOCUMENT.replace("NOTE_SLOT", note)
}

#[test]
fn decodes_every_channel() {
    let content = decode(&document("")).unwrap();

    assert_eq!(content.source_locale, "en-US");
    assert_eq!(content.target_locale, "fr-FR");
    assert_eq!(content.title.as_deref(), Some("Bonjour"));
    assert_eq!(content.body.as_deref(), Some("Texte important"));
    let category = &content.taxonomy_terms["category"];
    assert_eq!(category.len(), 2);
    assert_eq!(category["12"], "Actualités");
    assert_eq!(category["7"], "Sports");
    assert_eq!(content.metadata.len(), 1);
    assert_eq!(content.metadata["subtitle"], "Sous-titre");
}

#[test]
fn decoding_is_idempotent() {
    let raw = document("");
    assert_eq!(decode(&raw).unwrap(), decode(&raw).unwrap());
}

#[test]
fn unknown_channel_is_ignored() {
    let note = r#"<trans-unit id="6" resname="note"><source>n</source><target>x</target></trans-unit>"#;
    assert_eq!(
        decode(&document(note)).unwrap(),
        decode(&document("")).unwrap()
    );
}

#[test]
fn taxonomy_unit_without_term_id_fails_whole_decode() {
    let broken = r#"<trans-unit id="6" resname="taxonomy" wp_taxonomy="tag"><target>x</target></trans-unit>"#;
    let err = decode(&document(broken)).unwrap_err();
    match err {
        InterchangeError::MissingAttribute {
            unit_index,
            channel,
            attribute,
        } => {
            assert_eq!(unit_index, 5);
            assert_eq!(channel, Channel::Taxonomy);
            assert_eq!(attribute, "wp_id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decodes_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(document("").as_bytes()).unwrap();

    let content = decode_file(file.path()).unwrap();
    assert_eq!(content.title.as_deref(), Some("Bonjour"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = decode_file(dir.path().join("absent.xlf")).unwrap_err();
    assert!(matches!(err, InterchangeError::Io { .. }));
}

#[test]
fn non_xml_input_is_malformed() {
    let err = decode("this is not xml").unwrap_err();
    assert!(matches!(err, InterchangeError::Malformed(_)));
}
