//! Streaming decoder for vendor interchange documents.

use super::{
    Channel, InterchangeError, StructuredContent, ATTR_META_KEY, ATTR_RESNAME,
    ATTR_SOURCE_LANGUAGE, ATTR_TARGET_LANGUAGE, ATTR_TAXONOMY, ATTR_TERM_ID, FILE_TAG, TARGET_TAG,
    UNIT_TAG,
};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::path::Path;

/// Decodes an interchange document held in memory.
///
/// # Errors
/// - `Malformed` when the XML does not parse or has no `file` container.
/// - `MissingAttribute` when a taxonomy or meta unit lacks its key attributes.
pub fn decode(document: &str) -> Result<StructuredContent, InterchangeError> {
    let result = Decoder::default().run(document);
    match &result {
        Ok(content) => debug!(
            "event=interchange_decode module=interchange status=ok source={} target={} terms={} meta={}",
            content.source_locale,
            content.target_locale,
            content.taxonomy_terms.values().map(|terms| terms.len()).sum::<usize>(),
            content.metadata.len()
        ),
        Err(err) => warn!("event=interchange_decode module=interchange status=error error={err}"),
    }
    result
}

/// Reads and decodes an interchange file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<StructuredContent, InterchangeError> {
    let path = path.as_ref();
    let document = std::fs::read_to_string(path).map_err(|source| InterchangeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&document)
}

/// Progress of the `target` child inside the current unit.
#[derive(Debug)]
enum TargetText {
    Pending,
    /// Inside the target; `nested` counts open inline elements below it.
    Capturing { nested: usize, text: String },
    Done(String),
}

#[derive(Debug)]
struct OpenUnit {
    index: usize,
    /// Element depth at which the unit was opened.
    depth: usize,
    resname: Option<String>,
    taxonomy: Option<String>,
    term_id: Option<String>,
    meta_key: Option<String>,
    target: TargetText,
}

impl OpenUnit {
    fn from_start(
        start: &BytesStart<'_>,
        index: usize,
        depth: usize,
    ) -> Result<Self, InterchangeError> {
        Ok(Self {
            index,
            depth,
            resname: attribute(start, ATTR_RESNAME)?,
            taxonomy: attribute(start, ATTR_TAXONOMY)?,
            term_id: attribute(start, ATTR_TERM_ID)?,
            meta_key: attribute(start, ATTR_META_KEY)?,
            target: TargetText::Pending,
        })
    }

    fn value(self) -> (UnitKeys, String) {
        let text = match self.target {
            TargetText::Pending => String::new(),
            TargetText::Capturing { text, .. } | TargetText::Done(text) => text,
        };
        let keys = UnitKeys {
            index: self.index,
            resname: self.resname,
            taxonomy: self.taxonomy,
            term_id: self.term_id,
            meta_key: self.meta_key,
        };
        (keys, text)
    }
}

struct UnitKeys {
    index: usize,
    resname: Option<String>,
    taxonomy: Option<String>,
    term_id: Option<String>,
    meta_key: Option<String>,
}

#[derive(Default)]
struct Decoder {
    content: StructuredContent,
    saw_container: bool,
    depth: usize,
    units_seen: usize,
    unit: Option<OpenUnit>,
}

impl Decoder {
    fn run(mut self, document: &str) -> Result<StructuredContent, InterchangeError> {
        let mut reader = Reader::from_str(document);

        loop {
            let event = reader.read_event().map_err(|err| {
                malformed(format!("at byte {}: {err}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(start) => {
                    self.open(&start)?;
                    self.depth += 1;
                }
                Event::Empty(start) => self.empty(&start)?,
                Event::End(end) => {
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or_else(|| malformed("unbalanced closing tag"))?;
                    self.close(end.local_name().as_ref())?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(malformed)?;
                    self.push_text(&text);
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data).map_err(malformed)?;
                    self.push_text(text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if self.depth != 0 {
            return Err(malformed("document ended with unclosed elements"));
        }
        if !self.saw_container {
            return Err(malformed("missing <file> container element"));
        }
        Ok(self.content)
    }

    fn open(&mut self, start: &BytesStart<'_>) -> Result<(), InterchangeError> {
        if let Some(unit) = self.unit.as_mut() {
            if let TargetText::Capturing { nested, .. } = &mut unit.target {
                *nested += 1;
            } else if matches!(unit.target, TargetText::Pending)
                && start.local_name().as_ref() == TARGET_TAG.as_bytes()
            {
                unit.target = TargetText::Capturing {
                    nested: 0,
                    text: String::new(),
                };
            }
            return Ok(());
        }

        match start.local_name().as_ref() {
            name if name == FILE_TAG.as_bytes() => self.read_container(start),
            name if name == UNIT_TAG.as_bytes() => {
                self.unit = Some(OpenUnit::from_start(start, self.units_seen, self.depth)?);
                self.units_seen += 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn empty(&mut self, start: &BytesStart<'_>) -> Result<(), InterchangeError> {
        if let Some(unit) = self.unit.as_mut() {
            if matches!(unit.target, TargetText::Pending)
                && start.local_name().as_ref() == TARGET_TAG.as_bytes()
            {
                unit.target = TargetText::Done(String::new());
            }
            return Ok(());
        }

        match start.local_name().as_ref() {
            name if name == FILE_TAG.as_bytes() => self.read_container(start),
            name if name == UNIT_TAG.as_bytes() => {
                let unit = OpenUnit::from_start(start, self.units_seen, self.depth)?;
                self.units_seen += 1;
                self.apply(unit)
            }
            _ => Ok(()),
        }
    }

    fn close(&mut self, name: &[u8]) -> Result<(), InterchangeError> {
        let Some(unit) = self.unit.as_mut() else {
            return Ok(());
        };

        if let TargetText::Capturing { nested, text } = &mut unit.target {
            if *nested == 0 {
                unit.target = TargetText::Done(std::mem::take(text));
            } else {
                *nested -= 1;
            }
            return Ok(());
        }

        if self.depth == unit.depth && name == UNIT_TAG.as_bytes() {
            if let Some(unit) = self.unit.take() {
                return self.apply(unit);
            }
        }
        Ok(())
    }

    fn push_text(&mut self, fragment: &str) {
        if let Some(OpenUnit {
            target: TargetText::Capturing { text, .. },
            ..
        }) = self.unit.as_mut()
        {
            text.push_str(fragment);
        }
    }

    fn read_container(&mut self, start: &BytesStart<'_>) -> Result<(), InterchangeError> {
        if self.saw_container {
            return Ok(());
        }
        self.saw_container = true;
        self.content.source_locale = attribute(start, ATTR_SOURCE_LANGUAGE)?.unwrap_or_default();
        self.content.target_locale = attribute(start, ATTR_TARGET_LANGUAGE)?.unwrap_or_default();
        Ok(())
    }

    fn apply(&mut self, unit: OpenUnit) -> Result<(), InterchangeError> {
        let (keys, value) = unit.value();
        let Some(channel) = keys.resname.as_deref().and_then(Channel::from_resname) else {
            return Ok(());
        };

        match channel {
            Channel::Title => self.content.title = Some(value),
            Channel::Body => self.content.body = Some(value),
            Channel::Taxonomy => {
                let taxonomy = required(keys.taxonomy, keys.index, channel, ATTR_TAXONOMY)?;
                let term_id = required(keys.term_id, keys.index, channel, ATTR_TERM_ID)?;
                self.content
                    .taxonomy_terms
                    .entry(taxonomy)
                    .or_default()
                    .insert(term_id, value);
            }
            Channel::Meta => {
                let key = required(keys.meta_key, keys.index, channel, ATTR_META_KEY)?;
                self.content.metadata.insert(key, value);
            }
        }
        Ok(())
    }
}

fn required(
    value: Option<String>,
    unit_index: usize,
    channel: Channel,
    attribute: &'static str,
) -> Result<String, InterchangeError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(InterchangeError::MissingAttribute {
            unit_index,
            channel,
            attribute,
        }),
    }
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, InterchangeError> {
    match start.try_get_attribute(name).map_err(malformed)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(malformed)?.into_owned())),
        None => Ok(None),
    }
}

fn malformed(err: impl Display) -> InterchangeError {
    InterchangeError::Malformed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::interchange::{Channel, InterchangeError};

    fn wrap(units: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2"><file source-language="en-US" target-language="fr-FR"><body>{units}</body></file></xliff>"#
        )
    }

    #[test]
    fn body_flattens_inline_markup() {
        let doc = wrap(
            r#"<trans-unit id="1" resname="body"><source>x</source><target>Bonjour <g id="b">le <x id="1"/>monde</g>!</target></trans-unit>"#,
        );
        assert_eq!(decode(&doc).unwrap().body.as_deref(), Some("Bonjour le monde!"));
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let doc = wrap(
            r#"<trans-unit resname="title"><target>Fish &amp; chips <![CDATA[<b>]]></target></trans-unit>"#,
        );
        assert_eq!(decode(&doc).unwrap().title.as_deref(), Some("Fish & chips <b>"));
    }

    #[test]
    fn missing_target_yields_empty_value() {
        let doc = wrap(
            r#"<trans-unit resname="meta" wp_meta="subtitle"><source>s</source></trans-unit>"#,
        );
        let content = decode(&doc).unwrap();
        assert_eq!(content.metadata.get("subtitle").map(String::as_str), Some(""));
    }

    #[test]
    fn self_closing_target_yields_empty_value() {
        let doc = wrap(r#"<trans-unit resname="title"><target/></trans-unit>"#);
        assert_eq!(decode(&doc).unwrap().title.as_deref(), Some(""));
    }

    #[test]
    fn first_target_wins_within_a_unit() {
        let doc = wrap(
            r#"<trans-unit resname="title"><target>one</target><alt-trans><target>two</target></alt-trans></trans-unit>"#,
        );
        assert_eq!(decode(&doc).unwrap().title.as_deref(), Some("one"));
    }

    #[test]
    fn missing_companion_attribute_fails_whole_decode() {
        let doc = wrap(
            r#"<trans-unit resname="title"><target>T</target></trans-unit><trans-unit resname="taxonomy" wp_taxonomy="category"><target>News</target></trans-unit>"#,
        );
        let err = decode(&doc).unwrap_err();
        assert!(matches!(
            err,
            InterchangeError::MissingAttribute {
                unit_index: 1,
                channel: Channel::Taxonomy,
                attribute: "wp_id"
            }
        ));
    }

    #[test]
    fn blank_meta_key_counts_as_missing() {
        let doc =
            wrap(r#"<trans-unit resname="meta" wp_meta=" "><target>v</target></trans-unit>"#);
        assert!(matches!(
            decode(&doc).unwrap_err(),
            InterchangeError::MissingAttribute { attribute: "wp_meta", .. }
        ));
    }

    #[test]
    fn missing_container_is_malformed() {
        let doc = r#"<xliff><trans-unit resname="title"><target>T</target></trans-unit></xliff>"#;
        assert!(matches!(decode(doc).unwrap_err(), InterchangeError::Malformed(_)));
    }

    #[test]
    fn truncated_document_is_malformed() {
        let doc = r#"<xliff><file source-language="en"><body><trans-unit resname="title">"#;
        assert!(matches!(decode(doc).unwrap_err(), InterchangeError::Malformed(_)));
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let doc = r#"<xliff><file></body></xliff>"#;
        assert!(matches!(decode(doc).unwrap_err(), InterchangeError::Malformed(_)));
    }

    #[test]
    fn only_first_container_sets_locales() {
        let doc = r#"<xliff><file source-language="en" target-language="de-DE"/><file source-language="xx" target-language="yy"><body><trans-unit resname="title"><target>Titel</target></trans-unit></body></file></xliff>"#;
        let content = decode(doc).unwrap();
        assert_eq!(content.source_locale, "en");
        assert_eq!(content.target_locale, "de-DE");
        assert_eq!(content.title.as_deref(), Some("Titel"));
    }

    #[test]
    fn missing_locale_attributes_read_as_empty() {
        let doc = r#"<xliff><file><body/></file></xliff>"#;
        let content = decode(doc).unwrap();
        assert_eq!(content.source_locale, "");
        assert_eq!(content.target_locale, "");
    }
}
