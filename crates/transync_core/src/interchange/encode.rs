//! Writer producing vendor interchange documents.

use super::{
    Channel, InterchangeError, StructuredContent, ATTR_META_KEY, ATTR_RESNAME,
    ATTR_SOURCE_LANGUAGE, ATTR_TARGET_LANGUAGE, ATTR_TAXONOMY, ATTR_TERM_ID, FILE_TAG, SOURCE_TAG,
    TARGET_TAG, UNIT_TAG,
};
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const XLIFF_VERSION: &str = "1.2";
const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// Serializes `content` as an XLIFF 1.2 document.
///
/// Units are written title, body, taxonomy terms, then metadata; map-backed
/// channels follow key order so output is deterministic.
///
/// # Errors
/// - `MissingAttribute` when a taxonomy type, term id or meta key is blank;
///   the decoder would reject the unit.
/// - `Write` when serialization fails.
pub fn encode(content: &StructuredContent) -> Result<String, InterchangeError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new("xliff");
    root.push_attribute(("version", XLIFF_VERSION));
    root.push_attribute(("xmlns", XLIFF_NAMESPACE));
    emit(&mut writer, Event::Start(root))?;

    let mut file = BytesStart::new(FILE_TAG);
    file.push_attribute((ATTR_SOURCE_LANGUAGE, content.source_locale.as_str()));
    file.push_attribute((ATTR_TARGET_LANGUAGE, content.target_locale.as_str()));
    file.push_attribute(("datatype", "plaintext"));
    file.push_attribute(("original", "content"));
    emit(&mut writer, Event::Start(file))?;
    emit(&mut writer, Event::Start(BytesStart::new("body")))?;

    let mut units = 0usize;
    if let Some(title) = &content.title {
        units += 1;
        write_unit(&mut writer, units, Channel::Title, &[], title)?;
    }
    if let Some(body) = &content.body {
        units += 1;
        write_unit(&mut writer, units, Channel::Body, &[], body)?;
    }
    for (taxonomy, terms) in &content.taxonomy_terms {
        for (term_id, name) in terms {
            require_key(taxonomy, units, Channel::Taxonomy, ATTR_TAXONOMY)?;
            require_key(term_id, units, Channel::Taxonomy, ATTR_TERM_ID)?;
            units += 1;
            let companions = [
                (ATTR_TAXONOMY, taxonomy.as_str()),
                (ATTR_TERM_ID, term_id.as_str()),
            ];
            write_unit(&mut writer, units, Channel::Taxonomy, &companions, name)?;
        }
    }
    for (key, value) in &content.metadata {
        require_key(key, units, Channel::Meta, ATTR_META_KEY)?;
        units += 1;
        let companions = [(ATTR_META_KEY, key.as_str())];
        write_unit(&mut writer, units, Channel::Meta, &companions, value)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("body")))?;
    emit(&mut writer, Event::End(BytesEnd::new(FILE_TAG)))?;
    emit(&mut writer, Event::End(BytesEnd::new("xliff")))?;

    let document = String::from_utf8(writer.into_inner())
        .map_err(|err| InterchangeError::Write(err.to_string()))?;
    debug!(
        "event=interchange_encode module=interchange status=ok units={units} bytes={}",
        document.len()
    );
    Ok(document)
}

/// `unit_index` is zero-based, matching decode errors.
fn require_key(
    value: &str,
    unit_index: usize,
    channel: Channel,
    attribute: &'static str,
) -> Result<(), InterchangeError> {
    if value.trim().is_empty() {
        return Err(InterchangeError::MissingAttribute {
            unit_index,
            channel,
            attribute,
        });
    }
    Ok(())
}

fn write_unit(
    writer: &mut Writer<Vec<u8>>,
    id: usize,
    channel: Channel,
    companions: &[(&str, &str)],
    text: &str,
) -> Result<(), InterchangeError> {
    let id = id.to_string();
    let mut start = BytesStart::new(UNIT_TAG);
    start.push_attribute(("id", id.as_str()));
    start.push_attribute((ATTR_RESNAME, channel.as_str()));
    for &(name, value) in companions {
        start.push_attribute((name, value));
    }
    emit(writer, Event::Start(start))?;
    for tag in [SOURCE_TAG, TARGET_TAG] {
        emit(writer, Event::Start(BytesStart::new(tag)))?;
        emit(writer, Event::Text(BytesText::new(text)))?;
        emit(writer, Event::End(BytesEnd::new(tag)))?;
    }
    emit(writer, Event::End(BytesEnd::new(UNIT_TAG)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), InterchangeError> {
    writer
        .write_event(event)
        .map_err(|err| InterchangeError::Write(err.to_string()))
}
