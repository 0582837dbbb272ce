//! Inbound scene update parsing
//!
//! The renderer pushes `<update>` documents over the socket. Parsing is
//! best-effort: anything unusable is skipped with a log line and the rest of
//! the message is still applied.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One parsed `<source>` element of an update message.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceUpdate {
    pub id: u32,
    pub name: Option<String>,
    pub volume_db: Option<f32>,
    pub mute: Option<bool>,
    pub model: Option<String>,
    pub properties_file: Option<String>,
    pub children: Vec<SourceChild>,
}

/// Child elements of a `<source>` element, kept in document order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SourceChild {
    Position {
        x: Option<f32>,
        y: Option<f32>,
        fixed: Option<bool>,
    },
    Orientation {
        azimuth: Option<f32>,
    },
    Port(String),
}

/// Parse an `<update>` message into per-source updates.
///
/// Returns `None` when the document is unparseable or the root element is
/// not `<update>`; per-element problems are skipped instead.
pub(crate) fn parse_update_message(xml: &str) -> Option<Vec<SourceUpdate>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                return if element.name().as_ref() == b"update" {
                    Some(parse_update_children(&mut reader))
                } else {
                    log::debug!("[Scene] Ignoring message with root <{}>", name_of(&element));
                    None
                };
            }
            Ok(Event::Empty(element)) => {
                return if element.name().as_ref() == b"update" {
                    Some(Vec::new())
                } else {
                    log::debug!("[Scene] Ignoring message with root <{}>", name_of(&element));
                    None
                };
            }
            Ok(Event::Eof) => return None,
            Ok(_) => continue,
            Err(error) => {
                log::warn!("[Scene] Dropping unparseable update message: {error}");
                return None;
            }
        }
    }
}

fn parse_update_children(reader: &mut Reader<&[u8]>) -> Vec<SourceUpdate> {
    let mut updates = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if element.name().as_ref() == b"source" {
                    if let Some(update) = parse_source_element(reader, &element, false) {
                        updates.push(update);
                    }
                } else {
                    log::debug!("[Scene] Skipping <{}> inside update", name_of(&element));
                    if reader.read_to_end(element.name()).is_err() {
                        break;
                    }
                }
            }
            Ok(Event::Empty(element)) => {
                if element.name().as_ref() == b"source" {
                    if let Some(update) = parse_source_element(reader, &element, true) {
                        updates.push(update);
                    }
                } else {
                    log::debug!("[Scene] Skipping <{}> inside update", name_of(&element));
                }
            }
            // </update>, or a truncated document; keep what was parsed.
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(error) => {
                log::warn!("[Scene] Update message truncated: {error}");
                break;
            }
        }
    }

    updates
}

fn parse_source_element(
    reader: &mut Reader<&[u8]>,
    element: &BytesStart,
    is_empty: bool,
) -> Option<SourceUpdate> {
    let attributes = collect_attributes(element);

    let id = attributes
        .get("id")
        .and_then(|value| value.trim().parse::<u32>().ok());
    let Some(id) = id else {
        log::debug!("[Scene] Skipping <source> without a usable id");
        if !is_empty {
            let _ = reader.read_to_end(element.name());
        }
        return None;
    };

    let mut update = SourceUpdate {
        id,
        name: attributes.get("name").cloned(),
        volume_db: parse_f32_attribute(&attributes, "volume"),
        mute: attributes.get("mute").map(|value| parse_bool(value)),
        model: attributes.get("model").cloned(),
        properties_file: attributes.get("properties_file").cloned(),
        children: Vec::new(),
    };

    if !is_empty {
        parse_source_children(reader, &mut update);
    }

    Some(update)
}

fn parse_source_children(reader: &mut Reader<&[u8]>, update: &mut SourceUpdate) {
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"position" => {
                    update.children.push(position_child(&element));
                    let _ = reader.read_to_end(element.name());
                }
                b"orientation" => {
                    update.children.push(orientation_child(&element));
                    let _ = reader.read_to_end(element.name());
                }
                b"port" => {
                    update.children.push(SourceChild::Port(collect_subtree_text(reader)));
                }
                _ => {
                    log::debug!("[Scene] Skipping <{}> inside source", name_of(&element));
                    let _ = reader.read_to_end(element.name());
                }
            },
            Ok(Event::Empty(element)) => match element.name().as_ref() {
                b"position" => update.children.push(position_child(&element)),
                b"orientation" => update.children.push(orientation_child(&element)),
                b"port" => update.children.push(SourceChild::Port(String::new())),
                _ => log::debug!("[Scene] Skipping <{}> inside source", name_of(&element)),
            },
            // </source>, or a truncated document.
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(error) => {
                log::warn!("[Scene] Source element truncated: {error}");
                break;
            }
        }
    }
}

fn position_child(element: &BytesStart) -> SourceChild {
    let attributes = collect_attributes(element);
    SourceChild::Position {
        x: parse_f32_attribute(&attributes, "x"),
        y: parse_f32_attribute(&attributes, "y"),
        fixed: attributes.get("fixed").map(|value| parse_bool(value)),
    }
}

fn orientation_child(element: &BytesStart) -> SourceChild {
    let attributes = collect_attributes(element);
    SourceChild::Orientation {
        azimuth: parse_f32_attribute(&attributes, "azimuth"),
    }
}

/// Concatenated text of the current subtree, nested elements included.
fn collect_subtree_text(reader: &mut Reader<&[u8]>) -> String {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Text(content)) => match content.unescape() {
                Ok(chunk) => text.push_str(&chunk),
                Err(error) => log::debug!("[Scene] Skipping unreadable text: {error}"),
            },
            Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(error) => {
                log::warn!("[Scene] Port element truncated: {error}");
                break;
            }
        }
    }

    text
}

fn collect_attributes(element: &BytesStart) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for attribute in element.attributes() {
        match attribute {
            Ok(attribute) => {
                let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                match attribute.unescape_value() {
                    Ok(value) => {
                        attributes.insert(key, value.into_owned());
                    }
                    Err(error) => log::debug!("[Scene] Skipping attribute {key}: {error}"),
                }
            }
            Err(error) => log::debug!("[Scene] Skipping malformed attribute: {error}"),
        }
    }
    attributes
}

fn parse_f32_attribute(attributes: &HashMap<String, String>, key: &str) -> Option<f32> {
    let value = attributes.get(key)?;
    match value.trim().parse::<f32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::debug!("[Scene] Skipping non-numeric {key}=\"{value}\"");
            None
        }
    }
}

/// Truthy attribute values as the renderer writes them: any nonzero
/// integer, or a spelled-out true/yes.
fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    if let Ok(number) = value.parse::<i64>() {
        return number != 0;
    }
    value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("y")
}

fn name_of(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_source_element() {
        let updates = parse_update_message(
            r#"<update><source id="5" name="Foo" volume="-6" mute="true" model="point" properties_file="foo.prop"><position x="1.0" y="2.0" fixed="true"/><orientation azimuth="1.5"/><port>capture_3</port></source></update>"#,
        )
        .unwrap();

        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        assert_eq!(update.id, 5);
        assert_eq!(update.name.as_deref(), Some("Foo"));
        assert_eq!(update.volume_db, Some(-6.0));
        assert_eq!(update.mute, Some(true));
        assert_eq!(update.model.as_deref(), Some("point"));
        assert_eq!(update.properties_file.as_deref(), Some("foo.prop"));
        assert_eq!(
            update.children,
            vec![
                SourceChild::Position {
                    x: Some(1.0),
                    y: Some(2.0),
                    fixed: Some(true),
                },
                SourceChild::Orientation { azimuth: Some(1.5) },
                SourceChild::Port("capture_3".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_foreign_root_elements() {
        assert!(parse_update_message(r#"<scene><source id="1"/></scene>"#).is_none());
        assert!(parse_update_message("no xml here").is_none());
        assert!(parse_update_message("").is_none());
    }

    #[test]
    fn skips_sources_without_a_usable_id() {
        let updates = parse_update_message(
            r#"<update><source name="NoId" volume="1"/><source id="abc"/><source id="2" name="Ok"/></update>"#,
        )
        .unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, 2);
        assert_eq!(updates[0].name.as_deref(), Some("Ok"));
    }

    #[test]
    fn omitted_attributes_parse_as_none() {
        let updates =
            parse_update_message(r#"<update><source id="3"><position x="0.5"/></source></update>"#)
                .unwrap();

        let update = &updates[0];
        assert_eq!(update.name, None);
        assert_eq!(update.volume_db, None);
        assert_eq!(update.mute, None);
        assert_eq!(
            update.children,
            vec![SourceChild::Position {
                x: Some(0.5),
                y: None,
                fixed: None,
            }]
        );
    }

    #[test]
    fn port_text_spans_nested_elements() {
        let updates = parse_update_message(
            r#"<update><source id="4"><port>system:<sub>capture</sub>_1</port></source></update>"#,
        )
        .unwrap();

        assert_eq!(
            updates[0].children,
            vec![SourceChild::Port("system:capture_1".to_string())]
        );
    }

    #[test]
    fn empty_update_is_a_no_op() {
        assert_eq!(parse_update_message("<update/>"), Some(Vec::new()));
        assert_eq!(parse_update_message("<update></update>"), Some(Vec::new()));
    }

    #[test]
    fn truthy_attributes_follow_integer_semantics() {
        let updates = parse_update_message(
            r#"<update><source id="1" mute="2"/><source id="2" mute="0"/><source id="3" mute="-1"/><source id="4" mute="yes"/><source id="5" mute="off"/></update>"#,
        )
        .unwrap();

        assert_eq!(updates[0].mute, Some(true));
        assert_eq!(updates[1].mute, Some(false));
        assert_eq!(updates[2].mute, Some(true));
        assert_eq!(updates[3].mute, Some(true));
        assert_eq!(updates[4].mute, Some(false));
    }

    #[test]
    fn non_numeric_values_are_dropped_field_by_field() {
        let updates = parse_update_message(
            r#"<update><source id="6" volume="loud" name="Kept"/></update>"#,
        )
        .unwrap();

        assert_eq!(updates[0].volume_db, None);
        assert_eq!(updates[0].name.as_deref(), Some("Kept"));
    }
}
