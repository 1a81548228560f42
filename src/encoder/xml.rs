//! XML document encoding
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <DOC xmlns="{base}{prefix}{code}{suffix}">
//!   <BCMSG>
//!     <IdentdDestinatario>..</IdentdDestinatario>
//!     <DomSist>..</DomSist>
//!   </BCMSG>
//!   <SISMSG>
//!     <{prefix}{code}>
//!       <{field}>{value}</{field}>   one per supplied field, in order
//!     </{prefix}{code}>
//!   </SISMSG>
//! </DOC>
//! ```
//!
//! Indentation is cosmetic.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::EncoderConfig;
use crate::error::EncodingError;

use super::MessageFields;

pub const ROOT_TAG: &str = "DOC";
pub const HEADER_TAG: &str = "BCMSG";
pub const RECIPIENT_TAG: &str = "IdentdDestinatario";
pub const SYSTEM_DOMAIN_TAG: &str = "DomSist";
pub const BODY_WRAPPER_TAG: &str = "SISMSG";

/// Body element name for an operation code, e.g. `1052` -> `SEL1052`
pub fn body_tag(config: &EncoderConfig, operation_code: &str) -> String {
    format!("{}{}", config.message_prefix, operation_code)
}

pub fn namespace(config: &EncoderConfig, operation_code: &str) -> String {
    format!(
        "{}{}{}",
        config.namespace_base,
        body_tag(config, operation_code),
        config.schema_suffix
    )
}

pub fn encode_document(
    config: &EncoderConfig,
    operation_code: &str,
    message: &MessageFields,
) -> Result<String, EncodingError> {
    let body = body_tag(config, operation_code);
    ensure_element_name(&body)?;
    for (name, _) in message.iter() {
        ensure_element_name(name)?;
    }

    let namespace = namespace(config, operation_code);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new(ROOT_TAG);
    root.push_attribute(("xmlns", namespace.as_str()));
    write(&mut writer, Event::Start(root))?;

    write(&mut writer, Event::Start(BytesStart::new(HEADER_TAG)))?;
    write_text_element(&mut writer, RECIPIENT_TAG, &config.recipient_id)?;
    write_text_element(&mut writer, SYSTEM_DOMAIN_TAG, &config.system_domain)?;
    write(&mut writer, Event::End(BytesEnd::new(HEADER_TAG)))?;

    write(&mut writer, Event::Start(BytesStart::new(BODY_WRAPPER_TAG)))?;
    write(&mut writer, Event::Start(BytesStart::new(body.as_str())))?;
    for (name, value) in message.iter() {
        write_text_element(&mut writer, name, &value.to_string())?;
    }
    write(&mut writer, Event::End(BytesEnd::new(body.as_str())))?;
    write(&mut writer, Event::End(BytesEnd::new(BODY_WRAPPER_TAG)))?;

    write(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| EncodingError::Xml(e.to_string()))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), EncodingError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodingError> {
    writer
        .write_event(event)
        .map_err(|e| EncodingError::Xml(e.to_string()))
}

/// Reject names the writer would emit as malformed markup
///
/// Follows the XML `Name` production minus the colon (no namespace
/// prefixes in body fields).
fn ensure_element_name(name: &str) -> Result<(), EncodingError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    };

    // "xml" in any case is reserved as a name prefix
    if valid && !name.to_ascii_lowercase().starts_with("xml") {
        Ok(())
    } else {
        Err(EncodingError::InvalidElementName {
            name: name.to_string(),
        })
    }
}
