//! Record assembly and the internal XML field-set document
//!
//! A record is the ordered field list handed to the schema transform. The
//! extracted fields come first, followed by the derived fields: the anchor
//! doctype (only for works grouped under an anchor), the logical doctype,
//! and the identifier last.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::document::DocumentInfo;
use crate::field::ContentField;
use crate::identifier::Pid;

/// Element name of the logical document type field
pub const DOCTYPE_FIELD: &str = "PIDMINT-DOCTYPE";
/// Element name of the anchor's own type field
pub const ANCHOR_DOCTYPE_FIELD: &str = "PIDMINT-ANCHOR-DOCTYPE";
/// Element name of the identifier field
pub const IDENTIFIER_FIELD: &str = "PIDMINT-PID";
/// Root element of the field-set document
pub const RECORD_ROOT: &str = "record";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to serialize record to XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("record XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// An assembled record, ready for transformation. Not mutated after handoff.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<ContentField>,
}

impl Record {
    /// Assemble the record from the extracted fields, the document's derived
    /// type fields, and the identifier.
    pub fn build(extracted: Vec<ContentField>, document: &DocumentInfo, pid: &Pid) -> Self {
        let mut fields = extracted;
        if let Some(anchor_type) = &document.anchor_type {
            fields.push(ContentField::new(ANCHOR_DOCTYPE_FIELD, anchor_type));
        }
        fields.push(ContentField::new(DOCTYPE_FIELD, &document.doc_type));
        fields.push(ContentField::new(IDENTIFIER_FIELD, pid.as_str()));
        Self { fields }
    }

    pub fn fields(&self) -> &[ContentField] {
        &self.fields
    }

    /// Serialize to the XML document consumed by the schema transform: one
    /// element per field under `<record>`, text content escaped.
    pub fn to_xml(&self) -> Result<String, RecordError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(RECORD_ROOT)))?;
        for field in &self.fields {
            writer.write_event(Event::Start(BytesStart::new(field.name.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&field.value)))?;
            writer.write_event(Event::End(BytesEnd::new(field.name.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(RECORD_ROOT)))?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Whether `name` can be used as an XML element name. Field names are
/// config-supplied, so this is checked at config validation time.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(anchor_type: Option<&str>) -> DocumentInfo {
        DocumentInfo {
            doc_type: "Monograph".to_string(),
            anchor_type: anchor_type.map(str::to_string),
            catalogue_id: "0042".to_string(),
            existing_pid: None,
        }
    }

    #[test]
    fn derived_fields_follow_extracted_fields() {
        let extracted = vec![ContentField::new("title", "A Title")];
        let record = Record::build(extracted, &document(None), &Pid::new("10.5072/0042"));

        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", DOCTYPE_FIELD, IDENTIFIER_FIELD]);
    }

    #[test]
    fn anchor_doctype_precedes_doctype() {
        let record = Record::build(
            Vec::new(),
            &document(Some("MultiVolumeWork")),
            &Pid::new("10.5072/0042"),
        );

        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![ANCHOR_DOCTYPE_FIELD, DOCTYPE_FIELD, IDENTIFIER_FIELD]
        );
        assert_eq!(record.fields()[0].value, "MultiVolumeWork");
    }

    #[test]
    fn identifier_is_last_field() {
        let record = Record::build(
            vec![ContentField::new("title", "A Title")],
            &document(Some("MultiVolumeWork")),
            &Pid::new("10.5072/0042"),
        );
        let last = record.fields().last().unwrap();
        assert_eq!(last.name, IDENTIFIER_FIELD);
        assert_eq!(last.value, "10.5072/0042");
    }

    #[test]
    fn xml_document_contains_one_element_per_field() {
        let record = Record::build(
            vec![
                ContentField::new("creator", "Doe, J."),
                ContentField::new("creator", "Roe, R."),
            ],
            &document(None),
            &Pid::new("10.5072/0042"),
        );

        let xml = record.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<creator>Doe, J.</creator>"));
        assert!(xml.contains("<creator>Roe, R.</creator>"));
        assert!(xml.contains("<PIDMINT-PID>10.5072/0042</PIDMINT-PID>"));
        assert!(xml.contains("<record>") && xml.contains("</record>"));
    }

    #[test]
    fn xml_text_content_is_escaped() {
        let record = Record::build(
            vec![ContentField::new("title", "Maps & Charts <1850>")],
            &document(None),
            &Pid::new("10.5072/0042"),
        );

        let xml = record.to_xml().unwrap();
        assert!(xml.contains("Maps &amp; Charts &lt;1850&gt;"));
    }

    #[test]
    fn element_name_validation() {
        assert!(is_valid_element_name("title"));
        assert!(is_valid_element_name("PIDMINT-DOCTYPE"));
        assert!(is_valid_element_name("_internal"));
        assert!(!is_valid_element_name(""));
        assert!(!is_valid_element_name("1title"));
        assert!(!is_valid_element_name("has space"));
        assert!(!is_valid_element_name("bad<name"));
    }
}
