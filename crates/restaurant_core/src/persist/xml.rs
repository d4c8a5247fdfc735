//! XML extent documents.
//!
//! Shape:
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <ArrayOfTable>
//!   <Metadata>
//!     <GeneratedBy>restaurant_core</GeneratedBy>
//!     <GeneratedOn>2026-10-19 18:04:11</GeneratedOn>
//!   </Metadata>
//!   <Table>...</Table>
//! </ArrayOfTable>
//! ```
//!
//! # Invariants
//! - Record elements are named `Entity::KIND`; other root children are skipped.
//! - Text content is trimmed on read, so constructors store string fields
//!   trimmed.

use super::{ExtentMetadata, PersistResult};
use crate::extent::Entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{DeError, Reader, SeError, Writer};

const INDENT_SIZE: usize = 2;

fn root_name<T: Entity>() -> String {
    format!("ArrayOf{}", T::KIND)
}

pub(super) fn encode<T: Entity>(records: &[T], metadata: &ExtentMetadata) -> PersistResult<String> {
    let root = root_name::<T>();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(root.as_str())))?;
    writer
        .create_element("Metadata")
        .write_inner_content(|inner| {
            inner
                .create_element("GeneratedBy")
                .write_text_content(BytesText::new(&metadata.generated_by))?;
            inner
                .create_element("GeneratedOn")
                .write_text_content(BytesText::new(&metadata.generated_on))?;
            Ok(())
        })?;
    for record in records {
        writer.write_serializable(T::KIND, record)?;
    }
    writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;

    let mut document = String::from_utf8(writer.into_inner())
        .map_err(|err| SeError::from(err.utf8_error()))?;
    document.push('\n');
    Ok(document)
}

pub(super) fn decode<T: Entity>(text: &str) -> PersistResult<Vec<T>> {
    Ok(read_records(text)?)
}

fn read_records<T: Entity>(text: &str) -> Result<Vec<T>, DeError> {
    let root = root_name::<T>();
    let mut reader = Reader::from_str(text);
    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let start = position(&reader);
        match reader.read_event()? {
            Event::Start(element) if depth == 0 => {
                if element.name().as_ref() != root.as_bytes() {
                    return Err(unexpected_root(&root, element.name().as_ref()));
                }
                saw_root = true;
                depth = 1;
            }
            Event::Start(element) if depth == 1 && element.name().as_ref() == T::KIND.as_bytes() => {
                reader.read_to_end(element.name())?;
                records.push(quick_xml::de::from_str(&text[start..position(&reader)])?);
            }
            Event::Empty(element) if depth == 1 && element.name().as_ref() == T::KIND.as_bytes() => {
                records.push(quick_xml::de::from_str(&text[start..position(&reader)])?);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(element) if depth == 0 => {
                if element.name().as_ref() != root.as_bytes() {
                    return Err(unexpected_root(&root, element.name().as_ref()));
                }
                saw_root = true;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(DeError::Custom(format!("missing <{root}> root element")));
    }
    Ok(records)
}

fn position(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn unexpected_root(expected: &str, found: &[u8]) -> DeError {
    DeError::Custom(format!(
        "expected <{expected}> root element, found <{}>",
        String::from_utf8_lossy(found)
    ))
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::customer::Customer;
    use crate::model::table::Table;
    use crate::persist::ExtentMetadata;

    fn metadata() -> ExtentMetadata {
        ExtentMetadata {
            generated_by: "restaurant_core".to_string(),
            generated_on: "2026-10-19 18:04:11".to_string(),
        }
    }

    #[test]
    fn encode_puts_metadata_first_under_kind_root() {
        let tables = vec![Table::new(1, 4, "Booth").expect("valid table")];
        let xml = encode(&tables, &metadata()).expect("tables should encode");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<ArrayOfTable>"));
        let metadata_at = xml.find("<Metadata>").expect("metadata element");
        let record_at = xml.find("<Table>").expect("record element");
        assert!(metadata_at < record_at);
        assert!(xml.contains("<GeneratedBy>restaurant_core</GeneratedBy>"));
        assert!(xml.contains("<GeneratedOn>2026-10-19 18:04:11</GeneratedOn>"));
        assert!(xml.contains("<table_type>Booth</table_type>"));
        assert!(xml.trim_end().ends_with("</ArrayOfTable>"));
    }

    #[test]
    fn decode_reads_linked_records_back() {
        let mut first = Table::new(2, 6, "Window").expect("valid table");
        first.reservation_ids = vec![4, 9];
        let second = Table::new(3, 2, "Bar").expect("valid table");
        let xml = encode(&[first.clone(), second.clone()], &metadata()).expect("tables should encode");

        let decoded: Vec<Table> = decode(&xml).expect("encoded tables should decode");
        assert_eq!(decoded, vec![first, second]);
    }

    #[test]
    fn decode_accepts_empty_extent() {
        let xml = encode::<Table>(&[], &metadata()).expect("empty extent should encode");
        let decoded: Vec<Table> = decode(&xml).expect("empty extent should decode");
        assert!(decoded.is_empty());
    }

    #[test]
    fn decode_accepts_document_without_metadata() {
        let text = "<ArrayOfCustomer><Customer><id>5</id><membership>member</membership></Customer></ArrayOfCustomer>";
        let decoded: Vec<Customer> = decode(text).expect("bare records should decode");
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].is_member());
    }

    #[test]
    fn decode_rejects_truncated_and_foreign_documents() {
        assert!(decode::<Table>("<ArrayOfTable><Table><id>1</id><chairs>").is_err());
        let customers = encode(&[Customer::new(1).expect("valid customer")], &metadata())
            .expect("customers should encode");
        assert!(decode::<Table>(&customers).is_err());
    }
}
