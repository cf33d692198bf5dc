//! Document information dictionary decoding.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use doc_model::AttributeValue;
use lopdf::{Dictionary, Document, Object};

const DATE_KEYS: [&[u8]; 2] = [b"CreationDate", b"ModDate"];

pub(crate) fn read_info_dictionary(doc: &Document) -> Vec<(String, AttributeValue)> {
    let Some(info) = info_dictionary(doc) else {
        return Vec::new();
    };

    info.iter()
        .map(|(key, value)| {
            let name = String::from_utf8_lossy(key).into_owned();
            let value = if DATE_KEYS.contains(&key.as_slice()) {
                date_value(doc, value)
            } else {
                attribute_value(doc, value, true)
            };
            (name, value)
        })
        .collect()
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn date_value(doc: &Document, object: &Object) -> AttributeValue {
    if let Object::String(bytes, _) = object {
        let text = decode_text_string(bytes);
        return match parse_pdf_date(&text) {
            Some(date) => AttributeValue::Date(date),
            None => AttributeValue::Text(text),
        };
    }

    attribute_value(doc, object, true)
}

/// References are followed once; nested references are shown as `n g R`.
fn attribute_value(doc: &Document, object: &Object, resolve: bool) -> AttributeValue {
    match object {
        Object::Null => AttributeValue::Other("null".to_owned()),
        Object::Boolean(value) => AttributeValue::Bool(*value),
        Object::Integer(value) => AttributeValue::Integer(*value),
        Object::Real(value) => AttributeValue::Real(f64::from(*value)),
        Object::Name(name) => AttributeValue::Text(String::from_utf8_lossy(name).into_owned()),
        Object::String(bytes, _) => AttributeValue::Text(decode_text_string(bytes)),
        Object::Array(items) => AttributeValue::List(
            items.iter().map(|item| attribute_value(doc, item, false)).collect(),
        ),
        Object::Dictionary(dict) => AttributeValue::Other(format!("<<{} entries>>", dict.len())),
        Object::Stream(stream) => {
            AttributeValue::Other(format!("stream ({} bytes)", stream.content.len()))
        }
        Object::Reference((number, generation)) => match doc.get_object((*number, *generation)) {
            Ok(target) if resolve => attribute_value(doc, target, false),
            _ => AttributeValue::Other(format!("{number} {generation} R")),
        },
    }
}

/// Decodes a PDF text string: UTF-16BE when it carries a byte order mark,
/// UTF-8 with a BOM, otherwise one byte per character.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = rest.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    bytes.iter().map(|byte| char::from(*byte)).collect()
}

/// Parses `D:YYYYMMDDHHmmSSOHH'mm'`. Everything after the year is optional.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let body = raw.strip_prefix("D:").unwrap_or(raw);

    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_offset(&body[digits.len()..])?;

    offset.from_local_datetime(&naive).single()
}

fn parse_offset(rest: &str) -> Option<FixedOffset> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None | Some('Z') | Some('z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let digits: String = chars.filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2).map_or(Some(0), |part| part.parse().ok())?;
    let minutes: i32 = digits.get(2..4).map_or(Some(0), |part| part.parse().ok())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn decodes_utf16_with_bom() {
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x58, 0x00, 0x50]), "XP");
    }

    #[test]
    fn decodes_single_byte_strings() {
        assert_eq!(decode_text_string(b"J. Doe"), "J. Doe");
        assert_eq!(decode_text_string(&[0x63, 0x61, 0x66, 0xE9]), "caf\u{e9}");
    }

    #[test]
    fn parses_full_pdf_date_with_offset() {
        let date = parse_pdf_date("D:20231031120530+02'00'").expect("valid date");

        assert_eq!((date.year(), date.month(), date.day()), (2023, 10, 31));
        assert_eq!((date.hour(), date.minute(), date.second()), (12, 5, 30));
        assert_eq!(date.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn parses_partial_dates_with_defaults() {
        let date = parse_pdf_date("D:2005").expect("year only is valid");
        assert_eq!((date.year(), date.month(), date.day()), (2005, 1, 1));

        let utc = parse_pdf_date("D:20231031120000Z").expect("utc date");
        assert_eq!(utc.offset().local_minus_utc(), 0);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_pdf_date("yesterday").is_none());
        assert!(parse_pdf_date("D:20231345").is_none());
    }
}
