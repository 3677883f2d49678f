//! Utility Functions Module
//!
//! Helpers shared by the codec modules and handy when looking at captured
//! traffic.
//!
//! # Overview
//!
//! Utilities provided include:
//! - The [`generate_custom_enum!`](crate::generate_custom_enum) macro behind
//!   every enumeration in [`crate::object`]
//! - Hex dumps of wire data
//! - Human readable dates and times, wildcards included
//! - A best-effort description of a stream of tagged values
//!
//! # Example
//!
//! ```
//! use bacnet_codec::util::{debug, hex_dump};
//!
//! let data = [0x0C, 0x00, 0x00, 0x00, 0x01, 0x19, 0x55];
//! assert!(hex_dump(&data, "").starts_with("0000: 0C 00 00 00 01 19 55"));
//! assert_eq!(debug::describe_tagged(&data), "[0] raw 0x00000001 [1] raw 0x55");
//! ```

pub mod enum_macros;

use crate::encoding::payload::UNSPECIFIED;
use crate::encoding::{DatePayload, TimePayload};

/// Implements [`Serializable`](crate::encoding::Serializable) for a struct
/// written as the plain sequence of its fields
macro_rules! impl_serializable_sequence {
    ($name:ident, $scope:literal, [$($field:ident),+ $(,)?]) => {
        impl $crate::encoding::Serializable for $name {
            fn serialize(
                &self,
                buffer: &mut $crate::io::WriteBuffer,
            ) -> $crate::error::SerializeResult<()> {
                buffer.scoped($scope, |buffer| {
                    $($crate::encoding::Serializable::serialize(&self.$field, buffer)?;)+
                    Ok(())
                })
            }

            fn length_in_bits(&self) -> u32 {
                0 $(+ $crate::encoding::Serializable::length_in_bits(&self.$field))+
            }
        }
    };
}

pub(crate) use impl_serializable_sequence;

/// Hex dump in rows of 16 bytes with an ASCII column
pub fn hex_dump(data: &[u8], prefix: &str) -> String {
    let mut result = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        let hex = hex::encode_upper(chunk);
        let mut bytes: Vec<&str> = Vec::with_capacity(16);
        for j in 0..chunk.len() {
            bytes.push(&hex[j * 2..j * 2 + 2]);
        }
        let mut row = bytes.join(" ");
        // pad short rows so the ASCII column lines up
        row.push_str(&"   ".repeat(16 - chunk.len()));

        let ascii: String = chunk
            .iter()
            .map(|byte| {
                if byte.is_ascii_graphic() || *byte == b' ' {
                    *byte as char
                } else {
                    '.'
                }
            })
            .collect();

        result.push_str(&format!("{}{:04X}: {} |{}|\n", prefix, i * 16, row, ascii));
    }

    result
}

/// Describe a date, spelling out the wildcard and special values
pub fn describe_date(date: &DatePayload) -> String {
    let year_str = match date.year() {
        Some(year) => year.to_string(),
        None => String::from("*"),
    };
    let month_str = match date.month {
        DatePayload::ODD_MONTHS => String::from("odd"),
        DatePayload::EVEN_MONTHS => String::from("even"),
        UNSPECIFIED => String::from("*"),
        month => month.to_string(),
    };
    let day_str = match date.day_of_month {
        DatePayload::LAST_DAY_OF_MONTH => String::from("last"),
        DatePayload::ODD_DAYS => String::from("odd"),
        DatePayload::EVEN_DAYS => String::from("even"),
        UNSPECIFIED => String::from("*"),
        day => day.to_string(),
    };
    let weekday_str = match date.day_of_week {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        UNSPECIFIED => "*",
        _ => "?",
    };

    format!("{}/{}/{} ({})", year_str, month_str, day_str, weekday_str)
}

/// Describe a time as `hh:mm:ss.hh`, wildcards as `*`
pub fn describe_time(time: &TimePayload) -> String {
    let part = |value: u8| {
        if value == UNSPECIFIED {
            String::from("*")
        } else {
            format!("{:02}", value)
        }
    };

    format!(
        "{}:{}:{}.{}",
        part(time.hour),
        part(time.minute),
        part(time.second),
        part(time.fractional)
    )
}

/// Diagnostics for captured frames
pub mod debug {
    use crate::encoding::ConstructedElement;
    use crate::io::ReadBuffer;

    /// Describe a sequence of tagged values without schema information
    ///
    /// Context primitives are shown as raw octets. Whatever cannot be parsed
    /// is appended as hex.
    pub fn describe_tagged(data: &[u8]) -> String {
        let mut buffer = ReadBuffer::new(data);
        let mut parts = Vec::new();
        while !buffer.is_at_end() {
            let start = buffer.pos();
            match ConstructedElement::parse(&mut buffer) {
                Ok(ConstructedElement::Application(value)) => parts.push(value.to_string()),
                Ok(ConstructedElement::Context(value)) => parts.push(value.to_string()),
                Ok(ConstructedElement::Constructed(value)) => parts.push(value.to_string()),
                Err(err) => {
                    parts.push(format!(
                        "<{}: {}>",
                        err,
                        hex::encode(&data[start / 8..])
                    ));
                    break;
                }
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump() {
        let dump = hex_dump(b"BACnet\x00\x01", "> ");
        assert_eq!(
            dump,
            format!("> 0000: 42 41 43 6E 65 74 00 01{} |BACnet..|\n", "   ".repeat(8))
        );

        let long: Vec<u8> = (0u8..20).collect();
        let dump = hex_dump(&long, "");
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.lines().nth(1).unwrap().starts_with("0010: 10 11 12 13"));
    }

    #[test]
    fn test_describe_date() {
        let date = DatePayload::new(Some(2024), 3, 15, 5);
        assert_eq!(describe_date(&date), "2024/3/15 (Fri)");

        let date = DatePayload::new(
            None,
            DatePayload::EVEN_MONTHS,
            DatePayload::LAST_DAY_OF_MONTH,
            UNSPECIFIED,
        );
        assert_eq!(describe_date(&date), "*/even/last (*)");
    }

    #[test]
    fn test_describe_time() {
        let time = TimePayload::new(14, 30, 5, 25);
        assert_eq!(describe_time(&time), "14:30:05.25");

        let time = TimePayload::new(UNSPECIFIED, 0, UNSPECIFIED, UNSPECIFIED);
        assert_eq!(describe_time(&time), "*:00:*.*");
    }

    #[test]
    fn test_describe_tagged() {
        let data = hex::decode("2105").unwrap();
        assert_eq!(debug::describe_tagged(&data), "5");

        let data = hex::decode("3E21053F").unwrap();
        assert_eq!(debug::describe_tagged(&data), "{3: 5 }");

        let truncated = hex::decode("4442").unwrap();
        assert!(debug::describe_tagged(&truncated).ends_with("4442>"));
    }
}
