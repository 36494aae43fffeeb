// ABOUTME: Defines the address families, resolved-address results, and operator extras entries.
// ABOUTME: ResolvedAddress keeps the disabled/error states apart from real address values.

use std::fmt;

use thiserror::Error;

/// An internet address family that myipd can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Both families in listing order.
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("ipv4"),
            AddressFamily::V6 => f.write_str("ipv6"),
        }
    }
}

/// Outcome of looking up the public address for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAddress {
    /// The family is turned off in the configuration; no lookup was made.
    Disabled,
    /// The lookup was attempted and failed.
    Error,
    /// The address as reported by the upstream lookup service.
    Value(String),
}

/// Errors produced when a line of the extras file cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtraLineError {
    #[error("line is blank")]
    Blank,

    #[error("line is not valid UTF-8")]
    NotUtf8,

    #[error("line has an empty field (check for doubled, leading, or trailing spaces)")]
    EmptyField,

    #[error("expected `<address>` or `<tag> <address>`, found {0} fields")]
    TooManyFields(usize),
}

/// An operator-configured address reported alongside the live lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraEntry {
    pub tag: Option<String>,
    pub address: String,
}

impl ExtraEntry {
    /// Parse one non-comment line of the extras file.
    ///
    /// Fields are separated by single spaces. One field is a bare address, two
    /// fields are `<tag> <address>`. Anything else is rejected, as is any line
    /// that would yield an empty tag or address.
    pub fn parse_line(line: &str) -> Result<Self, ExtraLineError> {
        if line.trim().is_empty() {
            return Err(ExtraLineError::Blank);
        }

        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() > 2 {
            return Err(ExtraLineError::TooManyFields(fields.len()));
        }
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ExtraLineError::EmptyField);
        }

        match fields.as_slice() {
            [address] => Ok(Self {
                tag: None,
                address: (*address).to_string(),
            }),
            [tag, address] => Ok(Self {
                tag: Some((*tag).to_string()),
                address: (*address).to_string(),
            }),
            _ => Err(ExtraLineError::Blank),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_only() {
        let entry = ExtraEntry::parse_line("192.168.1.10").unwrap();
        assert_eq!(entry.tag, None);
        assert_eq!(entry.address, "192.168.1.10");
    }

    #[test]
    fn parse_tag_and_address() {
        let entry = ExtraEntry::parse_line("home 10.0.0.5").unwrap();
        assert_eq!(entry.tag.as_deref(), Some("home"));
        assert_eq!(entry.address, "10.0.0.5");
    }

    #[test]
    fn parse_rejects_three_fields() {
        let err = ExtraEntry::parse_line("lan office 10.0.0.6").unwrap_err();
        assert_eq!(err, ExtraLineError::TooManyFields(3));
    }

    #[test]
    fn parse_rejects_tag_without_address() {
        assert_eq!(
            ExtraEntry::parse_line("home ").unwrap_err(),
            ExtraLineError::EmptyField
        );
        assert_eq!(
            ExtraEntry::parse_line(" 10.0.0.5").unwrap_err(),
            ExtraLineError::EmptyField
        );
    }

    #[test]
    fn parse_rejects_doubled_space() {
        // "a  b" splits into three fields on single spaces
        assert_eq!(
            ExtraEntry::parse_line("home  10.0.0.5").unwrap_err(),
            ExtraLineError::TooManyFields(3)
        );
    }

    #[test]
    fn parse_rejects_whitespace_only() {
        assert_eq!(
            ExtraEntry::parse_line("   ").unwrap_err(),
            ExtraLineError::Blank
        );
    }

    #[test]
    fn family_display_is_lowercase() {
        assert_eq!(AddressFamily::V4.to_string(), "ipv4");
        assert_eq!(AddressFamily::V6.to_string(), "ipv6");
    }
}
