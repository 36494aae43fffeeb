// ABOUTME: Renders resolved internet addresses and extras into the plain-text listing body.
// ABOUTME: Disabled families are omitted; failed lookups render as the error sentinel.

use std::fmt::Write;

use crate::model::{AddressFamily, ExtraEntry, ResolvedAddress};

pub const IPV4_TAG: &str = "[internet][ipv4]";
pub const IPV6_TAG: &str = "[internet][ipv6]";

/// Text shown in place of an address whose lookup failed.
pub const ERROR_SENTINEL: &str = "!ERROR!";

/// One line of the listing before tag rendering is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine<'a> {
    pub tag: Option<&'a str>,
    pub address: &'a str,
}

impl<'a> ListingLine<'a> {
    fn internet(family: AddressFamily, resolved: &'a ResolvedAddress) -> Option<Self> {
        let tag = match family {
            AddressFamily::V4 => IPV4_TAG,
            AddressFamily::V6 => IPV6_TAG,
        };
        let address = match resolved {
            ResolvedAddress::Disabled => return None,
            ResolvedAddress::Error => ERROR_SENTINEL,
            ResolvedAddress::Value(addr) => addr.as_str(),
        };
        Some(Self {
            tag: Some(tag),
            address,
        })
    }

    fn extra(entry: &'a ExtraEntry) -> Self {
        Self {
            tag: entry.tag.as_deref(),
            address: &entry.address,
        }
    }
}

/// Collect listing lines in output order: IPv4, IPv6, then extras in file order.
pub fn listing_lines<'a>(
    ipv4: &'a ResolvedAddress,
    ipv6: &'a ResolvedAddress,
    extras: &'a [ExtraEntry],
) -> Vec<ListingLine<'a>> {
    let mut lines = Vec::with_capacity(2 + extras.len());
    lines.extend(ListingLine::internet(AddressFamily::V4, ipv4));
    lines.extend(ListingLine::internet(AddressFamily::V6, ipv6));
    lines.extend(extras.iter().map(ListingLine::extra));
    lines
}

/// Render the listing body. Every line, including the last, ends with `\n`.
/// With `show_tags` false every line is the bare address.
pub fn render_listing(
    ipv4: &ResolvedAddress,
    ipv6: &ResolvedAddress,
    extras: &[ExtraEntry],
    show_tags: bool,
) -> String {
    let mut body = String::new();
    for line in listing_lines(ipv4, ipv6, extras) {
        match line.tag {
            Some(tag) if show_tags => {
                let _ = writeln!(body, "{} {}", tag, line.address);
            }
            _ => {
                let _ = writeln!(body, "{}", line.address);
            }
        }
    }
    body
}
