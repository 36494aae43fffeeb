// ABOUTME: Core library for myipd, containing the address, extras, and request domain types.
// ABOUTME: Pure logic with no I/O, shared by the store and server crates.

pub mod listing;
pub mod model;
pub mod request;

pub use listing::{ERROR_SENTINEL, IPV4_TAG, IPV6_TAG, ListingLine, listing_lines, render_listing};
pub use model::{AddressFamily, ExtraEntry, ExtraLineError, ResolvedAddress};
pub use request::{Action, parse_tag_switch};

/// Crate version reported by the banner and the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Release codename shown next to the version.
pub const CODENAME: &str = "TinaSprout";
