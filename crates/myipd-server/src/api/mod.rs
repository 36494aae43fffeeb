// ABOUTME: API module containing the HTTP handler functions for myipd.
// ABOUTME: The address listing and reload actions live in `ip`.

pub mod ip;
