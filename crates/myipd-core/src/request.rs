// ABOUTME: Parses the `action` and `tags` query values of a myipd request.
// ABOUTME: Actions map to listing or reload operations; tags accepts the usual boolean spellings.

/// What an authenticated request asks the service to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Resolve the public addresses and list them with the extras.
    GetIp,
    /// Re-read both the tokens file and the extras file.
    ReloadAll,
    ReloadTokens,
    ReloadExtras,
}

impl Action {
    /// Map an `action` query value to an Action. A missing value is treated
    /// the same as an empty one. Returns None for unknown actions.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.unwrap_or("") {
            "" | "get-ip" | "get-ip-addr" => Some(Action::GetIp),
            "reload" | "reload-all" => Some(Action::ReloadAll),
            "reload-tokens" => Some(Action::ReloadTokens),
            "reload-extras" => Some(Action::ReloadExtras),
            _ => None,
        }
    }

    pub fn reloads_tokens(self) -> bool {
        matches!(self, Action::ReloadAll | Action::ReloadTokens)
    }

    pub fn reloads_extras(self) -> bool {
        matches!(self, Action::ReloadAll | Action::ReloadExtras)
    }

    /// Name used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::GetIp => "get-ip",
            Action::ReloadAll => "reload-all",
            Action::ReloadTokens => "reload-tokens",
            Action::ReloadExtras => "reload-extras",
        }
    }
}

/// Interpret a `tags` query value.
///
/// Returns Some(true) or Some(false) for the recognized spellings and None for
/// anything else, leaving the default to the caller.
pub fn parse_tag_switch(value: &str) -> Option<bool> {
    match value {
        "" | "true" | "yes" | "on" | "1" | "t" => Some(true),
        "false" | "no" | "off" | "0" | "f" => Some(false),
        _ => None,
    }
}
