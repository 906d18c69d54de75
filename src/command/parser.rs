/// Character every command starts with
pub const COMMAND_PREFIX: char = '!';

/// A recognized chat command with its raw argument text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    SetKeyword(&'a str),
    SetPrice(&'a str),
    SetInterval(&'a str),
    SetMarketplace(&'a str),
    Status,
    Clear,
    /// Prefixed text that names no known command
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a chat message
    ///
    /// Returns `None` for text that does not start with the command prefix.
    /// Arguments are passed through trimmed and otherwise untouched; their
    /// validation belongs to the search configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use marketplace_relay::command::Command;
    ///
    /// assert_eq!(Command::parse("!set_price 10 50"), Some(Command::SetPrice("10 50")));
    /// assert_eq!(Command::parse("hello"), None);
    /// ```
    pub fn parse(text: &'a str) -> Option<Self> {
        let body = text.trim().strip_prefix(COMMAND_PREFIX)?;
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };

        // Names are case-sensitive; arguments keep their case for the handlers
        let command = match name {
            "help" => Self::Help,
            "set_keyword" => Self::SetKeyword(args),
            "set_price" => Self::SetPrice(args),
            "set_interval" => Self::SetInterval(args),
            "set_marketplace" => Self::SetMarketplace(args),
            "status" => Self::Status,
            "clear" => Self::Clear,
            _ => Self::Unknown(name),
        };
        Some(command)
    }
}
