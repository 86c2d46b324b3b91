//! Parsing of the line-oriented terminal commands.

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the search screen
    Search,
    Back,
    Home,
    /// Look up a city by name
    Find(String),
    /// Look up the n-th recent search, 1-based
    Recent(usize),
    Locate,
    /// Forget recent searches
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: find <city>")]
    MissingCity,

    #[error("Usage: recent <n>, where n is the number shown next to the entry")]
    InvalidIndex,
}

impl Command {
    /// Parse a line. Blank lines give `Ok(None)`.
    ///
    /// Keywords are single words matched case-insensitively; any other text
    /// is taken as a city name. `find <city>` looks up a city whose name
    /// collides with a keyword.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_ascii_lowercase().as_str(), rest) {
            ("search", "") => Self::Search,
            ("back", "") => Self::Back,
            ("home", "") => Self::Home,
            ("locate", "") => Self::Locate,
            ("clear", "") => Self::Clear,
            ("help" | "?", "") => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            ("find", "") => return Err(CommandError::MissingCity),
            ("find", city) => Self::Find(city.to_string()),
            ("recent", index) => match index.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Recent(n),
                _ => return Err(CommandError::InvalidIndex),
            },
            _ => Self::Find(line.to_string()),
        };

        Ok(Some(command))
    }
}
