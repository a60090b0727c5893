use std::{env, fmt, str::FromStr};

/// Operating system family the menu is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    /// Any identifier outside the three desktop families. The menu is left as the base template.
    Other(String),
}

impl Platform {
    /// Accepts both the shell's identifiers (`darwin`, `win32`, `linux`) and Rust's
    /// `std::env::consts::OS` values (`macos`, `windows`).
    pub fn from_identifier(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Platform::MacOs,
            "win32" | "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Other(id.trim().to_string()),
        }
    }

    pub fn current() -> Self {
        Self::from_identifier(env::consts::OS)
    }

    pub fn is_mac(&self) -> bool {
        matches!(self, Platform::MacOs)
    }

    pub fn identifier(&self) -> &str {
        match self {
            Platform::MacOs => "darwin",
            Platform::Windows => "win32",
            Platform::Linux => "linux",
            Platform::Other(id) => id,
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_identifier(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
