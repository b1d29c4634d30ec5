/// Errors that can occur when creating an audio format token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    /// The input was empty or contained only whitespace
    #[error("format cannot be empty")]
    Empty,
    /// The input started with a dot (`.mp3` instead of `mp3`)
    #[error("format must not start with '.': {0}")]
    LeadingDot(String),
    /// The input contained a character that cannot appear in a file extension
    #[error("format contains invalid character {1:?}: {0}")]
    InvalidCharacter(String, char),
}

/// A lowercase file-extension token naming a recording's original format.
///
/// The token is opaque: `mp3`, `wav` or `x-unknown` are all accepted, as no codec is checked.
/// It must however survive being used as the final extension of a file name and being
/// recovered by splitting on the last `.`, so dots, path separators, whitespace and control
/// characters are rejected. Input is trimmed and lowercased during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFormat(String);

impl AudioFormat {
    /// Creates a new `AudioFormat` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the trimmed input is empty, starts with `.`, or contains a
    /// character not allowed in an extension.
    pub fn new(input: impl AsRef<str>) -> Result<Self, FormatError> {
        let token = input.as_ref().trim().to_lowercase();
        if token.is_empty() {
            return Err(FormatError::Empty);
        }
        if token.starts_with('.') {
            return Err(FormatError::LeadingDot(token));
        }
        if let Some(bad) = token
            .chars()
            .find(|c| matches!(c, '.' | '/' | '\\') || c.is_whitespace() || c.is_control())
        {
            return Err(FormatError::InvalidCharacter(token, bad));
        }
        Ok(Self(token))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AudioFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioFormat::new(s)
    }
}

impl serde::Serialize for AudioFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for AudioFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AudioFormat::new(&s).map_err(serde::de::Error::custom)
    }
}
