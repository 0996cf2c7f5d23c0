/// Errors that can occur when creating validated primitive types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a valid health number
    #[error("Invalid health number: {0}")]
    InvalidHealthNumber(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A patient health number (HN), the cross-reference key for case records.
///
/// The HN is an opaque identifier issued elsewhere; this type only applies
/// defensive guardrails so the value is safe to embed in logs and lookups:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Restricts characters to a conservative ASCII set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HealthNumber(String);

impl HealthNumber {
    /// Minimum accepted HN length after trimming.
    pub const MIN_LEN: usize = 2;
    /// Maximum accepted HN length after trimming.
    pub const MAX_LEN: usize = 24;

    /// Creates a new `HealthNumber` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidHealthNumber` if the trimmed input is
    /// empty, out of bounds, or contains characters outside
    /// alphanumeric, '.', '-'.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();

        if trimmed.is_empty() {
            return Err(TextError::InvalidHealthNumber(
                "health number cannot be empty".into(),
            ));
        }

        if trimmed.len() < Self::MIN_LEN || trimmed.len() > Self::MAX_LEN {
            return Err(TextError::InvalidHealthNumber(format!(
                "health number length must be between {} and {} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }

        let ok = trimmed
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-'));

        if !ok {
            return Err(TextError::InvalidHealthNumber(
                "health number contains invalid characters (only alphanumeric, '.', '-' allowed)"
                    .into(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HealthNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HealthNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for HealthNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for HealthNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HealthNumber::new(&s).map_err(serde::de::Error::custom)
    }
}
