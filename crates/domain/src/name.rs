use derive_more::{AsRef, Display};

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LENGTH: usize = 50;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > Self::MAX_LENGTH {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }

    /// Append `suffix`, shortening the base so the result stays within
    /// `MAX_LENGTH`.
    #[must_use]
    pub fn suffixed(&self, suffix: &str) -> Name {
        let available = Self::MAX_LENGTH.saturating_sub(suffix.chars().count());
        let base = self.0.chars().take(available).collect::<String>();
        Name(format!("{}{suffix}", base.trim_end()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 50 characters or fewer ({0} > 50)")]
    TooLong(usize),
}
