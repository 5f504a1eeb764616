use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

use crate::util::enum_meta::{enum_meta, EnumMeta};

// === Errors === //

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("illegal invocation: `emoji` must be given options explicitly, e.g. `{{ convert: \"encode\" }}`")]
    MissingOptions,
    #[error("illegal invocation: `options.convert` is required and must be `encode` or `decode`")]
    MissingConvert,
    #[error("illegal invocation: `{0}` is not a valid value for `options.convert`, expected `encode` or `decode`")]
    InvalidConvert(String),
    #[error("emoji dataset contains no records")]
    EmptyDataset,
    #[error("malformed emoji record {name:?} => {unicode:?}: {reason}")]
    MalformedRecord {
        name: String,
        unicode: String,
        reason: &'static str,
    },
}

// === Convert === //

enum_meta! {
    /// The canonical form an attached plugin keeps symbol tokens in.
    #[derive(Debug)]
    pub enum(&'static str) Convert {
        /// Rewrite `:name:` shortcodes to unicode.
        Encode = "encode",
        /// Rewrite unicode emoji to `:name:` shortcodes.
        Decode = "decode",
    }
}

impl Convert {
    pub fn name(self) -> &'static str {
        *self.meta()
    }
}

impl FromStr for Convert {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find_by_meta(|name| *name == s)
            .ok_or_else(|| ConfigError::InvalidConvert(s.to_string()))
    }
}

impl Display for Convert {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// === Options === //

/// Caller-supplied configuration for [Emoji](super::Emoji). `convert` is validated when the
/// plugin is built, not here.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EmojiOptions {
    pub convert: Option<String>,
}

impl EmojiOptions {
    pub fn new(convert: impl Into<String>) -> Self {
        Self {
            convert: Some(convert.into()),
        }
    }

    pub fn validate(&self) -> Result<Convert, ConfigError> {
        match self.convert.as_deref() {
            None | Some("") => Err(ConfigError::MissingConvert),
            Some(convert) => convert.parse(),
        }
    }
}

impl From<Convert> for EmojiOptions {
    fn from(convert: Convert) -> Self {
        Self::new(convert.name())
    }
}

#[test]
fn convert_parses_exact_names() {
    assert_eq!("encode".parse::<Convert>(), Ok(Convert::Encode));
    assert_eq!("decode".parse::<Convert>(), Ok(Convert::Decode));
    assert_eq!(
        "Encode".parse::<Convert>(),
        Err(ConfigError::InvalidConvert("Encode".to_string()))
    );
    assert_eq!(Convert::Decode.to_string(), "decode");
}

#[test]
fn options_require_convert() {
    assert_eq!(EmojiOptions::default().validate(), Err(ConfigError::MissingConvert));
    assert_eq!(EmojiOptions::new("").validate(), Err(ConfigError::MissingConvert));
    assert_eq!(
        EmojiOptions::new("both").validate(),
        Err(ConfigError::InvalidConvert("both".to_string()))
    );
    assert_eq!(EmojiOptions::from(Convert::Encode).validate(), Ok(Convert::Encode));
}
