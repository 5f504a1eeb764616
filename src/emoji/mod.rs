//! # Emoji unification
//!
//! A [Plugin] that puts every emoji in a sentence into a single [TokenKind::Symbol] token and
//! keeps that token's text in one canonical form, either unicode (`encode`) or `:shortcode:`
//! (`decode`).
//!
//! ```
//! use emoji_tokens::emoji::{Emoji, EmojiOptions};
//! use emoji_tokens::syntax::{Processor, Token};
//!
//! let emoji = Emoji::new(Some(EmojiOptions::new("encode"))).unwrap();
//! let mut processor = Processor::new();
//! processor.use_plugin(&emoji);
//!
//! let mut sentence = vec![Token::punct(":"), Token::word("smile"), Token::punct(":")];
//! processor.run_sentence(&mut sentence);
//! assert_eq!(sentence, [Token::symbol("😄")]);
//! ```
//!
//! [TokenKind::Symbol]: crate::syntax::TokenKind::Symbol

use std::sync::Arc;

use derive_where::derive_where;

use crate::syntax::{Plugin, Processor};

pub mod codec;
pub mod config;
pub mod merge;
pub mod tables;

pub use config::{ConfigError, Convert, EmojiOptions};
pub use merge::MergeEmoji;
pub use tables::EmojiTables;

#[derive(Clone)]
#[derive_where(Debug)]
pub struct Emoji {
    convert: Convert,
    #[derive_where(skip)]
    tables: Arc<EmojiTables>,
}

impl Emoji {
    /// Validates `options` and builds a plugin over the shared gemoji tables.
    pub fn new(options: Option<EmojiOptions>) -> Result<Self, ConfigError> {
        let convert = Self::validate(options)?;
        Ok(Self {
            convert,
            tables: EmojiTables::gemoji()?,
        })
    }

    pub fn with_tables(
        options: Option<EmojiOptions>,
        tables: Arc<EmojiTables>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            convert: Self::validate(options)?,
            tables,
        })
    }

    fn validate(options: Option<EmojiOptions>) -> Result<Convert, ConfigError> {
        options.ok_or(ConfigError::MissingOptions)?.validate()
    }

    pub fn convert(&self) -> Convert {
        self.convert
    }
}

impl Plugin for Emoji {
    fn attach(&self, processor: &mut Processor) {
        log::debug!("Attaching emoji plugin ({}).", self.convert);

        // Emoji must be whole before any other pass looks at the sentence.
        processor
            .sentence_modifiers_mut()
            .insert(0, Box::new(MergeEmoji::new(self.tables.clone())));

        let convert = self.convert;
        let tables = self.tables.clone();
        processor
            .changes_mut()
            .subscribe(move |token, changes| convert.on_change(&tables, token, changes));
    }
}
