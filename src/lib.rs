pub mod emoji;
pub mod syntax;
pub mod util;

pub use emoji::{ConfigError, Convert, Emoji, EmojiOptions, EmojiTables};
pub use syntax::{Processor, Token, TokenKind};
