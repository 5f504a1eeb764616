//! # Token tree host
//!
//! The structures a tokenizer hands to sentence-level passes: the [Token] tree itself, the
//! [ChangeChannel] notifying observers about symbol text writes, and the [Processor] that drives
//! an ordered list of [SentenceModifier]s over each sentence. Producing the initial tree from raw
//! text is the tokenizer's job and does not happen here.

pub mod channel;
pub mod processor;
pub mod token;

pub use channel::{ChangeChannel, MAX_REENTRY};
pub use processor::{Plugin, Processor, SentenceModifier, Visit};
pub use token::{Token, TokenKind};
