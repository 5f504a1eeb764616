use std::fmt::{self, Display, Formatter};

use crate::util::{
    enum_meta::{enum_meta, EnumMeta},
    misc::FmtIter,
};

// === Kinds === //

enum_meta! {
    #[derive(Debug)]
    pub enum(&'static str) TokenKind {
        Word = "word",
        Punctuation = "punctuation",
        Symbol = "symbol",
        Other = "other",
    }
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        *self.meta()
    }

    /// Returns `true` for the kinds a tokenizer may emit for a stray fragment of an emoji:
    /// [TokenKind::Punctuation] and [TokenKind::Symbol].
    pub fn is_symbolic(self) -> bool {
        matches!(self, TokenKind::Punctuation | TokenKind::Symbol)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// === Token === //

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
enum TokenContent {
    Text(String),
    Children(Vec<Token>),
}

/// A leaf or composite node in a sentence's token tree. Its [Display] impl renders the token back
/// to the source text it spans.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Token {
    kind: TokenKind,
    content: TokenContent,
}

impl Token {
    pub fn leaf(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            content: TokenContent::Text(text.into()),
        }
    }

    pub fn group(kind: TokenKind, children: Vec<Token>) -> Self {
        Self {
            kind,
            content: TokenContent::Children(children),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Word, text)
    }

    pub fn punct(text: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Punctuation, text)
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Symbol, text)
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Other, text)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub fn children(&self) -> &[Token] {
        match &self.content {
            TokenContent::Children(children) => children.as_slice(),
            TokenContent::Text(_) => &[],
        }
    }

    /// Returns the sibling list of a composite token or `None` for a leaf.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Token>> {
        match &mut self.content {
            TokenContent::Children(children) => Some(children),
            TokenContent::Text(_) => None,
        }
    }

    /// Returns the literal value of a leaf. Composites have no value of their own; use the
    /// [Display] impl to render them.
    pub fn value(&self) -> Option<&str> {
        match &self.content {
            TokenContent::Text(text) => Some(text),
            TokenContent::Children(_) => None,
        }
    }

    pub fn renders_as(&self, text: &str) -> bool {
        match &self.content {
            TokenContent::Text(own) => own == text,
            TokenContent::Children(_) => self.to_string() == text,
        }
    }

    /// Replaces the token's content with a literal value, turning composites into leaves. This
    /// does not notify anyone. Observers hear about such writes when the processor announces the
    /// sentence's symbols, or right away through [ChangeChannel::set_text].
    ///
    /// [ChangeChannel::set_text]: super::channel::ChangeChannel::set_text
    pub(crate) fn put_text(&mut self, text: String) {
        self.content = TokenContent::Text(text);
    }

    /// Appends the literal fragments of this token to `out` in reverse rendering order.
    pub fn push_fragments_rev<'a>(&'a self, out: &mut Vec<&'a str>) {
        let mut stack = vec![self];

        while let Some(token) = stack.pop() {
            match &token.content {
                TokenContent::Text(text) => out.push(text),
                // Children are pushed in order so they pop last-to-first.
                TokenContent::Children(children) => stack.extend(children),
            }
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.content {
            TokenContent::Text(text) => f.write_str(text),
            TokenContent::Children(children) => Display::fmt(&FmtIter::new(children.iter()), f),
        }
    }
}

#[test]
fn renders_nested_groups() {
    let token = Token::group(
        TokenKind::Word,
        vec![
            Token::other("thumbs"),
            Token::group(TokenKind::Other, vec![Token::punct("_"), Token::other("up")]),
        ],
    );

    assert_eq!(token.to_string(), "thumbs_up");
    assert!(token.renders_as("thumbs_up"));
    assert_eq!(token.value(), None);
}

#[test]
fn fragments_come_out_reversed() {
    let token = Token::group(
        TokenKind::Word,
        vec![
            Token::other("a"),
            Token::group(TokenKind::Other, vec![Token::other("b"), Token::other("c")]),
            Token::other("d"),
        ],
    );

    let mut fragments = Vec::new();
    token.push_fragments_rev(&mut fragments);
    assert_eq!(fragments, ["d", "c", "b", "a"]);
}
