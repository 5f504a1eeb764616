//! Reassembly of emoji the tokenizer broke apart.
//!
//! Three shapes are recognized, in order:
//!
//! 1. A whole unicode emoji classified as a word. It is retyped to a symbol.
//! 2. A punctuation or symbol token followed by a word which together spell a unicode emoji. The
//!    word is folded into the preceding token and traversal rewinds onto it so graphemes split
//!    into three or more pieces fold one piece at a time.
//! 3. A closing `:` whose sibling run back to an opening `:` spells a known shortcode. The run is
//!    collapsed into the closing token.
//!
//! Anything else is left untouched. In particular a lone colon is ordinary prose punctuation and
//! never causes a mutation unless a known shortcode closes on it.
//!
//! Merged text is written without notifying the change channel. A grapheme is only complete once
//! the whole sentence has been folded, so observers hear about it when the [Processor] announces
//! the sentence's symbols.
//!
//! [Processor]: crate::syntax::Processor

use std::sync::Arc;

use derive_where::derive_where;

use super::tables::EmojiTables;
use crate::syntax::{ChangeChannel, SentenceModifier, Token, TokenKind, Visit};

#[derive(Clone)]
#[derive_where(Debug)]
pub struct MergeEmoji {
    #[derive_where(skip)]
    tables: Arc<EmojiTables>,
}

impl MergeEmoji {
    pub fn new(tables: Arc<EmojiTables>) -> Self {
        Self { tables }
    }

    fn merge_word(&self, index: usize, siblings: &mut Vec<Token>) -> Option<Visit> {
        let text = siblings[index].to_string();

        // Whole emoji mistaken for a word
        if self.tables.is_unicode(&text) {
            log::trace!("Retyping word {text:?} at {index} as a symbol.");

            let token = &mut siblings[index];
            token.set_kind(TokenKind::Symbol);
            token.put_text(text);
            return Some(Visit::Continue);
        }

        // Emoji split into a leading fragment and a word
        let prev_index = index.checked_sub(1)?;
        let prev = &siblings[prev_index];
        if !prev.kind().is_symbolic() {
            return None;
        }

        let joined = format!("{prev}{text}");
        if !self.tables.is_unicode(&joined) {
            return None;
        }

        log::trace!("Folding word {text:?} at {index} into its preceding {}.", prev.kind());

        let prev = &mut siblings[prev_index];
        prev.set_kind(TokenKind::Symbol);
        prev.put_text(joined);
        siblings.remove(index);

        Some(Visit::ResumeAt(prev_index))
    }

    fn close_shortcode(&self, index: usize, siblings: &mut Vec<Token>) -> Visit {
        let (open, candidate) = {
            // Walk back to the opening colon, collecting literal text right-to-left.
            let mut fragments = Vec::new();
            let open = (0..index).rev().find(|&i| {
                let sibling = &siblings[i];
                sibling.push_fragments_rev(&mut fragments);
                sibling.renders_as(":")
            });

            let Some(open) = open else {
                return Visit::Continue;
            };

            fragments.reverse();
            let mut candidate = fragments.concat();
            candidate.push_str(&siblings[index].to_string());

            if !self.tables.is_shortcode(&candidate) {
                return Visit::Continue;
            }

            (open, candidate)
        };

        log::trace!("Collapsing shortcode {candidate:?} spanning {open}..={index}.");

        siblings.drain(open..index);

        let token = &mut siblings[open];
        token.set_kind(TokenKind::Symbol);
        token.put_text(candidate);

        Visit::ResumeAt(open)
    }
}

impl SentenceModifier for MergeEmoji {
    fn visit(&self, index: usize, siblings: &mut Vec<Token>, _changes: &ChangeChannel) -> Visit {
        let token = &siblings[index];

        match token.kind() {
            TokenKind::Word => self
                .merge_word(index, siblings)
                .unwrap_or(Visit::Continue),
            kind if kind.is_symbolic() && token.renders_as(":") => {
                self.close_shortcode(index, siblings)
            }
            _ => Visit::Continue,
        }
    }
}

#[cfg(test)]
fn run_merge(records: &[(&str, &str)], siblings: &mut Vec<Token>) -> Vec<Visit> {
    let tables = EmojiTables::from_records(records.iter().copied()).unwrap();
    let merge = MergeEmoji::new(Arc::new(tables));
    let changes = ChangeChannel::new();
    let mut visits = Vec::new();

    let mut index = 0;
    while index < siblings.len() {
        let visit = merge.visit(index, siblings, &changes);
        visits.push(visit);
        index = match visit {
            Visit::Continue => index + 1,
            Visit::ResumeAt(next) => next,
        };
    }

    visits
}

#[test]
fn word_emoji_is_retyped_in_place() {
    let mut siblings = vec![Token::word("😀"), Token::word("ok")];
    let visits = run_merge(&[("grinning", "😀")], &mut siblings);

    assert_eq!(siblings, [Token::symbol("😀"), Token::word("ok")]);
    assert_eq!(visits, [Visit::Continue, Visit::Continue]);
}

#[test]
fn split_pair_rewinds_to_merged_token() {
    let mut siblings = vec![Token::word("a"), Token::punct("☺"), Token::word("\u{fe0f}")];
    let visits = run_merge(&[("relaxed", "☺\u{fe0f}")], &mut siblings);

    assert_eq!(siblings, [Token::word("a"), Token::symbol("☺\u{fe0f}")]);
    assert_eq!(visits[2], Visit::ResumeAt(1));
}

#[test]
fn triple_split_cascades() {
    let white_flag = "\u{1f3f3}\u{fe0f}";
    let rainbow_flag = "\u{1f3f3}\u{fe0f}\u{200d}\u{1f308}";

    let mut siblings = vec![
        Token::punct("\u{1f3f3}"),
        Token::word("\u{fe0f}"),
        Token::word("\u{200d}\u{1f308}"),
    ];
    run_merge(
        &[("white_flag", white_flag), ("rainbow_flag", rainbow_flag)],
        &mut siblings,
    );

    assert_eq!(siblings, [Token::symbol(rainbow_flag)]);
}

#[test]
fn grouped_word_emoji_becomes_a_leaf_symbol() {
    let mut siblings = vec![Token::group(TokenKind::Word, vec![Token::other("😀")])];
    run_merge(&[("grinning", "😀")], &mut siblings);

    assert_eq!(siblings, [Token::symbol("😀")]);
}

#[test]
fn grouped_word_folds_into_preceding_fragment() {
    let mut siblings = vec![
        Token::punct("☺"),
        Token::group(TokenKind::Word, vec![Token::other("\u{fe0f}")]),
    ];
    let visits = run_merge(&[("relaxed", "☺\u{fe0f}")], &mut siblings);

    assert_eq!(siblings, [Token::symbol("☺\u{fe0f}")]);
    assert_eq!(visits[1], Visit::ResumeAt(0));
}

#[test]
fn word_folds_into_preceding_symbol() {
    let mut siblings = vec![Token::word("hey"), Token::symbol("☺"), Token::word("\u{fe0f}")];
    run_merge(&[("relaxed", "☺\u{fe0f}")], &mut siblings);

    assert_eq!(siblings, [Token::word("hey"), Token::symbol("☺\u{fe0f}")]);
}

#[test]
fn merging_does_not_notify() {
    use std::{cell::Cell, rc::Rc};

    let merge = MergeEmoji::new(Arc::new(EmojiTables::from_records([("grin", "😁")]).unwrap()));
    let fired = Rc::new(Cell::new(0));
    let mut changes = ChangeChannel::new();
    changes.subscribe({
        let fired = fired.clone();
        move |_, _| fired.set(fired.get() + 1)
    });

    let mut siblings = vec![Token::punct(":"), Token::word("grin"), Token::punct(":")];
    assert_eq!(merge.visit(2, &mut siblings, &changes), Visit::ResumeAt(0));
    assert_eq!(siblings, [Token::symbol(":grin:")]);
    assert_eq!(fired.get(), 0);
}

#[test]
fn shortcode_run_collapses() {
    let mut siblings = vec![
        Token::word("so"),
        Token::punct(":"),
        Token::symbol("+"),
        Token::word("1"),
        Token::punct(":"),
        Token::punct("!"),
    ];
    let visits = run_merge(&[("+1", "👍")], &mut siblings);

    assert_eq!(
        siblings,
        [Token::word("so"), Token::symbol(":+1:"), Token::punct("!")]
    );
    assert!(visits.contains(&Visit::ResumeAt(1)));
}

#[test]
fn shortcode_scan_descends_into_groups() {
    let mut siblings = vec![
        Token::punct(":"),
        Token::group(
            TokenKind::Word,
            vec![Token::other("thumbs"), Token::punct("_"), Token::other("up")],
        ),
        Token::punct(":"),
    ];
    run_merge(&[("thumbs_up", "👍")], &mut siblings);

    assert_eq!(siblings, [Token::symbol(":thumbs_up:")]);
}

#[test]
fn unmatched_colons_are_untouched() {
    let original = vec![
        Token::word("note"),
        Token::punct(":"),
        Token::other(" "),
        Token::word("grin"),
        Token::punct(":"),
        Token::word("later"),
    ];

    let mut siblings = original.clone();
    let visits = run_merge(&[("grin", "😁")], &mut siblings);

    assert_eq!(siblings, original);
    assert!(visits.iter().all(|visit| *visit == Visit::Continue));
}
