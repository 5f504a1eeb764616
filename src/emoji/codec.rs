use super::{config::Convert, tables::EmojiTables};
use crate::syntax::{ChangeChannel, Token};

impl Convert {
    /// Returns the canonical form of `text` under this direction, or `None` when `text` is not an
    /// emoji this direction rewrites. The output is never itself rewritable by the same direction.
    pub fn rewrite(self, tables: &EmojiTables, text: &str) -> Option<String> {
        match self {
            Convert::Encode => tables.unicode_for(text).map(str::to_string),
            Convert::Decode => tables.name_for(text).map(|name| format!(":{name}:")),
        }
    }

    /// Reacts to a symbol's text being set by moving it to this direction's canonical form. The
    /// write re-enters `changes`, where it finds nothing further to do.
    pub fn on_change(self, tables: &EmojiTables, token: &mut Token, changes: &ChangeChannel) {
        let text = token.to_string();
        if let Some(rewritten) = self.rewrite(tables, &text) {
            log::trace!("Rewriting symbol {text:?} as {rewritten:?} ({self}).");
            changes.set_text(token, rewritten);
        }
    }
}

#[cfg(test)]
fn sample_tables() -> EmojiTables {
    EmojiTables::from_records([
        ("grin", "😁"),
        ("grinning", "😀"),
        ("+1", "👍"),
        ("thumbsup", "👍"),
    ])
    .unwrap()
}

#[test]
fn directions_round_trip() {
    let tables = sample_tables();

    for (name, unicode) in [("grin", "😁"), ("grinning", "😀"), ("+1", "👍")] {
        let shortcode = format!(":{name}:");
        assert_eq!(Convert::Encode.rewrite(&tables, &shortcode).as_deref(), Some(unicode));
        assert_eq!(Convert::Decode.rewrite(&tables, unicode), Some(shortcode));
    }

    assert_eq!(Convert::Decode.rewrite(&tables, "👍").as_deref(), Some(":+1:"));
    assert_eq!(Convert::Encode.rewrite(&tables, ":thumbsup:").as_deref(), Some("👍"));
}

#[test]
fn rewrites_are_idempotent() {
    let tables = sample_tables();

    assert_eq!(Convert::Encode.rewrite(&tables, "😁"), None);
    assert_eq!(Convert::Decode.rewrite(&tables, ":grin:"), None);
    assert_eq!(Convert::Encode.rewrite(&tables, ":nope:"), None);
    assert_eq!(Convert::Decode.rewrite(&tables, "x"), None);
}

#[test]
fn on_change_settles_after_one_rewrite() {
    use std::{cell::Cell, rc::Rc, sync::Arc};

    let tables = Arc::new(sample_tables());
    let fired = Rc::new(Cell::new(0));

    let mut changes = ChangeChannel::new();
    changes.subscribe({
        let tables = tables.clone();
        move |token, changes| Convert::Decode.on_change(&tables, token, changes)
    });
    changes.subscribe({
        let fired = fired.clone();
        move |_, _| fired.set(fired.get() + 1)
    });

    let mut token = Token::symbol("");
    changes.set_text(&mut token, "😀");

    assert_eq!(token, Token::symbol(":grinning:"));
    // Once for the rewrite's own notification, once for the original write.
    assert_eq!(fired.get(), 2);
}
