use derive_where::derive_where;

use super::token::{Token, TokenKind};

cfgenius::define! {
    tracks_reentry = cfg(debug_assertions);
}

/// The deepest a chain of handler-triggered writes may nest before the channel gives up.
///
/// A handler whose output is never a key of the table it rewrites from answers a write with at
/// most one write of its own, and that write's notification finds nothing to rewrite. Chains
/// longer than that only come from handlers that rewrite their own output.
pub const MAX_REENTRY: u32 = 8;

type ChangeHandler = Box<dyn Fn(&mut Token, &ChangeChannel)>;

/// A synchronous observer list fired every time the text of a [TokenKind::Symbol] token is set
/// through it. Handlers run in subscription order on the caller's stack and may set text again,
/// re-entering the channel.
#[derive(Default)]
#[derive_where(Debug)]
pub struct ChangeChannel {
    #[derive_where(skip)]
    handlers: Vec<ChangeHandler>,
    depth: ReentryDepth,
}

impl ChangeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl Fn(&mut Token, &ChangeChannel) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn set_text(&self, token: &mut Token, text: impl Into<String>) {
        token.put_text(text.into());

        if token.kind() != TokenKind::Symbol {
            return;
        }

        let _guard = self.depth.enter();
        for handler in &self.handlers {
            handler(token, self);
        }
    }
}

cfgenius::cond! {
    if macro(tracks_reentry) {
        use std::cell::Cell;

        #[derive(Debug, Default)]
        struct ReentryDepth(Cell<u32>);

        impl ReentryDepth {
            fn enter(&self) -> ReentryGuard<'_> {
                let depth = self.0.get() + 1;
                assert!(
                    depth <= MAX_REENTRY,
                    "text change handlers re-entered {depth} times; a handler keeps rewriting its own output",
                );
                self.0.set(depth);
                ReentryGuard(&self.0)
            }
        }

        struct ReentryGuard<'a>(&'a Cell<u32>);

        impl Drop for ReentryGuard<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }
    } else {
        #[derive(Debug, Default)]
        struct ReentryDepth;

        impl ReentryDepth {
            fn enter(&self) {}
        }
    }
}

#[test]
fn only_symbols_notify() {
    use std::{cell::Cell, rc::Rc};

    let fired = Rc::new(Cell::new(0));
    let mut channel = ChangeChannel::new();
    channel.subscribe({
        let fired = fired.clone();
        move |_, _| fired.set(fired.get() + 1)
    });

    let mut word = Token::word("a");
    channel.set_text(&mut word, "b");
    assert_eq!(word.value(), Some("b"));
    assert_eq!(fired.get(), 0);

    let mut symbol = Token::symbol("a");
    channel.set_text(&mut symbol, "b");
    assert_eq!(fired.get(), 1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "re-entered")]
fn runaway_handlers_are_caught() {
    let mut channel = ChangeChannel::new();
    channel.subscribe(|token, channel| {
        let flipped = if token.renders_as("a") { "b" } else { "a" };
        channel.set_text(token, flipped);
    });

    channel.set_text(&mut Token::symbol("a"), "b");
}
