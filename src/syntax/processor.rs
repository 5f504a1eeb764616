use derive_where::derive_where;

use super::{
    channel::ChangeChannel,
    token::{Token, TokenKind},
};

// === Modifiers === //

/// Where the traversal driver goes after a [SentenceModifier] has visited a token.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Visit {
    /// Move on to the next sibling.
    Continue,

    /// Resume at the given index, which may lie before, at, or after the visited one. Modifiers
    /// that remove earlier siblings use this to revisit the merged position.
    ResumeAt(usize),
}

/// A pass over one sentence's sibling list. The driver calls [visit](SentenceModifier::visit)
/// once per position with the full list so the modifier may rewrite neighbours in place.
pub trait SentenceModifier {
    fn visit(&self, index: usize, siblings: &mut Vec<Token>, changes: &ChangeChannel) -> Visit;
}

impl<F> SentenceModifier for F
where
    F: Fn(usize, &mut Vec<Token>, &ChangeChannel) -> Visit,
{
    fn visit(&self, index: usize, siblings: &mut Vec<Token>, changes: &ChangeChannel) -> Visit {
        self(index, siblings, changes)
    }
}

pub trait Plugin {
    fn attach(&self, processor: &mut Processor);
}

// === Processor === //

#[derive(Default)]
#[derive_where(Debug)]
pub struct Processor {
    #[derive_where(skip)]
    sentence_modifiers: Vec<Box<dyn SentenceModifier>>,
    changes: ChangeChannel,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_plugin(&mut self, plugin: &impl Plugin) -> &mut Self {
        plugin.attach(self);
        self
    }

    /// The ordered list of passes [run_sentence](Processor::run_sentence) applies. Plugins that
    /// must see tokens before any other pass insert at the front.
    pub fn sentence_modifiers_mut(&mut self) -> &mut Vec<Box<dyn SentenceModifier>> {
        &mut self.sentence_modifiers
    }

    pub fn sentence_modifier_count(&self) -> usize {
        self.sentence_modifiers.len()
    }

    pub fn changes(&self) -> &ChangeChannel {
        &self.changes
    }

    pub fn changes_mut(&mut self) -> &mut ChangeChannel {
        &mut self.changes
    }

    /// Applies every sentence modifier in order, then announces the sentence's symbols.
    pub fn run_sentence(&self, siblings: &mut Vec<Token>) {
        for modifier in &self.sentence_modifiers {
            let mut index = 0;
            while index < siblings.len() {
                index = match modifier.visit(index, siblings, &self.changes) {
                    Visit::Continue => index + 1,
                    Visit::ResumeAt(next) => next,
                };
            }
        }

        self.announce_symbols(siblings);
    }

    /// Sets the text of every [TokenKind::Symbol] leaf in the tree to its current value through
    /// the change channel. Symbols the tokenizer produced and symbols a modifier assembled both
    /// reach observers here, after no modifier can fold anything further into them.
    fn announce_symbols(&self, siblings: &mut [Token]) {
        let mut stack = siblings.iter_mut().collect::<Vec<_>>();

        while let Some(token) = stack.pop() {
            if token.kind() == TokenKind::Symbol {
                if let Some(text) = token.value().map(str::to_string) {
                    self.changes.set_text(token, text);
                    continue;
                }
            }

            if let Some(children) = token.children_mut() {
                stack.extend(children.iter_mut());
            }
        }
    }

    /// Runs every sentence modifier over the children of a composite `sentence`. Leaves have no
    /// siblings to modify and are left alone.
    pub fn run(&self, sentence: &mut Token) {
        if let Some(siblings) = sentence.children_mut() {
            self.run_sentence(siblings);
        }
    }
}

#[test]
fn resume_at_revisits_earlier_positions() {
    // Folds runs of "a" words into one, rewinding so a freshly merged word can absorb the next.
    fn fold_a(index: usize, siblings: &mut Vec<Token>, changes: &ChangeChannel) -> Visit {
        if index == 0 || !siblings[index].renders_as("a") {
            return Visit::Continue;
        }

        let merged = format!("{}a", siblings[index - 1]);
        if !merged.chars().all(|c| c == 'a') {
            return Visit::Continue;
        }

        siblings.remove(index);
        changes.set_text(&mut siblings[index - 1], merged);
        Visit::ResumeAt(index - 1)
    }

    let mut processor = Processor::new();
    processor.sentence_modifiers_mut().push(Box::new(fold_a));

    let mut siblings = vec![
        Token::word("a"),
        Token::word("a"),
        Token::word("a"),
        Token::other(" "),
        Token::word("a"),
    ];
    processor.run_sentence(&mut siblings);

    assert_eq!(
        siblings,
        [Token::word("aaa"), Token::other(" "), Token::word("a")]
    );
}

#[test]
fn modifiers_run_in_list_order() {
    let mut processor = Processor::new();
    let modifiers = processor.sentence_modifiers_mut();
    modifiers.push(Box::new(
        |index: usize, siblings: &mut Vec<Token>, changes: &ChangeChannel| {
            let text = format!("{}1", siblings[index]);
            changes.set_text(&mut siblings[index], text);
            Visit::Continue
        },
    ));
    modifiers.insert(
        0,
        Box::new(
            |index: usize, siblings: &mut Vec<Token>, changes: &ChangeChannel| {
                let text = format!("{}0", siblings[index]);
                changes.set_text(&mut siblings[index], text);
                Visit::Continue
            },
        ),
    );

    let mut sentence = Token::group(
        super::token::TokenKind::Other,
        vec![Token::word("x"), Token::word("y")],
    );
    processor.run(&mut sentence);

    assert_eq!(sentence.to_string(), "x01y01");
}

#[test]
fn symbols_are_announced_after_every_modifier() {
    use std::{cell::RefCell, rc::Rc};

    let announced = Rc::new(RefCell::new(Vec::new()));
    let mut processor = Processor::new();
    processor.changes_mut().subscribe({
        let announced = announced.clone();
        move |token, _| announced.borrow_mut().push(token.to_string())
    });
    processor.sentence_modifiers_mut().push(Box::new(
        |index: usize, siblings: &mut Vec<Token>, _: &ChangeChannel| {
            if index > 0 && siblings[index - 1].kind() == TokenKind::Symbol {
                let tail = siblings.remove(index);
                let joined = format!("{}{tail}", siblings[index - 1]);
                siblings[index - 1].put_text(joined);
                return Visit::ResumeAt(index - 1);
            }
            Visit::Continue
        },
    ));

    let mut siblings = vec![
        Token::word("x"),
        Token::group(
            TokenKind::Other,
            vec![Token::symbol("*"), Token::other("y")],
        ),
        Token::symbol("<"),
        Token::word("-"),
        Token::word("-"),
    ];
    processor.run_sentence(&mut siblings);

    assert_eq!(siblings.last(), Some(&Token::symbol("<--")));
    let mut announced = announced.borrow().clone();
    announced.sort();
    assert_eq!(announced, ["*", "<--"]);
}
