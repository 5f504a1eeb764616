use std::{cell::Cell, rc::Rc, sync::Arc};

use emoji_tokens::{
    emoji::{ConfigError, Convert, Emoji, EmojiOptions, EmojiTables},
    syntax::{ChangeChannel, Processor, SentenceModifier, Token, TokenKind, Visit},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tables() -> Arc<EmojiTables> {
    Arc::new(
        EmojiTables::from_records([
            ("grin", "😀"),
            ("+1", "👍"),
            ("thumbsup", "👍"),
            ("relaxed", "☺\u{fe0f}"),
        ])
        .unwrap(),
    )
}

fn processor(convert: Convert) -> Processor {
    init_logger();

    let emoji = Emoji::with_tables(Some(convert.into()), tables()).unwrap();
    let mut processor = Processor::new();
    processor.use_plugin(&emoji);
    processor
}

#[test]
fn shortcode_merges_then_encodes() {
    let mut sentence = vec![Token::symbol(":"), Token::word("grin"), Token::symbol(":")];
    processor(Convert::Encode).run_sentence(&mut sentence);

    assert_eq!(sentence, [Token::symbol("😀")]);
}

#[test]
fn shortcode_merges_and_stays_under_decode() {
    let mut sentence = vec![
        Token::word("Hi"),
        Token::other(" "),
        Token::punct(":"),
        Token::word("thumbsup"),
        Token::punct(":"),
    ];
    processor(Convert::Decode).run_sentence(&mut sentence);

    assert_eq!(
        sentence,
        [Token::word("Hi"), Token::other(" "), Token::symbol(":thumbsup:")]
    );
}

#[test]
fn misclassified_word_is_retyped_then_decoded() {
    let mut sentence = vec![Token::word("😀")];
    processor(Convert::Decode).run_sentence(&mut sentence);

    assert_eq!(sentence, [Token::symbol(":grin:")]);
}

#[test]
fn misclassified_word_is_retyped_under_encode() {
    let mut sentence = vec![Token::word("😀")];
    processor(Convert::Encode).run_sentence(&mut sentence);

    assert_eq!(sentence, [Token::symbol("😀")]);
}

#[test]
fn split_pair_merges_then_decodes() {
    let mut sentence = vec![
        Token::word("so"),
        Token::punct("☺"),
        Token::word("\u{fe0f}"),
        Token::punct("!"),
    ];
    processor(Convert::Decode).run_sentence(&mut sentence);

    assert_eq!(
        sentence,
        [Token::word("so"), Token::symbol(":relaxed:"), Token::punct("!")]
    );
}

#[test]
fn lone_colon_leaves_sentence_untouched() {
    for convert in [Convert::Encode, Convert::Decode] {
        let original = vec![Token::word("Hi"), Token::punct(":"), Token::word("there")];

        let mut sentence = original.clone();
        processor(convert).run_sentence(&mut sentence);

        assert_eq!(sentence, original);
    }
}

#[test]
fn unknown_shortcode_leaves_sentence_untouched() {
    let original = vec![
        Token::punct(":"),
        Token::word("nope"),
        Token::punct(":"),
        Token::other(" "),
        Token::punct(":"),
    ];

    let mut sentence = original.clone();
    processor(Convert::Encode).run_sentence(&mut sentence);

    assert_eq!(sentence, original);
}

#[test]
fn existing_symbols_are_decoded() {
    let mut sentence = vec![
        Token::word("ok"),
        Token::other(" "),
        Token::symbol("👍"),
        Token::symbol(":grin:"),
    ];
    processor(Convert::Decode).run_sentence(&mut sentence);

    assert_eq!(
        sentence,
        [
            Token::word("ok"),
            Token::other(" "),
            Token::symbol(":+1:"),
            Token::symbol(":grin:"),
        ]
    );
}

#[test]
fn existing_symbols_are_encoded() {
    let mut sentence = vec![
        Token::symbol(":thumbsup:"),
        Token::group(TokenKind::Other, vec![Token::symbol(":grin:")]),
        Token::symbol("?"),
    ];
    processor(Convert::Encode).run_sentence(&mut sentence);

    assert_eq!(
        sentence,
        [
            Token::symbol("👍"),
            Token::group(TokenKind::Other, vec![Token::symbol("😀")]),
            Token::symbol("?"),
        ]
    );
}

#[test]
fn triple_split_merges_fully_before_decoding() {
    init_logger();

    let tables = EmojiTables::from_records([
        ("white_flag", "\u{1f3f3}\u{fe0f}"),
        ("rainbow_flag", "\u{1f3f3}\u{fe0f}\u{200d}\u{1f308}"),
    ])
    .unwrap();
    let emoji = Emoji::with_tables(Some(Convert::Decode.into()), Arc::new(tables)).unwrap();
    let mut processor = Processor::new();
    processor.use_plugin(&emoji);

    let mut sentence = vec![
        Token::punct("\u{1f3f3}"),
        Token::word("\u{fe0f}"),
        Token::word("\u{200d}\u{1f308}"),
    ];
    processor.run_sentence(&mut sentence);

    assert_eq!(sentence, [Token::symbol(":rainbow_flag:")]);
}

#[test]
fn whole_sentence_token_is_processed() {
    let mut sentence = Token::group(
        TokenKind::Other,
        vec![
            Token::word("ok"),
            Token::other(" "),
            Token::punct(":"),
            Token::symbol("+"),
            Token::word("1"),
            Token::punct(":"),
        ],
    );
    processor(Convert::Encode).run(&mut sentence);

    assert_eq!(sentence.to_string(), "ok 👍");
    assert_eq!(sentence.children().last(), Some(&Token::symbol("👍")));
}

#[test]
fn merger_runs_before_other_passes() {
    init_logger();

    let seen = Rc::new(Cell::new(0));
    let mut processor = Processor::new();
    processor.sentence_modifiers_mut().push(Box::new({
        let seen = seen.clone();
        move |index: usize, siblings: &mut Vec<Token>, _: &ChangeChannel| {
            if siblings[index].kind() == TokenKind::Symbol {
                seen.set(seen.get() + 1);
            }
            Visit::Continue
        }
    }));

    let emoji = Emoji::with_tables(Some(EmojiOptions::new("encode")), tables()).unwrap();
    processor.use_plugin(&emoji);
    assert_eq!(processor.sentence_modifier_count(), 2);

    let mut sentence = vec![Token::punct(":"), Token::word("grin"), Token::punct(":")];
    processor.run_sentence(&mut sentence);

    assert_eq!(seen.get(), 1);
}

#[test]
fn notifications_stay_shallow() {
    let fired = Rc::new(Cell::new(0));
    let mut processor = processor(Convert::Encode);
    processor.changes_mut().subscribe({
        let fired = fired.clone();
        move |_, _| fired.set(fired.get() + 1)
    });

    let mut sentence = vec![Token::punct(":"), Token::word("grin"), Token::punct(":")];
    processor.run_sentence(&mut sentence);

    assert_eq!(sentence, [Token::symbol("😀")]);
    // The merged symbol's announcement and the codec's rewrite of it.
    assert_eq!(fired.get(), 2);
}

#[test]
fn instances_only_affect_their_own_processor() {
    init_logger();

    let tables = tables();
    let encode = Emoji::with_tables(Some(Convert::Encode.into()), tables.clone()).unwrap();
    let decode = Emoji::with_tables(Some(Convert::Decode.into()), tables).unwrap();

    let mut encoding = Processor::new();
    encoding.use_plugin(&encode);
    let mut decoding = Processor::new();
    decoding.use_plugin(&decode);

    let mut a = vec![Token::punct(":"), Token::word("grin"), Token::punct(":")];
    let mut b = vec![Token::word("😀")];
    encoding.run_sentence(&mut a);
    decoding.run_sentence(&mut b);

    assert_eq!(a, [Token::symbol("😀")]);
    assert_eq!(b, [Token::symbol(":grin:")]);
}

#[test]
fn missing_options_register_nothing() {
    let processor = Processor::new();

    let err = Emoji::with_tables(None, tables()).unwrap_err();
    assert_eq!(err, ConfigError::MissingOptions);
    assert_eq!(processor.sentence_modifier_count(), 0);
    assert_eq!(processor.changes().handler_count(), 0);
}

#[test]
fn invalid_convert_is_rejected() {
    assert_eq!(
        Emoji::with_tables(Some(EmojiOptions::default()), tables()).unwrap_err(),
        ConfigError::MissingConvert
    );
    assert_eq!(
        Emoji::new(Some(EmojiOptions::new("reverse"))).unwrap_err(),
        ConfigError::InvalidConvert("reverse".to_string())
    );
    assert_eq!(Emoji::new(None).unwrap_err(), ConfigError::MissingOptions);
}

#[test]
fn gemoji_round_trips_every_primary_name() {
    let tables = EmojiTables::gemoji().unwrap();

    for emoji in emojis::iter() {
        let Some(name) = emoji.shortcode() else {
            continue;
        };

        let shortcode = format!(":{name}:");
        assert_eq!(tables.unicode_for(&shortcode), Some(emoji.as_str()));

        let decoded = Convert::Decode.rewrite(&tables, emoji.as_str()).unwrap();
        assert_eq!(tables.unicode_for(&decoded), Some(emoji.as_str()));
        assert_eq!(Convert::Encode.rewrite(&tables, emoji.as_str()), None);
        assert_eq!(Convert::Decode.rewrite(&tables, &decoded), None);
    }
}

#[test]
fn merger_can_be_driven_without_a_codec() {
    let merge = emoji_tokens::emoji::MergeEmoji::new(tables());
    let changes = ChangeChannel::new();

    let mut siblings = vec![Token::punct("☺"), Token::word("\u{fe0f}")];
    assert_eq!(merge.visit(1, &mut siblings, &changes), Visit::ResumeAt(0));
    assert_eq!(siblings, [Token::symbol("☺\u{fe0f}")]);
}
