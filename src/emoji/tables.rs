use std::sync::{Arc, OnceLock};

use super::config::ConfigError;
use crate::util::misc::FxHashMap;

/// The two immutable lookups every emoji pass reads: `":name:"` to unicode and unicode back to its
/// primary bare name.
#[derive(Debug, Clone, Default)]
pub struct EmojiTables {
    shortcodes: FxHashMap<Box<str>, Box<str>>,
    names: FxHashMap<Box<str>, Box<str>>,
}

impl EmojiTables {
    /// Builds the tables from `(name, unicode)` records. A unicode sequence listed under several
    /// names is reachable through every `:alias:` but decodes to the first name given for it.
    pub fn from_records<'a, I>(records: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut tables = Self::default();

        for (name, unicode) in records {
            validate_record(name, unicode)?;

            tables
                .shortcodes
                .entry(format!(":{name}:").into_boxed_str())
                .or_insert_with(|| unicode.into());

            tables
                .names
                .entry(unicode.into())
                .or_insert_with(|| name.into());
        }

        if tables.shortcodes.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }

        log::debug!(
            "Built emoji tables with {} shortcodes over {} unicode sequences.",
            tables.shortcodes.len(),
            tables.names.len(),
        );

        Ok(tables)
    }

    /// The process-wide tables built from the gemoji shortcode set. Built on first use and shared
    /// by every caller afterwards.
    pub fn gemoji() -> Result<Arc<Self>, ConfigError> {
        static GEMOJI: OnceLock<Result<Arc<EmojiTables>, ConfigError>> = OnceLock::new();

        GEMOJI
            .get_or_init(|| {
                let records = emojis::iter().flat_map(|emoji| {
                    emoji
                        .shortcodes()
                        .map(move |name| (name, emoji.as_str()))
                });
                Self::from_records(records).map(Arc::new)
            })
            .clone()
    }

    pub fn unicode_for(&self, shortcode: &str) -> Option<&str> {
        self.shortcodes.get(shortcode).map(|unicode| &**unicode)
    }

    pub fn name_for(&self, unicode: &str) -> Option<&str> {
        self.names.get(unicode).map(|name| &**name)
    }

    pub fn is_shortcode(&self, text: &str) -> bool {
        self.shortcodes.contains_key(text)
    }

    pub fn is_unicode(&self, text: &str) -> bool {
        self.names.contains_key(text)
    }

    pub fn shortcode_count(&self) -> usize {
        self.shortcodes.len()
    }

    pub fn unicode_count(&self) -> usize {
        self.names.len()
    }
}

// Shortcode keys are `:name:` and no unicode value may contain a colon, so a rewrite's output is
// never a key of the table it came from.
fn validate_record(name: &str, unicode: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        "empty name"
    } else if name.contains(|c: char| c == ':' || c.is_whitespace()) {
        "name contains a colon or whitespace"
    } else if unicode.is_empty() {
        "empty unicode sequence"
    } else if unicode.contains(':') {
        "unicode sequence contains a colon"
    } else {
        return Ok(());
    };

    Err(ConfigError::MalformedRecord {
        name: name.to_string(),
        unicode: unicode.to_string(),
        reason,
    })
}

#[test]
fn aliases_decode_to_first_name() {
    let tables =
        EmojiTables::from_records([("+1", "👍"), ("thumbsup", "👍"), ("grin", "😁")]).unwrap();

    assert_eq!(tables.unicode_for(":+1:"), Some("👍"));
    assert_eq!(tables.unicode_for(":thumbsup:"), Some("👍"));
    assert_eq!(tables.name_for("👍"), Some("+1"));
    assert_eq!(tables.shortcode_count(), 3);
    assert_eq!(tables.unicode_count(), 2);
    assert!(!tables.is_shortcode("grin"));
    assert!(!tables.is_unicode(":grin:"));
}

#[test]
fn rejects_bad_datasets() {
    assert_eq!(
        EmojiTables::from_records(Vec::<(&str, &str)>::new()).unwrap_err(),
        ConfigError::EmptyDataset
    );
    assert!(matches!(
        EmojiTables::from_records([("grin", "😁"), ("", "😀")]),
        Err(ConfigError::MalformedRecord { reason: "empty name", .. })
    ));
    assert!(matches!(
        EmojiTables::from_records([("a:b", "😀")]),
        Err(ConfigError::MalformedRecord { .. })
    ));
    assert!(matches!(
        EmojiTables::from_records([("colon", ":")]),
        Err(ConfigError::MalformedRecord { .. })
    ));
}

#[test]
fn gemoji_tables_are_shared() {
    let tables = EmojiTables::gemoji().unwrap();

    assert_eq!(tables.unicode_for(":smile:"), Some("😄"));
    assert_eq!(tables.name_for("😄"), Some("smile"));
    assert!(Arc::ptr_eq(&tables, &EmojiTables::gemoji().unwrap()));
}
