use std::{fmt, hash};

// === Formatting === //

#[derive(Debug)]
pub struct FmtIter<I>(pub I);

impl<I> FmtIter<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self(iter.into_iter())
    }
}

impl<I> fmt::Display for FmtIter<I>
where
    I: Clone + Iterator,
    I::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in self.0.clone() {
            fmt::Display::fmt(&i, f)?;
        }
        Ok(())
    }
}

// === Hashers === //

pub type FxHashBuilder = hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxHashBuilder>;

#[test]
fn fmt_iter_concatenates() {
    assert_eq!(FmtIter::new(["a", "b", "c"].iter()).to_string(), "abc");
    assert_eq!(FmtIter::new(Vec::<&str>::new().iter()).to_string(), "");
}
