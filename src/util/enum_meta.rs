use std::hash::Hash;

pub trait EnumMeta: Sized + Copy + Eq + Hash + 'static {
    type Meta: 'static;

    fn values() -> &'static [(Self, Self::Meta)];

    fn meta(self) -> &'static Self::Meta {
        for (var, meta) in Self::values() {
            if self == *var {
                return meta;
            }
        }
        unreachable!()
    }

    fn find_by_meta(pred: impl Fn(&Self::Meta) -> bool) -> Option<Self> {
        Self::values()
            .iter()
            .find(|(_, meta)| pred(meta))
            .map(|(var, _)| *var)
    }
}

macro_rules! enum_meta {($(
    $(#[$attr:meta])*
    $vis:vis enum($meta_ty:ty) $item_name:ident {
        $($(#[$var_attr:meta])* $var_name:ident = $meta:expr),*$(,)?
    }
)*) => {$(
    $(#[$attr])*
    #[derive(Copy, Clone, Eq, PartialEq, Hash)]
    $vis enum $item_name {
        $($(#[$var_attr])* $var_name),*
    }

    impl $item_name {
        const ITEMS: &'static [(Self, $meta_ty)] = &[
            $((Self::$var_name, $meta)),*
        ];
    }

    impl $crate::util::enum_meta::EnumMeta for $item_name {
        type Meta = $meta_ty;

        fn values() -> &'static [(Self, Self::Meta)] {
            Self::ITEMS
        }
    }
)*}}

pub(crate) use enum_meta;

#[test]
fn lookup_by_meta() {
    enum_meta! {
        #[derive(Debug)]
        enum(&'static str) Fruit {
            Apple = "apple",
            Pear = "pear",
        }
    }

    assert_eq!(*Fruit::Pear.meta(), "pear");
    assert_eq!(Fruit::find_by_meta(|name| *name == "apple"), Some(Fruit::Apple));
    assert_eq!(Fruit::find_by_meta(|name| *name == "plum"), None);
}
