//! How rules look at the bound value.

use std::borrow::Cow;

/// View of a bound value used by the rule methods.
///
/// A value is *absent* when it is `None`, an empty or blank string, or an
/// empty collection. Every rule except `required` and `must_be_true` skips
/// absent values.
pub trait Inspect {
    /// Returns `true` if the value counts as missing.
    fn is_absent(&self) -> bool;

    /// String form of the value, used by the text rules.
    ///
    /// Collections have none.
    fn text(&self) -> Option<Cow<'_, str>>;

    /// Number of elements, for collections.
    fn item_count(&self) -> Option<usize> {
        None
    }

    /// Integer form of the value, for the numeric rules.
    ///
    /// Floats have one only when they hold a whole number: `5.0` is `5`,
    /// `5.5` has none.
    fn integer(&self) -> Option<i128> {
        self.text().and_then(|text| text.parse().ok())
    }
}

impl Inspect for str {
    fn is_absent(&self) -> bool {
        self.trim().is_empty()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl Inspect for String {
    fn is_absent(&self) -> bool {
        self.as_str().is_absent()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl Inspect for Cow<'_, str> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(&**self))
    }
}

impl Inspect for char {
    fn is_absent(&self) -> bool {
        false
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl Inspect for bool {
    fn is_absent(&self) -> bool {
        false
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "true" } else { "false" }))
    }
}

macro_rules! impl_inspect_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn is_absent(&self) -> bool {
                    false
                }

                fn text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }

                fn integer(&self) -> Option<i128> {
                    i128::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_inspect_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_inspect_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn is_absent(&self) -> bool {
                    false
                }

                fn text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }

                fn integer(&self) -> Option<i128> {
                    if self.is_finite() && self.fract() == 0.0 {
                        self.to_string().parse().ok()
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_inspect_float!(f32, f64);

impl<T: Inspect> Inspect for Option<T> {
    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, Inspect::is_absent)
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(Inspect::text)
    }

    fn item_count(&self) -> Option<usize> {
        self.as_ref().and_then(Inspect::item_count)
    }

    fn integer(&self) -> Option<i128> {
        self.as_ref().and_then(Inspect::integer)
    }
}

impl<T> Inspect for [T] {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn item_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T> Inspect for Vec<T> {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn item_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T, const N: usize> Inspect for [T; N] {
    fn is_absent(&self) -> bool {
        N == 0
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn item_count(&self) -> Option<usize> {
        Some(N)
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        (**self).text()
    }

    fn item_count(&self) -> Option<usize> {
        (**self).item_count()
    }

    fn integer(&self) -> Option<i128> {
        (**self).integer()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        (**self).text()
    }

    fn item_count(&self) -> Option<usize> {
        (**self).item_count()
    }

    fn integer(&self) -> Option<i128> {
        (**self).integer()
    }
}

/// A bound value whose elements can be checked for duplicates.
pub trait Collection {
    type Item;

    fn elements(&self) -> &[Self::Item];
}

impl<T> Collection for [T] {
    type Item = T;

    fn elements(&self) -> &[T] {
        self
    }
}

impl<T> Collection for Vec<T> {
    type Item = T;

    fn elements(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> Collection for [T; N] {
    type Item = T;

    fn elements(&self) -> &[T] {
        self
    }
}

impl<C: Collection + ?Sized> Collection for &C {
    type Item = C::Item;

    fn elements(&self) -> &[C::Item] {
        (**self).elements()
    }
}

impl<C: Collection> Collection for Option<C> {
    type Item = C::Item;

    fn elements(&self) -> &[C::Item] {
        match self {
            Some(collection) => collection.elements(),
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_strings() {
        assert!("".is_absent());
        assert!("   ".is_absent());
        assert!(!"x".is_absent());
        assert!(String::new().is_absent());
        assert!(None::<&str>.is_absent());
        assert!(Some("  ").is_absent());
    }

    #[test]
    fn numbers_are_never_absent() {
        assert!(!0i32.is_absent());
        assert!(!0.0f64.is_absent());
        assert!(!false.is_absent());
    }

    #[test]
    fn empty_collections_are_absent() {
        assert!(Vec::<i32>::new().is_absent());
        assert!(!vec![1].is_absent());
        assert!(([] as [u8; 0]).is_absent());
    }

    #[test]
    fn string_forms() {
        assert_eq!(42u8.text().as_deref(), Some("42"));
        assert_eq!(true.text().as_deref(), Some("true"));
        assert_eq!(Some("x").text().as_deref(), Some("x"));
        assert!(vec!["a", "b"].text().is_none());
        assert!(None::<i32>.text().is_none());
    }

    #[test]
    fn integer_forms() {
        assert_eq!("123".integer(), Some(123));
        assert_eq!("-5".integer(), Some(-5));
        assert_eq!("12a".integer(), None);
        assert_eq!(7u32.integer(), Some(7));
        assert_eq!(u64::MAX.integer(), Some(i128::from(u64::MAX)));
        assert_eq!(u128::MAX.integer(), None);
        assert_eq!(Some(&9i64).integer(), Some(9));
    }

    #[test]
    fn floats_have_an_integer_form_only_when_whole() {
        assert_eq!(5.0f64.integer(), Some(5));
        assert_eq!((-3.0f32).integer(), Some(-3));
        assert_eq!(5.5f64.integer(), None);
        assert_eq!(f64::NAN.integer(), None);
        assert_eq!(f64::INFINITY.integer(), None);
    }

    #[test]
    fn item_counts() {
        assert_eq!(vec![1, 2, 3].item_count(), Some(3));
        assert_eq!([1, 2].item_count(), Some(2));
        assert_eq!("abc".item_count(), None);
        assert_eq!(Some(vec![1]).item_count(), Some(1));
    }

    #[test]
    fn collection_elements() {
        let items = vec![1, 2, 3];
        assert_eq!((&items).elements(), &[1, 2, 3]);
        assert!(None::<Vec<i32>>.elements().is_empty());
    }
}
