/// Implements the usual conversions for a `Vec` backed collection newtype.
macro_rules! collection {
    ($name:ident, $item:ty) => {
        impl From<Vec<$item>> for $name {
            fn from(args: Vec<$item>) -> Self {
                Self(args)
            }
        }

        impl<const N: usize> From<[$item; N]> for $name {
            fn from(args: [$item; N]) -> Self {
                Self(args.into())
            }
        }

        impl From<$name> for Vec<$item> {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl std::ops::Deref for $name {
            type Target = Vec<$item>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

pub(crate) use collection;
