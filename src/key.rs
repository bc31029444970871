//! Key builder: composite identities from a name plus key-significant arguments.
//!
//! A call to [`Workspace::get`](crate::Workspace::get) takes a name and a
//! tuple of arguments. Each argument is either [`Keyed`] (its exact bytes
//! become part of the slot's identity) or plain (used only to construct a
//! fresh object). The same tuple is then stripped of its tags and handed to
//! the constructor, in declaration order.
//!
//! Encoding: the name's UTF-8 bytes, then, when any key bytes are present, a
//! single `0xFF` separator followed by each keyed argument's bytes. `0xFF`
//! never appears in UTF-8, so `("ab", ())` and `("a", Keyed(b'b'))` cannot
//! collide.

const SEPARATOR: u8 = 0xFF;

/// Exact byte representation of a key-significant value.
///
/// Two values are the same key iff their bytes are equal. Implementations
/// must write exactly `key_len()` bytes and must be deterministic; types
/// with padding or pointer identity are not suitable.
pub trait KeyBytes {
    fn key_len(&self) -> usize;
    fn write_key(&self, out: &mut Vec<u8>);
}

macro_rules! impl_key_bytes_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyBytes for $t {
                #[inline]
                fn key_len(&self) -> usize {
                    core::mem::size_of::<$t>()
                }
                #[inline]
                fn write_key(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_key_bytes_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// Floats key on their bit pattern: 0.0 and -0.0 are distinct, equal NaNs match.
impl KeyBytes for f32 {
    #[inline]
    fn key_len(&self) -> usize {
        4
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bits().to_ne_bytes());
    }
}

impl KeyBytes for f64 {
    #[inline]
    fn key_len(&self) -> usize {
        8
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bits().to_ne_bytes());
    }
}

impl KeyBytes for bool {
    #[inline]
    fn key_len(&self) -> usize {
        1
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }
}

impl KeyBytes for char {
    #[inline]
    fn key_len(&self) -> usize {
        4
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(*self).to_ne_bytes());
    }
}

impl KeyBytes for () {
    #[inline]
    fn key_len(&self) -> usize {
        0
    }
    #[inline]
    fn write_key(&self, _out: &mut Vec<u8>) {}
}

impl<T: KeyBytes + ?Sized> KeyBytes for &T {
    #[inline]
    fn key_len(&self) -> usize {
        (**self).key_len()
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        (**self).write_key(out)
    }
}

impl<T: KeyBytes, const N: usize> KeyBytes for [T; N] {
    fn key_len(&self) -> usize {
        self.iter().map(KeyBytes::key_len).sum()
    }
    fn write_key(&self, out: &mut Vec<u8>) {
        for v in self {
            v.write_key(out);
        }
    }
}

/// One call argument: contributes key bytes (if any) and a constructor value.
pub trait Argument {
    /// Value forwarded to the constructor once the tag is stripped.
    type Value;

    /// Bytes this argument adds to the composite key; zero for plain arguments.
    #[inline]
    fn key_len(&self) -> usize {
        0
    }

    #[inline]
    fn write_key(&self, _out: &mut Vec<u8>) {}

    fn into_value(self) -> Self::Value;
}

/// Marks an argument as key-significant: requests differing in this value
/// resolve to different objects.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Keyed<T>(pub T);

/// Marks an argument as construction-only. Needed for types that are not
/// plain arguments on their own (e.g. `Vec<T>`, `Rc<T>`, user types).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Plain<T>(pub T);

impl<T: KeyBytes> Argument for Keyed<T> {
    type Value = T;

    #[inline]
    fn key_len(&self) -> usize {
        self.0.key_len()
    }
    #[inline]
    fn write_key(&self, out: &mut Vec<u8>) {
        self.0.write_key(out)
    }
    #[inline]
    fn into_value(self) -> T {
        self.0
    }
}

impl<T> Argument for Plain<T> {
    type Value = T;

    #[inline]
    fn into_value(self) -> T {
        self.0
    }
}

macro_rules! impl_plain_argument {
    ($($t:ty),* $(,)?) => {
        $(
            impl Argument for $t {
                type Value = $t;
                #[inline]
                fn into_value(self) -> $t {
                    self
                }
            }
        )*
    };
}

impl_plain_argument!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
);

impl<'a> Argument for &'a str {
    type Value = &'a str;
    #[inline]
    fn into_value(self) -> &'a str {
        self
    }
}

/// An ordered, heterogeneous argument list (a tuple of [`Argument`]s).
pub trait Args {
    /// The stripped values, as a tuple in declaration order.
    type Values;

    fn key_len(&self) -> usize;
    fn write_key(&self, out: &mut Vec<u8>);
    fn into_values(self) -> Self::Values;
}

/// Construct `Self` from a stripped argument tuple.
///
/// Implement once per accepted argument shape, e.g. `FromArgs<(i32, i32)>`
/// and `FromArgs<(i32, i32, f32)>` for a type with two constructors.
pub trait FromArgs<V> {
    fn from_args(values: V) -> Self;
}

macro_rules! impl_args {
    ($($a:ident),*) => {
        #[allow(non_snake_case, unused_variables)]
        impl<$($a: Argument),*> Args for ($($a,)*) {
            type Values = ($($a::Value,)*);

            #[inline]
            fn key_len(&self) -> usize {
                let ($($a,)*) = self;
                0 $(+ Argument::key_len($a))*
            }

            #[inline]
            fn write_key(&self, out: &mut Vec<u8>) {
                let ($($a,)*) = self;
                $(Argument::write_key($a, out);)*
            }

            #[inline]
            fn into_values(self) -> Self::Values {
                let ($($a,)*) = self;
                ($(Argument::into_value($a),)*)
            }
        }
    };
}

impl_args!();
impl_args!(A0);
impl_args!(A0, A1);
impl_args!(A0, A1, A2);
impl_args!(A0, A1, A2, A3);
impl_args!(A0, A1, A2, A3, A4);
impl_args!(A0, A1, A2, A3, A4, A5);
impl_args!(A0, A1, A2, A3, A4, A5, A6);
impl_args!(A0, A1, A2, A3, A4, A5, A6, A7);

/// Build the composite key for `name` and the keyed members of `args`.
pub(crate) fn build_key<A: Args + ?Sized>(name: &str, args: &A) -> Vec<u8> {
    let arg_len = args.key_len();
    let capacity = name.len() + if arg_len > 0 { 1 + arg_len } else { 0 };
    let mut key = Vec::with_capacity(capacity);
    key.extend_from_slice(name.as_bytes());
    if arg_len > 0 {
        key.push(SEPARATOR);
        args.write_key(&mut key);
    }
    debug_assert_eq!(key.len(), capacity, "KeyBytes::key_len disagrees with write_key");
    key
}
