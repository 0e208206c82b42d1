use std::collections::BTreeMap;

use crate::{Bcs, Format};

/// A value with a canonical byte encoding.
///
/// Encoding never fails: every value of an implementing type has exactly one
/// encoding.
pub trait Encode {
    /// Appends the encoding of `self` to `out`.
    fn encode<F: Format>(&self, out: &mut Vec<u8>);

    /// The BCS encoding of `self`.
    fn bcs_bytes(&self) -> Vec<u8> {
        crate::serialize::<Bcs, Self>(self)
    }
}

/// Writes a length-prefixed byte string.
pub fn write_bytes<F: Format>(out: &mut Vec<u8>, bytes: &[u8]) {
    F::write_length(out, bytes.len());
    out.extend_from_slice(bytes);
}

impl Encode for bool {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self))
    }
}

macro_rules! encode_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode<F: Format>(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes())
                }
            }
        )*
    };
}

encode_le!(u8, u16, u32, u64, u128);

/// Fixed-size byte arrays carry no length prefix.
impl<const N: usize> Encode for [u8; N] {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        F::write_length(out, self.len());
        for it in self {
            it.encode::<F>(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.as_slice().encode::<F>(out)
    }
}

impl Encode for str {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        write_bytes::<F>(out, self.as_bytes())
    }
}

impl Encode for String {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.as_str().encode::<F>(out)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        match self {
            None => out.push(0),
            Some(it) => {
                out.push(1);
                it.encode::<F>(out);
            }
        }
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        (**self).encode::<F>(out)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        (**self).encode::<F>(out)
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.0.encode::<F>(out);
        self.1.encode::<F>(out);
    }
}

impl<A: Encode, B: Encode, C: Encode> Encode for (A, B, C) {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.0.encode::<F>(out);
        self.1.encode::<F>(out);
        self.2.encode::<F>(out);
    }
}

/// Entries are written in increasing order of their encoded keys, which
/// need not match the order of `K`'s [`Ord`].
impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        let mut entries = self
            .iter()
            .map(|(k, v)| (crate::serialize::<F, K>(k), v))
            .collect::<Vec<_>>();
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));
        F::write_length(out, entries.len());
        for (key, value) in entries {
            out.extend_from_slice(&key);
            value.encode::<F>(out);
        }
    }
}
