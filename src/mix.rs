//! Integer mixing used to pick probe start positions, and the traits that
//! describe which integer types the table can store.

use core::fmt::Debug;

/// The 32-bit MurmurHash3 finalizer.
///
/// Stateless and unseeded: equal inputs always mix to equal outputs.
///
/// # Examples
///
/// ```rust
/// use lp_hash::mix::fmix32;
///
/// assert_eq!(fmix32(0), 0);
/// assert_ne!(fmix32(1), fmix32(2));
/// ```
#[inline(always)]
pub const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// The 64-bit MurmurHash3 finalizer.
///
/// # Examples
///
/// ```rust
/// use lp_hash::mix::fmix64;
///
/// assert_eq!(fmix64(0), 0);
/// assert_ne!(fmix64(1) & 0xff, fmix64(2) & 0xff);
/// ```
#[inline(always)]
pub const fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        #[inline(always)]
        fn fmix_word(word: usize) -> usize {
            fmix64(word as u64) as usize
        }
    } else {
        #[inline(always)]
        fn fmix_word(word: usize) -> usize {
            fmix32(word as u32) as usize
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width value that can be stored in a table cell.
///
/// Implemented for the primitive integers and for `()`, which lets
/// [`IntSet`](crate::IntSet) reuse the table without paying for values.
pub trait Value: Copy + Eq + Debug + sealed::Sealed {
    /// The value a freshly claimed or cleared cell holds.
    const ZERO: Self;
}

/// A fixed-width unsigned integer usable as a table key.
///
/// `ZERO` doubles as the empty-cell marker inside the table's regular array;
/// the table stores the zero key out of band.
pub trait Key: Value {
    /// Mixes the key into a probe seed. Only the low bits are used, masked by
    /// the table capacity.
    fn probe_seed(self) -> usize;
}

macro_rules! impl_value {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Value for $ty {
                const ZERO: Self = $zero;
            }
        )*
    };
}

impl_value! {
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    u128 => 0,
    usize => 0,
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    i128 => 0,
    isize => 0,
    () => (),
}

impl Key for u32 {
    #[inline(always)]
    fn probe_seed(self) -> usize {
        fmix32(self) as usize
    }
}

impl Key for u64 {
    #[inline(always)]
    fn probe_seed(self) -> usize {
        fmix64(self) as usize
    }
}

impl Key for usize {
    #[inline(always)]
    fn probe_seed(self) -> usize {
        fmix_word(self)
    }
}
