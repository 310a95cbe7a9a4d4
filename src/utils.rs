//! Bitmask helpers for the visited-set representation.
//!
//! A visited set is a [`Mask`]: bit k set means city k has been visited. The
//! mask width is the hard ceiling on instance size, so at most
//! [`MAX_SUPPORTED_CITIES`] cities can be solved regardless of configuration.

/// Visited-set bitmask.
pub type Mask = u32;

/// Largest city count representable in a [`Mask`].
pub const MAX_SUPPORTED_CITIES: usize = Mask::BITS as usize;

/// Bit of the depot (city 0).
pub const DEPOT_BIT: Mask = 1;

/// Mask with the low `n` bits set.
///
/// # Panics
/// Panics if `n` is zero or exceeds [`MAX_SUPPORTED_CITIES`].
#[inline]
pub fn full_mask(n: usize) -> Mask {
    assert!(
        (1..=MAX_SUPPORTED_CITIES).contains(&n),
        "city count {n} outside 1..={MAX_SUPPORTED_CITIES}"
    );
    Mask::MAX >> (MAX_SUPPORTED_CITIES - n)
}

#[inline]
pub fn contains(mask: Mask, city: usize) -> bool {
    mask & (1 << city) != 0
}

#[inline]
pub fn without(mask: Mask, city: usize) -> Mask {
    mask & !(1 << city)
}

/// Iterate the set bits of `mask` in ascending order.
pub fn cities(mask: Mask) -> impl Iterator<Item = usize> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            None
        } else {
            let city = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(city)
        }
    })
}

/// All masks over `n` cities that contain the depot and have exactly `size`
/// set bits, in ascending numeric order.
///
/// Uses Gosper's hack on the `n - 1` non-depot bits.
pub fn depot_masks_of_size(n: usize, size: usize) -> impl Iterator<Item = Mask> {
    let free = n.saturating_sub(1) as u32;
    let k = size.saturating_sub(1) as u32;
    let limit = 1u64 << free;
    let mut next = if size == 0 || k > free {
        None
    } else {
        Some((1u64 << k) - 1)
    };
    std::iter::from_fn(move || {
        let sub = next?;
        next = if sub == 0 {
            None
        } else {
            let low = sub & sub.wrapping_neg();
            let ripple = sub + low;
            let succ = (((ripple ^ sub) >> 2) / low) | ripple;
            (succ < limit).then_some(succ)
        };
        Some(((sub as Mask) << 1) | DEPOT_BIT)
    })
}

/// Bytes needed by a memo table over `n` cities: one `u32` per cell plus one
/// validity bit per cell. `None` if the size does not fit in `usize`.
pub fn table_bytes(n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    let cells = n.checked_mul(1usize.checked_shl((n - 1) as u32)?)?;
    let values = cells.checked_mul(std::mem::size_of::<u32>())?;
    let flags = cells.div_ceil(64).checked_mul(std::mem::size_of::<u64>())?;
    values.checked_add(flags)
}
