use crate::encoding::Unit;

/**
Number of units before the first zero unit, or the whole slice if there is none.
*/
pub fn terminated_len<U>(text: &[U]) -> usize where U: Unit {
    text.iter().position(Unit::is_zero).unwrap_or(text.len())
}

/**
Trims `text` at its first zero unit.
*/
pub fn trim_terminated<U>(text: &[U]) -> &[U] where U: Unit {
    &text[..terminated_len(text)]
}

pub fn zero_fill<U>(units: &mut [U]) where U: Unit {
    for u in units {
        *u = U::zero();
    }
}
