use subtle::ConstantTimeEq;

/// Constant-time byte comparison.
///
/// Runs in time independent of where the inputs differ. Unequal lengths
/// return `false` immediately; lengths of tags and tenant ids are public.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
