//! Stack growth for the recursive phases of the Arx compiler.
//!
//! The parser, the checker, and the IR lowering all recurse once per level
//! of expression nesting. Source such as `((((...))))` or a long chain of
//! unary minus signs can nest arbitrarily deep, so each recursive entry
//! point runs its body through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended with `stacker` when fewer than
//! [`RED_ZONE`] bytes remain. On `wasm32` the closure is called directly.

/// Remaining stack below which a new segment is allocated (64KB).
pub const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment (2MB).
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nesting_depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        assert_eq!(nesting_depth(200_000), 200_000);
    }

    #[test]
    fn test_passes_result_through() {
        let parsed: Result<u8, String> =
            ensure_sufficient_stack(|| "7".parse().map_err(|_| String::new()));
        assert_eq!(parsed, Ok(7));
    }
}
