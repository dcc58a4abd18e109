//! Stack growth for the recursive parsers.
//!
//! Nesting depth is controlled by the input, so every recursive entry point
//! (`parse_expr`, `parse_type_bp`, `parse_pattern`, `parse_block`, `walk`)
//! runs inside [`ensure_sufficient_stack`] and grows the stack on demand
//! instead of overflowing it.

/// Grow when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
