//! Trivial functions standing in for the embedded runtime's exports.
//!
//! These exist only to prove the bridge is wired correctly end to end:
//! if the host can call them through the C ABI and get the expected
//! answers back, the boundary works.

/// Add two integers.
pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Build a greeting for `name`.
pub fn greeting(name: &str) -> String {
    format!("Hello, {} from sigbridge!", name)
}

/// Factorial of `n`; non-positive inputs yield 1, matching the runtime-side
/// convention.
pub fn factorial(n: i32) -> i64 {
    if n <= 0 {
        return 1;
    }
    (1..=i64::from(n)).product()
}
