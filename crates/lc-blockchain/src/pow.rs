//! The proof-of-work puzzle.
//!
//! A nonce solves the puzzle for a predecessor nonce `p` when the SHA-256 of
//! the decimal string of `nonce² - p²` starts with [`DIFFICULTY`] zeros.
//! Finding one takes a linear search; checking one takes a single hash.

use num_bigint::BigInt;

use crate::{hash::sha256_hex, DIFFICULTY};

/// Digest the puzzle is judged on.  The difference of squares is computed
/// with arbitrary precision so no nonce pair can overflow.
fn puzzle_digest(nonce: u64, prev_nonce: u64) -> String {
    let nonce = BigInt::from(nonce);
    let prev_nonce = BigInt::from(prev_nonce);
    let difference = &nonce * &nonce - &prev_nonce * &prev_nonce;
    sha256_hex(difference.to_string().as_bytes())
}

fn meets_difficulty(digest: &str) -> bool {
    digest.bytes().take(DIFFICULTY).filter(|b| *b == b'0').count() == DIFFICULTY
}

/// Check a claimed solution.
pub fn verify(nonce: u64, prev_nonce: u64) -> bool {
    meets_difficulty(&puzzle_digest(nonce, prev_nonce))
}

/// Find the smallest nonce `>= 1` that solves the puzzle for `prev_nonce`.
///
/// Blocks the calling thread until a solution is found.
pub fn solve(prev_nonce: u64) -> u64 {
    let mut nonce = 1;
    while !verify(nonce, prev_nonce) {
        nonce += 1;
    }
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_verifies() {
        let nonce = solve(1);
        assert!(verify(nonce, 1));
    }

    #[test]
    fn solve_returns_first_solution() {
        let nonce = solve(1);
        assert!((1..nonce).all(|n| !verify(n, 1)));
        assert!(!verify(nonce - 1, 1));
    }

    #[test]
    fn chained_solutions_verify() {
        let first = solve(1);
        let second = solve(first);
        assert!(verify(second, first));
    }

    #[test]
    fn negative_differences_are_rendered_with_sign() {
        // 2² - 3² = -5
        assert_eq!(puzzle_digest(2, 3), sha256_hex(b"-5"));
        assert_eq!(puzzle_digest(3, 3), sha256_hex(b"0"));
    }

    #[test]
    fn huge_nonces_do_not_overflow() {
        let digest = puzzle_digest(u64::MAX, 1);
        let expected = (BigInt::from(u64::MAX) * BigInt::from(u64::MAX) - 1u32).to_string();
        assert_eq!(digest, sha256_hex(expected.as_bytes()));
    }

    #[test]
    fn difficulty_prefix_is_required() {
        assert!(meets_difficulty("0000abcdef"));
        assert!(!meets_difficulty("000abcdef0"));
        assert!(!meets_difficulty("000"));
    }
}
