//! Fuzz test for table-source value semantics.
//!
//! This fuzzer builds arbitrary table-source trees and verifies that:
//! 1. A clone is structurally equal to, and hashes like, the original
//! 2. Alias and hint changes never affect equality or hashing
//! 3. Every visit is matched by an end visit
//! 4. Stored parent links agree with the links recomputed by traversal

use honggfuzz::fuzz;
use sql_ast_core::testing::test_table_source_invariants;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_table_source_invariants(data);
        });
    }
}
