//! Engine module tests.

mod roundtrip_tests;
mod sync_tests;
