//! Format module tests.

mod delimited_tests;
