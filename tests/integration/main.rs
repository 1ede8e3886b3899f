//! Integration tests for poly-risk

mod e2e_test;
mod extract_test;
mod mentions_test;
