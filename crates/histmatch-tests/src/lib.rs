//! Integration tests for histmatch crates.
//!
//! End-to-end checks across clip I/O, curve estimation and frame
//! composition.
