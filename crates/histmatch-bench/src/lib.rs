//! Benchmarks for histmatch.
//!
//! The benchmarks live in `benches/`; run them with `cargo bench -p histmatch-bench`.
