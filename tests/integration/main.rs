//! Integration tests. All tests need PostgreSQL (`DATABASE_URL`) and are
//! ignored by default: `cargo test -- --ignored`.

mod attendance_tests;
mod common;
mod lending_tests;
