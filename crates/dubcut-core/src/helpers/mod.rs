// crates/dubcut-core/src/helpers/mod.rs
//
// Shared helper modules usable by any dubcut crate.

pub mod time;
