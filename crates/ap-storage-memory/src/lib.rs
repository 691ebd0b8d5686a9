//! In-memory data structures.
//!
//! Provides a block device backed by memory for testing purposes.
#![no_std]

extern crate alloc;

mod disk;
pub use disk::*;
