//! End-to-end tests for ap-storage-mbr-* crates.
