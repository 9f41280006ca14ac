//! Unit tests for carepath-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.
