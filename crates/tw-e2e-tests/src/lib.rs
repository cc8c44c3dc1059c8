//! End-to-end tests for the Tablewise HTTP surface live in `tests/`.
