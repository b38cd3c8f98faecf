//! End-to-end tests for the HR assistant. See `tests/`.
