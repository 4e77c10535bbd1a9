//! Valkey-backed store tests, run with `--features redis-test` against a local Valkey.

mod valkey;
