//! Constants shared by test setups.

/// User agent for the test ESI client.
pub static TEST_USER_AGENT: &str =
    "Valkyrie/0.1 (contact@example.com; +https://github.com/autumn-order/valkyrie)";

/// Local Valkey instance used by store tests.
pub static TEST_VALKEY_URL: &str = "redis://127.0.0.1:6379";

/// Store keys written under a test prefix, deleted on cleanup.
pub static TEST_KEY_SUFFIXES: &[&str] = &["battles", "report", "raw", "lock:process", "lock:fetch"];
