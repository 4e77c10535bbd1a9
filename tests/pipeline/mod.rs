//! End-to-end runs over the in-memory store: RedisQ polls through mockito, battle
//! processing, and report rendering against mocked ESI.

mod fetch_and_process;
