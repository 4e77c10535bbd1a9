//! Lua scripts for the Valkey store

// Atomically read and clear the raw packet queue so packets pushed while a drain runs
// are never lost between LRANGE and DEL.
//
// KEYS[1]: list key (raw packet queue)
//
// Returns: every queued packet, oldest first
pub static DRAIN_QUEUE_SCRIPT: &str = r#"
local queue_key = KEYS[1]

local items = redis.call('LRANGE', queue_key, 0, -1)
if #items > 0 then
    redis.call('DEL', queue_key)
end
return items
"#;
