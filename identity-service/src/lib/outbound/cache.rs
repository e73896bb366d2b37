pub mod memory;
pub mod redis;

pub use memory::InMemorySessionCache;
pub use self::redis::RedisSessionCache;
