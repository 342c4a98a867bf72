pub mod clock;
pub mod config;
pub mod directory;
pub mod email;
pub mod generators;
pub mod persistence;

pub use clock::{ManualClock, SystemClock};
pub use config::{EmailProofSetting, RedisSetting, StoreSetting};
pub use directory::HashSetUserDirectory;
pub use email::{MockEmailClient, SentEmail};
pub use generators::{RandomCodeGenerator, SeededCodeGenerator};
pub use persistence::{HashMapProofCache, RedisProofCache};
