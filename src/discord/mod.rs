mod sdk;

pub use sdk::{DiscordSdk, DiscordSession};
