pub mod analyzers;
pub mod error;
pub mod loader;
pub mod output;
pub mod record;
pub mod stats;
