pub mod builder;
pub mod defaults;
pub mod provider;
pub mod runtime;
pub mod traits;
