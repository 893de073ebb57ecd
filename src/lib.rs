use anyhow::Result;

pub use self::core::Context;

pub mod core;
pub mod error;
pub mod modules;

impl Context<'_> {
    /// Registers every built-in keyword example.
    pub fn with_basic_modules(self) -> Result<Self> {
        self.with_module(modules::BaseModule)
    }
}
