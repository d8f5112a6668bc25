use crate::page::RawPage;

pub mod local;
pub mod proxy;

/// Somewhere a profile page can be loaded from.
pub trait Source {
    fn load(&self) -> anyhow::Result<RawPage>;
    /// Human-readable origin, used in status lines.
    fn describe(&self) -> String;
}
