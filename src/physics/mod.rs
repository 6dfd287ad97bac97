//! Physics built on the mesh operators.

pub mod config;
pub mod groundwater;
pub mod mass_balance;

pub use config::DupuitConfig;
pub use groundwater::DupuitPercolator;
pub use mass_balance::MassBalance;
