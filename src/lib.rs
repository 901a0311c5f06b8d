//! palette-wander library
//!
//! Wiring for the random-browsing orchestrator: configuration, the simulated
//! browser and page agent, the trending source and the simulation runner.

pub mod app_context;
pub mod browser_impl;
pub mod config;
pub mod errors;
pub mod page_agent;
pub mod simulate;
pub mod trending;

pub use app_context::AppContext;
pub use browser_impl::{BrowserConfig, SimulatedBrowser, SimulatedPage, SiteBehavior};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use simulate::{run_simulation, SimulationPlan, SimulationReport};
