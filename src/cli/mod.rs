pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod ledger;
pub mod output;
pub mod palettes;
pub mod runtime;
pub mod settings;
pub mod simulate;
pub mod trending;
