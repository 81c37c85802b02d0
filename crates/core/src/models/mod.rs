pub mod asset;
pub mod holding;
pub mod metrics;
pub mod notice;
pub mod portfolio;
pub mod quote;
pub mod settings;
pub mod view;
