pub mod lookup_service;
pub mod metrics_service;
pub mod portfolio_service;
pub mod view_service;
