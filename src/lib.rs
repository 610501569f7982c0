pub mod apis;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod rate_limiter;
pub mod types;
pub mod validator;
