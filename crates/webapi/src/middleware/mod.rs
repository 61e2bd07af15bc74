pub mod backpressure;
pub mod jwt;
pub mod rate_limit;
pub mod request_log;
pub mod security;
pub mod validate;
