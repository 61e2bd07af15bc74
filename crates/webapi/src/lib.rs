pub mod handler;
pub mod limiter;
pub mod middleware;
