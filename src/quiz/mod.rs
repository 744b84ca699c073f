pub mod handlers;
pub mod models;
pub mod sampler;
pub mod scorer;
pub mod session;
