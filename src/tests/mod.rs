mod api;
mod common;
mod session_store;
