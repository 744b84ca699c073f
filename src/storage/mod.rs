pub mod client;
pub mod error;
pub mod media;
pub mod object_ref;
