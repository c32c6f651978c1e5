pub mod errors;
pub mod transcript;
