pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod source;
#[cfg(test)]
pub mod test_helpers;
