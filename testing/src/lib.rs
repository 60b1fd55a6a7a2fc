#[cfg(feature = "chrono")]
pub mod chrono;
#[cfg(feature = "platform")]
pub mod fixture;
pub mod mail;
pub mod policy;
pub mod search;
