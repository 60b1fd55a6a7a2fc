pub mod config;
pub mod error;
pub mod facet;
pub mod platform;

pub use platform::Platform;

pub(crate) mod chrono {
    #[cfg(not(test))]
    pub use ::chrono::Utc;
    #[cfg(test)]
    pub use test_thriv::chrono::Utc;
}
