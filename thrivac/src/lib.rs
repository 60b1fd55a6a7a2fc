pub mod owner;
mod policy;

pub use policy::PolicyEnforcer;
