pub mod agent;
pub mod role;
pub mod traits;
pub mod user;

pub use self::agent::Agent;
pub use self::role::Role;
pub use self::user::User;
