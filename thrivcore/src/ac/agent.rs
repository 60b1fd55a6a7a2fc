use serde::{Deserialize, Serialize};
use super::user::User;

/// The viewer on whose behalf an operation is performed.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Agent {
    #[default]
    Anonymous,
    User(User),
}

mod impls;
