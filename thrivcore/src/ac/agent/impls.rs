use crate::ac::{
    role::Role,
    user::User,
};
use super::Agent;

impl Agent {
    pub fn user(&self) -> Option<&User> {
        match self {
            Agent::Anonymous => None,
            Agent::User(user) => Some(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Agent::User(User { role: Role::Admin, .. }))
    }
}

impl From<User> for Agent {
    fn from(user: User) -> Agent {
        Agent::User(user)
    }
}

impl From<Option<User>> for Agent {
    fn from(user: Option<User>) -> Agent {
        user.map(Agent::User).unwrap_or_default()
    }
}

impl From<&Agent> for Option<i64> {
    fn from(agent: &Agent) -> Self {
        agent.user().map(|user| user.id)
    }
}
