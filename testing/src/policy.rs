use thrivcore::ac::{
    Agent,
    Role,
    User,
};

fn agent(email: &str, role: Role, institution_id: Option<i64>) -> Agent {
    User {
        id: 0,
        email: email.to_string(),
        display_name: email.split('@').next().unwrap_or_default().to_string(),
        role,
        institution_id,
    }.into()
}

pub fn user(email: &str, institution_id: Option<i64>) -> Agent {
    agent(email, Role::User, institution_id)
}

pub fn admin(email: &str, institution_id: Option<i64>) -> Agent {
    agent(email, Role::Admin, institution_id)
}
