use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Role;

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Role {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::Role;
    use crate::error::ValueError;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        assert_eq!(Role::Admin.to_string(), "Admin");
        assert_eq!(Role::Admin, Role::from_str("Admin")?);
        assert_eq!(Role::User.to_string(), "User");
        assert_eq!(Role::User, Role::from_str("User")?);

        // names are case sensitive
        assert!(Role::from_str("admin").is_err());
        assert!(matches!(
            Role::from_str("Superuser")
                .expect_err("should be an error"),
            ValueError::Unsupported(s) if s == "Superuser",
        ));
        Ok(())
    }
}
