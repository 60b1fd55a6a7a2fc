use std::collections::BTreeSet;

/// The set of co-owner addresses listed in a resource's owner string.
///
/// Entries are separated by `;`, `,` or runs of whitespace, and are
/// case-folded on parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Owners(BTreeSet<String>);

impl Owners {
    pub fn parse(s: &str) -> Self {
        Self(s
            .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect()
        )
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.contains(email.trim().to_lowercase().as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Option<&str>> for Owners {
    fn from(s: Option<&str>) -> Self {
        s.map(Owners::parse).unwrap_or_default()
    }
}

/// Whether `email` is listed among the owners.
pub fn is_owner(owner: Option<&str>, email: &str) -> bool {
    !email.trim().is_empty() && Owners::from(owner).contains(email)
}
