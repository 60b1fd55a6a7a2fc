use thrivcore::{
    ac::{
        agent::Agent,
        traits::Enforcer,
        user::User,
    },
    resource::Resource,
};

use crate::owner::is_owner;
use super::PolicyEnforcer;

impl PolicyEnforcer {
    pub fn new() -> Self {
        Self
    }

    fn owns(user: &User, resource: &Resource) -> bool {
        is_owner(resource.owner.as_deref(), &user.email)
    }
}

impl Enforcer for PolicyEnforcer {
    fn can_view(&self, agent: &Agent, resource: &Resource) -> bool {
        let result = match agent {
            agent if agent.is_admin() => true,
            Agent::Anonymous => resource.approved.is_approved() && !resource.private,
            Agent::User(user) => {
                (
                    resource.approved.is_approved() && (
                        !resource.private
                        || (
                            user.institution_id.is_some()
                            && user.institution_id == resource.institution_id
                        )
                    )
                ) || Self::owns(user, resource)
            }
        };
        log::trace!("can_view: agent={:?} resource={} -> {result}", Option::<i64>::from(agent), resource.id);
        result
    }

    fn can_edit(&self, agent: &Agent, resource: &Resource) -> bool {
        let result = match agent {
            agent if agent.is_admin() => true,
            Agent::Anonymous => false,
            Agent::User(user) => Self::owns(user, resource),
        };
        log::trace!("can_edit: agent={:?} resource={} -> {result}", Option::<i64>::from(agent), resource.id);
        result
    }

    fn can_delete(&self, agent: &Agent, resource: &Resource) -> bool {
        self.can_edit(agent, resource)
    }
}

#[cfg(test)]
mod test {
    use test_thriv::policy::{admin, user};
    use thrivcore::{
        ac::{
            agent::Agent,
            traits::Enforcer,
        },
        resource::{
            Approval,
            Resource,
        },
    };
    use crate::PolicyEnforcer;

    fn resource(approved: Approval, private: bool, institution_id: Option<i64>) -> Resource {
        Resource {
            id: 1,
            name: "Test Resource".into(),
            owner: Some("a@x.com; B@X.com, c@x.com d@x.com".into()),
            approved,
            private,
            institution_id,
            segment_id: 1,
            ..Default::default()
        }
    }

    #[test]
    fn admin_sees_everything() {
        let enforcer = PolicyEnforcer::new();
        let admin = admin("admin@x.com", None);
        for approved in [Approval::Approved, Approval::Unapproved] {
            for private in [true, false] {
                let r = resource(approved, private, Some(1));
                assert!(enforcer.can_view(&admin, &r));
                assert!(enforcer.can_edit(&admin, &r));
                assert!(enforcer.can_delete(&admin, &r));
            }
        }
    }

    #[test]
    fn anonymous() {
        let enforcer = PolicyEnforcer::new();
        let anon = Agent::Anonymous;
        assert!(enforcer.can_view(&anon, &resource(Approval::Approved, false, Some(1))));
        assert!(!enforcer.can_view(&anon, &resource(Approval::Approved, true, Some(1))));
        assert!(!enforcer.can_view(&anon, &resource(Approval::Unapproved, false, Some(1))));
        assert!(!enforcer.can_view(&anon, &resource(Approval::Unapproved, true, Some(1))));
        assert!(!enforcer.can_edit(&anon, &resource(Approval::Approved, false, Some(1))));
        assert!(!enforcer.can_delete(&anon, &resource(Approval::Approved, false, Some(1))));
    }

    #[test]
    fn institution_scoping() {
        let enforcer = PolicyEnforcer::new();
        let r = resource(Approval::Approved, true, Some(1));
        let v1 = user("v1@uva.edu", Some(1));
        let v2 = user("v2@vt.edu", Some(2));
        let admin = admin("admin@x.com", Some(2));
        assert!(enforcer.can_view(&v1, &r));
        assert!(!enforcer.can_view(&v2, &r));
        assert!(enforcer.can_view(&admin, &r));
        // institution membership never grants edit
        assert!(!enforcer.can_edit(&v1, &r));

        // unapproved private resource is hidden even within the institution
        let r = resource(Approval::Unapproved, true, Some(1));
        assert!(!enforcer.can_view(&v1, &r));

        // no home institution never matches a resource without one
        let r = resource(Approval::Approved, true, None);
        assert!(!enforcer.can_view(&user("nobody@x.com", None), &r));
    }

    #[test]
    fn owners() {
        let enforcer = PolicyEnforcer::new();
        let r = resource(Approval::Unapproved, true, Some(1));
        let owner = user("B@x.com", Some(2));
        assert!(enforcer.can_view(&owner, &r));
        assert!(enforcer.can_edit(&owner, &r));
        assert!(enforcer.can_delete(&owner, &r));

        let stranger = user("e@x.com", Some(1));
        assert!(!enforcer.can_view(&stranger, &r));
        assert!(!enforcer.can_edit(&stranger, &r));
        assert!(!enforcer.can_delete(&stranger, &r));
    }

    #[test]
    fn no_owner() {
        let enforcer = PolicyEnforcer::new();
        let r = Resource {
            owner: None,
            ..resource(Approval::Approved, false, Some(1))
        };
        let v = user("v@x.com", Some(1));
        assert!(enforcer.can_view(&v, &r));
        assert!(!enforcer.can_edit(&v, &r));
        assert!(!enforcer.can_delete(&v, &r));
    }
}
