use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::organization::schema::{OrgType, OrganizationEntity};
use crate::modules::user::schema::UserRole;

/// Which tenants a session may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "organizations", rename_all = "snake_case")]
pub enum OrgScope {
    All,
    Orgs(Vec<Uuid>),
    /// No organization: only records the user owns.
    Own,
}

/// Query-side form of a scope. A row passes when its organization is in
/// `orgs` or it belongs to `owner`; with both `None` every row passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub orgs: Option<Vec<Uuid>>,
    pub owner: Option<Uuid>,
}

impl ScopeFilter {
    /// In-memory twin of the SQL predicate the repositories apply.
    pub fn matches(&self, org_id: Option<Uuid>, owner_id: Uuid) -> bool {
        if self.orgs.is_none() && self.owner.is_none() {
            return true;
        }
        let in_orgs = match (&self.orgs, org_id) {
            (Some(ids), Some(id)) => ids.contains(&id),
            _ => false,
        };
        in_orgs || self.owner == Some(owner_id)
    }
}

impl OrgScope {
    /// `descendants` are every organization below `org`, at any depth.
    pub fn resolve(
        role: UserRole,
        org: Option<&OrganizationEntity>,
        descendants: Vec<Uuid>,
    ) -> Self {
        if role == UserRole::SuperAdmin {
            return OrgScope::All;
        }
        match org {
            None => OrgScope::Own,
            Some(org) => match org.org_type {
                OrgType::Master => OrgScope::All,
                OrgType::Company => {
                    let mut ids = Vec::with_capacity(descendants.len() + 1);
                    ids.push(org.id);
                    ids.extend(descendants.into_iter().filter(|id| *id != org.id));
                    OrgScope::Orgs(ids)
                }
                OrgType::Subsidiary => OrgScope::Orgs(vec![org.id]),
            },
        }
    }

    pub fn filter(&self, user_id: Uuid) -> ScopeFilter {
        match self {
            OrgScope::All => ScopeFilter::default(),
            OrgScope::Orgs(ids) => ScopeFilter { orgs: Some(ids.clone()), owner: Some(user_id) },
            OrgScope::Own => ScopeFilter { orgs: None, owner: Some(user_id) },
        }
    }

    /// Whether a record in `org_id` is visible; unassigned records are visible only to `All`.
    pub fn allows(&self, org_id: Option<Uuid>) -> bool {
        match (self, org_id) {
            (OrgScope::All, _) => true,
            (OrgScope::Orgs(ids), Some(id)) => ids.contains(&id),
            _ => false,
        }
    }

    pub fn cache_key(&self, user_id: Uuid) -> String {
        match self {
            OrgScope::All => "all".to_string(),
            OrgScope::Orgs(ids) => {
                let mut ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
                ids.sort();
                format!("orgs:{}:{user_id}", ids.join(","))
            }
            OrgScope::Own => format!("own:{user_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(org_type: OrgType) -> OrganizationEntity {
        OrganizationEntity {
            id: Uuid::now_v7(),
            name: "Acme".into(),
            org_type,
            parent_id: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn super_admin_sees_everything() {
        let sub = org(OrgType::Subsidiary);
        assert_eq!(OrgScope::resolve(UserRole::SuperAdmin, Some(&sub), vec![]), OrgScope::All);
        assert_eq!(OrgScope::resolve(UserRole::SuperAdmin, None, vec![]), OrgScope::All);
    }

    #[test]
    fn master_members_see_everything() {
        let master = org(OrgType::Master);
        assert_eq!(OrgScope::resolve(UserRole::Viewer, Some(&master), vec![]), OrgScope::All);
    }

    #[test]
    fn company_includes_descendants() {
        let company = org(OrgType::Company);
        let child = Uuid::now_v7();
        let scope = OrgScope::resolve(UserRole::Admin, Some(&company), vec![child]);

        assert_eq!(scope, OrgScope::Orgs(vec![company.id, child]));
        assert!(scope.allows(Some(child)));
        assert!(!scope.allows(Some(Uuid::now_v7())));
        assert!(!scope.allows(None));
    }

    #[test]
    fn subsidiary_is_limited_to_itself() {
        let sub = org(OrgType::Subsidiary);
        let scope = OrgScope::resolve(UserRole::Inspector, Some(&sub), vec![Uuid::now_v7()]);
        assert_eq!(scope, OrgScope::Orgs(vec![sub.id]));
    }

    #[test]
    fn unassigned_users_see_own_records() {
        let user = Uuid::now_v7();
        let scope = OrgScope::resolve(UserRole::Inspector, None, vec![]);

        assert_eq!(scope, OrgScope::Own);
        assert_eq!(scope.filter(user), ScopeFilter { orgs: None, owner: Some(user) });
        assert_eq!(scope.cache_key(user), format!("own:{user}"));
    }

    #[test]
    fn org_filter_keeps_records_the_user_owns_elsewhere() {
        let user = Uuid::now_v7();
        let mine = Uuid::now_v7();
        let filter = OrgScope::Orgs(vec![mine]).filter(user);

        assert!(filter.matches(Some(mine), Uuid::now_v7()));
        assert!(filter.matches(Some(Uuid::now_v7()), user));
        assert!(filter.matches(None, user));
        assert!(!filter.matches(Some(Uuid::now_v7()), Uuid::now_v7()));
        assert!(!filter.matches(None, Uuid::now_v7()));

        let other = OrgScope::Orgs(vec![mine]);
        assert_ne!(other.cache_key(user), other.cache_key(Uuid::now_v7()));
    }

    #[test]
    fn unrestricted_filter_matches_everything() {
        let filter = OrgScope::All.filter(Uuid::now_v7());
        assert_eq!(filter, ScopeFilter::default());
        assert!(filter.matches(None, Uuid::now_v7()));
    }

    #[test]
    fn required_parent_follows_hierarchy() {
        assert_eq!(OrgType::Master.required_parent(), None);
        assert_eq!(OrgType::Company.required_parent(), Some(OrgType::Master));
        assert_eq!(OrgType::Subsidiary.required_parent(), Some(OrgType::Company));
    }
}
