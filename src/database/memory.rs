use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::models::{alphabetize, Organization, Partner, Role, RoleName, User, UserAttrs};
use super::store::{role_matches, RoleResource, Store, StoreError};

#[derive(Default)]
struct Tables {
    organizations: BTreeMap<i64, Organization>,
    partners: BTreeMap<i64, Partner>,
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    users_roles: BTreeSet<(i64, i64)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store used when no database is configured, and by tests
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let tables = self.tables.read().await;
        let mut organizations: Vec<_> = tables.organizations.values().cloned().collect();
        alphabetize(&mut organizations);
        Ok(organizations)
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError> {
        let mut tables = self.tables.write().await;
        let organization = Organization {
            id: tables.next_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn list_partners(&self) -> Result<Vec<Partner>, StoreError> {
        let tables = self.tables.read().await;
        let mut partners: Vec<_> = tables.partners.values().cloned().collect();
        partners.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(partners)
    }

    async fn find_partner(&self, id: i64) -> Result<Option<Partner>, StoreError> {
        Ok(self.tables.read().await.partners.get(&id).cloned())
    }

    async fn create_partner(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<Partner, StoreError> {
        let mut tables = self.tables.write().await;
        let partner = Partner {
            id: tables.next_id(),
            name: name.to_string(),
            organization_id,
            created_at: Utc::now(),
        };
        tables.partners.insert(partner.id, partner.clone());
        Ok(partner)
    }

    async fn list_users(&self, organization_id: Option<i64>) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        let mut users: Vec<_> = tables
            .users
            .values()
            .filter(|u| organization_id.is_none() || u.organization_id == organization_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, attrs: &UserAttrs) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&attrs.email)) {
            return Err(StoreError::Conflict(format!("email {} is already taken", attrs.email)));
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            name: attrs.name.clone(),
            email: attrs.email.clone(),
            organization_id: attrs.organization_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, attrs: &UserAttrs) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&attrs.email))
        {
            return Err(StoreError::Conflict(format!("email {} is already taken", attrs.email)));
        }
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.name = attrs.name.clone();
        user.email = attrs.email.clone();
        user.organization_id = attrs.organization_id;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        tables.users_roles.retain(|(user_id, _)| *user_id != id);
        Ok(())
    }

    async fn find_role_by(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Option<Role>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .values()
            .find(|role| role_matches(role, name, resource))
            .cloned())
    }

    async fn find_or_create_role(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Role, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(role) = tables.roles.values().find(|role| role_matches(role, name, resource)) {
            return Ok(role.clone());
        }
        let role = Role {
            id: tables.next_id(),
            name: name.as_str().to_string(),
            resource_type: resource.map(|(kind, _)| kind.as_str().to_string()),
            resource_id: resource.map(|(_, id)| id),
            created_at: Utc::now(),
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users_roles
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, role_id)| tables.roles.get(role_id).cloned())
            .collect())
    }

    async fn link_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(format!("user {}", user_id)));
        }
        if !tables.roles.contains_key(&role_id) {
            return Err(StoreError::NotFound(format!("role {}", role_id)));
        }
        tables.users_roles.insert((user_id, role_id));
        Ok(())
    }

    async fn unlink_role(&self, user_id: i64, role_id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.users_roles.remove(&(user_id, role_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ResourceType;

    fn attrs(name: &str, email: &str, organization_id: Option<i64>) -> UserAttrs {
        UserAttrs {
            name: name.to_string(),
            email: email.to_string(),
            organization_id,
        }
    }

    #[tokio::test]
    async fn organizations_are_alphabetized() {
        let store = MemoryStore::new();
        store.create_organization("zeta").await.unwrap();
        store.create_organization("Alpha").await.unwrap();
        store.create_organization("beta").await.unwrap();

        let names: Vec<_> = store
            .list_organizations()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_user(&attrs("A", "a@example.com", None)).await.unwrap();
        let err = store
            .create_user(&attrs("B", "A@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn role_rows_are_shared_and_links_are_idempotent() {
        let store = MemoryStore::new();
        let org = store.create_organization("Org").await.unwrap();
        let user = store.create_user(&attrs("A", "a@example.com", Some(org.id))).await.unwrap();
        let scope = Some((ResourceType::Organization, org.id));

        let first = store.find_or_create_role(RoleName::OrgUser, scope).await.unwrap();
        let second = store.find_or_create_role(RoleName::OrgUser, scope).await.unwrap();
        assert_eq!(first.id, second.id);

        store.link_role(user.id, first.id).await.unwrap();
        store.link_role(user.id, first.id).await.unwrap();
        assert_eq!(store.roles_for_user(user.id).await.unwrap().len(), 1);
        assert!(store.user_has_role(user.id, RoleName::OrgUser, scope).await.unwrap());
        assert!(!store.user_has_role(user.id, RoleName::OrgAdmin, scope).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_user_drops_their_links() {
        let store = MemoryStore::new();
        let user = store.create_user(&attrs("A", "a@example.com", None)).await.unwrap();
        let role = store.find_or_create_role(RoleName::SuperAdmin, None).await.unwrap();
        store.link_role(user.id, role.id).await.unwrap();

        store.delete_user(user.id).await.unwrap();
        assert!(store.roles_for_user(user.id).await.unwrap().is_empty());
        assert!(!store.unlink_role(user.id, role.id).await.unwrap());
    }

    #[tokio::test]
    async fn users_filter_by_organization() {
        let store = MemoryStore::new();
        let a = store.create_organization("A").await.unwrap();
        let b = store.create_organization("B").await.unwrap();
        store.create_user(&attrs("In A", "1@example.com", Some(a.id))).await.unwrap();
        store.create_user(&attrs("In B", "2@example.com", Some(b.id))).await.unwrap();

        assert_eq!(store.list_users(None).await.unwrap().len(), 2);
        let only_a = store.list_users(Some(a.id)).await.unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].name, "In A");
    }
}
