// database/seed.rs - demo data for a fresh store
//
// Three organizations inserted out of alphabetical order; "Org ABC" holds
// the partner "Partner XYZ" and three users: a super admin, an
// organization admin and "User 123", who is also a partner user.

use super::models::{Organization, Partner, ResourceType, RoleName, User, UserAttrs};
use super::store::{RoleResource, Store, StoreError};

/// The records `seed_demo` created
#[derive(Debug, Clone)]
pub struct DemoData {
    pub org: Organization,
    pub partner: Partner,
    pub super_admin: User,
    pub org_admin: User,
    pub user: User,
}

pub async fn seed_demo(store: &dyn Store) -> Result<DemoData, StoreError> {
    store.create_organization("Zeta Pantry").await?;
    let org = store.create_organization("Org ABC").await?;
    store.create_organization("alpha Bank").await?;
    let partner = store.create_partner("Partner XYZ", Some(org.id)).await?;

    let org_scope = Some((ResourceType::Organization, org.id));
    let super_admin = add_user(store, "Super Admin", "super@example.com", org.id).await?;
    grant(store, &super_admin, RoleName::SuperAdmin, None).await?;
    grant(store, &super_admin, RoleName::OrgUser, org_scope).await?;

    let org_admin = add_user(store, "Org Admin", "org_admin@example.com", org.id).await?;
    grant(store, &org_admin, RoleName::OrgUser, org_scope).await?;
    grant(store, &org_admin, RoleName::OrgAdmin, org_scope).await?;

    let user = add_user(store, "User 123", "user@example.com", org.id).await?;
    grant(store, &user, RoleName::OrgUser, org_scope).await?;
    grant(store, &user, RoleName::Partner, Some((ResourceType::Partner, partner.id))).await?;

    tracing::info!("Seeded demo data: super admin is user {}", super_admin.id);
    Ok(DemoData {
        org,
        partner,
        super_admin,
        org_admin,
        user,
    })
}

async fn add_user(store: &dyn Store, name: &str, email: &str, organization_id: i64) -> Result<User, StoreError> {
    store
        .create_user(&UserAttrs {
            name: name.to_string(),
            email: email.to_string(),
            organization_id: Some(organization_id),
        })
        .await
}

async fn grant(store: &dyn Store, user: &User, name: RoleName, resource: RoleResource) -> Result<(), StoreError> {
    let role = store.find_or_create_role(name, resource).await?;
    store.link_role(user.id, role.id).await
}
