mod common;

use anyhow::Result;
use reqwest::StatusCode;

use admin_users::database::models::{ResourceType, RoleName};
use admin_users::middleware::Flash;

#[tokio::test]
async fn new_form_lists_organizations_alphabetically() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.get_as(&server.super_admin, "/admin/users/new").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await?;
    let select = &body[body.find("user[organization_id]").expect("organization select")..];
    let positions: Vec<usize> = ["alpha Bank", "Org ABC", "Zeta Pantry"]
        .iter()
        .map(|name| select.find(name).unwrap_or_else(|| panic!("{} missing", name)))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", positions);
    Ok(())
}

#[tokio::test]
async fn create_redirects_to_all_organizations_listing() -> Result<()> {
    let server = common::spawn_server().await?;
    let before = server.user_count().await;
    let org_id = server.org.id.to_string();

    let res = server
        .post_as(&server.super_admin, "/admin/users")
        .form(&common::user_form("New Person", "email@email.com", &org_id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&res), "/admin/users?organization_id=admin");
    assert_eq!(common::flash_of(&res), Flash::notice("Created a new user!"));
    assert_eq!(server.user_count().await, before + 1);

    let created = server
        .store
        .find_user_by_email("email@email.com")
        .await?
        .expect("created user");
    assert_eq!(created.organization_id, Some(server.org.id));
    let member = server
        .store
        .user_has_role(created.id, RoleName::OrgUser, Some((ResourceType::Organization, server.org.id)))
        .await?;
    assert!(member, "new user should belong to the organization");
    Ok(())
}

#[tokio::test]
async fn create_accepts_nested_json() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .post_as(&server.super_admin, "/admin/users")
        .json(&serde_json::json!({
            "user": { "email": "json@email.com", "organization_id": server.org.id }
        }))
        .send()
        .await?;

    assert_eq!(common::location(&res), "/admin/users?organization_id=admin");
    assert!(server.store.find_user_by_email("json@email.com").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn invalid_create_re_renders_with_organizations() -> Result<()> {
    let server = common::spawn_server().await?;
    let before = server.user_count().await;
    let org_id = server.org.id.to_string();

    let res = server
        .post_as(&server.super_admin, "/admin/users")
        .form(&common::user_form("Nobody", "", &org_id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.text().await?;
    assert!(body.contains("Failed to create user"));
    assert!(body.contains("Email can&#x27;t be blank") || body.contains("Email can't be blank"));
    for name in ["alpha Bank", "Org ABC", "Zeta Pantry"] {
        assert!(body.contains(name), "{} missing from re-rendered form", name);
    }
    assert_eq!(server.user_count().await, before);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let org_id = server.org.id.to_string();

    let res = server
        .post_as(&server.super_admin, "/admin/users")
        .form(&common::user_form("Copy", "USER@example.com", &org_id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.text().await?.contains("Email has already been taken"));
    Ok(())
}

#[tokio::test]
async fn missing_organization_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .post_as(&server.super_admin, "/admin/users")
        .form(&common::user_form("Lost", "lost@email.com", "9999"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.text().await?.contains("Organization must exist"));
    Ok(())
}
