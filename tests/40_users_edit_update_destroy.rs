mod common;

use anyhow::Result;
use reqwest::StatusCode;

use admin_users::middleware::Flash;

#[tokio::test]
async fn edit_shows_user_organization_and_partner_role() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .get_as(&server.super_admin, &format!("/admin/users/{}/edit", server.user.id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await?;
    assert!(body.contains("User 123"));
    assert!(body.contains("Org ABC"));
    assert!(body.contains("Partner XYZ"));
    Ok(())
}

#[tokio::test]
async fn edit_of_unknown_user_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;

    for id in ["999999", "abc"] {
        let res = server
            .get_as(&server.super_admin, &format!("/admin/users/{}/edit", id))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", id);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], "NOT_FOUND");
    }
    Ok(())
}

#[tokio::test]
async fn index_filters_by_organization() -> Result<()> {
    let server = common::spawn_server().await?;
    let other = server.store.create_organization("Other Org").await?;
    server
        .store
        .create_user(&admin_users::database::models::UserAttrs {
            name: "Elsewhere".to_string(),
            email: "elsewhere@example.com".to_string(),
            organization_id: Some(other.id),
        })
        .await?;

    let all = server
        .get_as(&server.super_admin, "/admin/users?organization_id=admin")
        .send()
        .await?
        .text()
        .await?;
    assert!(all.contains("User 123") && all.contains("Elsewhere"));

    let filtered = server
        .get_as(&server.super_admin, &format!("/admin/users?organization_id={}", other.id))
        .send()
        .await?
        .text()
        .await?;
    assert!(filtered.contains("Elsewhere"));
    assert!(!filtered.contains("User 123"));
    Ok(())
}

#[tokio::test]
async fn index_rejects_non_numeric_filter() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .get_as(&server.super_admin, "/admin/users?organization_id=nope")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_saves_and_flashes_name() -> Result<()> {
    let server = common::spawn_server().await?;
    let org_id = server.org.id.to_string();

    let res = server
        .patch_as(&server.super_admin, &format!("/admin/users/{}", server.user.id))
        .form(&common::user_form("User 456", "user@example.com", &org_id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&res), "/admin/users?organization_id=admin");
    assert_eq!(common::flash_of(&res), Flash::notice("User 456 updated!"));
    let saved = server.store.find_user(server.user.id).await?.expect("user");
    assert_eq!(saved.name, "User 456");
    Ok(())
}

#[tokio::test]
async fn invalid_update_re_renders_edit() -> Result<()> {
    let server = common::spawn_server().await?;
    let org_id = server.org.id.to_string();

    // Posting from the edit form uses POST instead of PATCH.
    let res = server
        .post_as(&server.super_admin, &format!("/admin/users/{}", server.user.id))
        .form(&common::user_form("User 123", "not-an-email", &org_id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.text().await?;
    assert!(body.contains("Email is invalid"));
    assert!(body.contains("Editing User 123"));
    Ok(())
}

#[tokio::test]
async fn destroy_removes_user() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .delete_as(&server.super_admin, &format!("/admin/users/{}", server.user.id))
        .send()
        .await?;

    assert_eq!(common::location(&res), "/admin/users?organization_id=admin");
    assert_eq!(common::flash_of(&res), Flash::notice("User 123 has been deleted."));
    assert!(server.store.find_user(server.user.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn form_delete_route_removes_user() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .post_as(&server.super_admin, &format!("/admin/users/{}/delete", server.org_admin.id))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(server.store.find_user(server.org_admin.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn super_admin_cannot_delete_themselves() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .delete_as(&server.super_admin, &format!("/admin/users/{}", server.super_admin.id))
        .send()
        .await?;

    assert_eq!(common::flash_of(&res), Flash::alert("You cannot delete yourself."));
    assert!(server.store.find_user(server.super_admin.id).await?.is_some());
    Ok(())
}
