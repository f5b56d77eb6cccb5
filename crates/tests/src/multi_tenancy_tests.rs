use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn outsiders_cannot_read_another_companys_projects() {
    let app = TestApp::spawn().await;
    let farm = app.seed_company("farmone").await;
    let (outsider, _) = app
        .register_user(
            "outsider@other.test",
            "Outsider",
            "Password123!",
            "Other Co-op",
        )
        .await;

    let pid = app
        .create_project(&farm.company_id, &farm.admin.access_token, "Secret Crop")
        .await;

    let resp = app
        .auth_get(
            &format!("/api/company/{}/project", farm.company_id),
            &outsider.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", farm.company_id, pid),
            &outsider.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn outsiders_cannot_mutate_another_companys_data() {
    let app = TestApp::spawn().await;
    let farm = app.seed_company("farmtwo").await;
    let (outsider, _) = app
        .register_user(
            "rival@other.test",
            "Rival",
            "Password123!",
            "Rival Co-op",
        )
        .await;

    let pid = app
        .create_project(&farm.company_id, &farm.admin.access_token, "Granary")
        .await;

    let resp = app
        .auth_delete(
            &format!("/api/company/{}/project/{}", farm.company_id, pid),
            &outsider.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_post(
            &format!("/api/company/{}/resource", farm.company_id),
            &outsider.access_token,
        )
        .json(&serde_json::json!({
            "name": "Planted evidence",
            "quantity": 1.0,
            "unit": "unit",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Still there, untouched
    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", farm.company_id, pid),
            &farm.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn project_ids_do_not_leak_across_companies() {
    let app = TestApp::spawn().await;
    let one = app.seed_company("isolated1").await;
    let two = app.seed_company("isolated2").await;

    let pid = app
        .create_project(&one.company_id, &one.admin.access_token, "Mine")
        .await;

    // A valid id fetched through the wrong company scope is NotFound
    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", two.company_id, pid),
            &two.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn feeds_are_scoped_to_the_company() {
    let app = TestApp::spawn().await;
    let one = app.seed_company("feedone").await;
    let two = app.seed_company("feedtwo").await;

    app.create_project(&one.company_id, &one.admin.access_token, "Only Here")
        .await;
    app.settle().await;

    let resp = app
        .auth_get(
            &format!("/api/company/{}/activity", two.company_id),
            &two.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let feed: Vec<Value> = resp.json().await.unwrap();
    assert!(
        feed.iter()
            .all(|e| !e["message"].as_str().unwrap().contains("Only Here"))
    );
}

#[tokio::test]
async fn non_admins_cannot_add_members() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("gates").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/member", seeded.company_id),
            &seeded.member.access_token,
        )
        .json(&serde_json::json!({
            "email": "sneaky@gates.test",
            "display_name": "Sneaky",
            "password": "Password123!",
            "role": "admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
