use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn member_can_comment_and_delete_own_comment() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("talkers").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Silage")
        .await;
    let base = format!("/api/company/{}/project/{}", seeded.company_id, pid);

    let resp = app
        .auth_post(&format!("{}/comment", base), &seeded.member.access_token)
        .json(&serde_json::json!({ "text": "Looks good to me" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let comment: Value = resp.json().await.unwrap();
    assert_eq!(comment["text"], "Looks good to me");
    assert_eq!(comment["author_id"], seeded.member.id);
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_delete(
            &format!("{}/comment/{}", base, comment_id),
            &seeded.member.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app.auth_get(&base, &seeded.member.access_token).send().await.unwrap();
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["comments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn only_the_author_can_delete_a_comment() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("authors").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Drainage")
        .await;
    let base = format!("/api/company/{}/project/{}", seeded.company_id, pid);

    let resp = app
        .auth_post(&format!("{}/comment", base), &seeded.member.access_token)
        .json(&serde_json::json!({ "text": "Mine" }))
        .send()
        .await
        .unwrap();
    let comment: Value = resp.json().await.unwrap();
    let comment_id = comment["id"].as_str().unwrap().to_string();

    // Even the admin cannot delete someone else's comment
    let resp = app
        .auth_delete(
            &format!("{}/comment/{}", base, comment_id),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // The comment list is unchanged
    let resp = app.auth_get(&base, &seeded.admin.access_token).send().await.unwrap();
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("blank").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Weeding")
        .await;

    let resp = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/comment",
                seeded.company_id, pid
            ),
            &seeded.member.access_token,
        )
        .json(&serde_json::json!({ "text": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
