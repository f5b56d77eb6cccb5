use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn output_add_then_delete_round_trips() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("yield").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Wheat 2026")
        .await;
    let base = format!("/api/company/{}/project/{}", seeded.company_id, pid);

    // Snapshot the prior output list
    let resp = app.auth_get(&base, &seeded.admin.access_token).send().await.unwrap();
    let before: Value = resp.json().await.unwrap();
    assert_eq!(before["outputs"].as_array().unwrap().len(), 0);

    let resp = app
        .auth_post(&format!("{}/output", base), &seeded.member.access_token)
        .json(&serde_json::json!({
            "description": "Winter wheat",
            "quantity": 1200.5,
            "unit": "kg",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let output: Value = resp.json().await.unwrap();
    assert_eq!(output["description"], "Winter wheat");
    assert_eq!(output["quantity"], 1200.5);
    let output_id = output["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_delete(
            &format!("{}/output/{}", base, output_id),
            &seeded.member.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Back to the prior list
    let resp = app.auth_get(&base, &seeded.admin.access_token).send().await.unwrap();
    let after: Value = resp.json().await.unwrap();
    assert_eq!(after["outputs"], before["outputs"]);
}

#[tokio::test]
async fn outputs_do_not_affect_progress() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("static").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Orchard")
        .await;
    let base = format!("/api/company/{}/project/{}", seeded.company_id, pid);

    // One pending task keeps progress at 0
    app.auth_post(&format!("{}/task", base), &seeded.admin.access_token)
        .json(&serde_json::json!({ "title": "Prune trees" }))
        .send()
        .await
        .unwrap();

    app.auth_post(&format!("{}/output", base), &seeded.admin.access_token)
        .json(&serde_json::json!({
            "description": "Apples",
            "quantity": 300.0,
            "unit": "kg",
        }))
        .send()
        .await
        .unwrap();

    let resp = app.auth_get(&base, &seeded.admin.access_token).send().await.unwrap();
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["progress"], 0);
    assert_eq!(project["outputs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_positive_output_quantity_is_rejected() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("zeroed").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Dairy")
        .await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/project/{}/output", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({
            "description": "Milk",
            "quantity": 0.0,
            "unit": "l",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn delete_missing_output_is_not_found() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("ghost").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Hops")
        .await;

    let resp = app
        .auth_delete(
            &format!(
                "/api/company/{}/project/{}/output/{}",
                seeded.company_id,
                pid,
                bson::oid::ObjectId::new().to_hex()
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
