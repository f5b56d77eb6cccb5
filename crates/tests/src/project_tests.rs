use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn create_project_starts_empty_with_zero_progress() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("springfield").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/project", seeded.company_id),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({
            "title": "Spring Planting",
            "description": "North field",
            "status": "planning",
            "team": [seeded.member.id],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["title"], "Spring Planting");
    assert_eq!(project["status"], "planning");
    assert_eq!(project["progress"], 0);
    // The request schema requires a team, but the stored team is derived
    // from task assignees and starts empty.
    assert_eq!(project["team"].as_array().unwrap().len(), 0);
    assert_eq!(project["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_project_requires_non_empty_team() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("notem").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/project", seeded.company_id),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({
            "title": "No Team",
            "team": [],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn list_projects_is_paginated() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("lister").await;

    for i in 0..3 {
        app.create_project(
            &seeded.company_id,
            &seeded.admin.access_token,
            &format!("Project {}", i),
        )
        .await;
    }

    let resp = app
        .auth_get(
            &format!(
                "/api/company/{}/project?page=1&per_page=2",
                seeded.company_id
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["total"], 3);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_pages"], 2);
}

#[tokio::test]
async fn zero_pagination_params_are_clamped() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("clamped").await;
    app.create_project(&seeded.company_id, &seeded.admin.access_token, "Solo")
        .await;

    let resp = app
        .auth_get(
            &format!(
                "/api/company/{}/project?page=0&per_page=0",
                seeded.company_id
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 1);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["total_pages"], 1);
}

#[tokio::test]
async fn update_project_merges_fields() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("updater").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Old Title")
        .await;

    let resp = app
        .auth_put(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({
            "title": "New Title",
            "status": "in_progress",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["title"], "New Title");
    assert_eq!(project["status"], "in_progress");
    // Untouched field survives
    assert_eq!(project["description"], "seeded");
}

#[tokio::test]
async fn delete_project_removes_it() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("deleter").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Doomed")
        .await;

    let resp = app
        .auth_delete(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn member_cannot_create_or_delete_projects() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("policed").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/project", seeded.company_id),
            &seeded.member.access_token,
        )
        .json(&serde_json::json!({
            "title": "Forbidden",
            "team": ["x"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Kept")
        .await;
    let resp = app
        .auth_delete(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.member.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn accountant_cannot_mutate_projects() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("ledger").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Books")
        .await;

    let resp = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/task",
                seeded.company_id, pid
            ),
            &seeded.accountant.access_token,
        )
        .json(&serde_json::json!({ "title": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Reading is still fine for any member
    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.accountant.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}
