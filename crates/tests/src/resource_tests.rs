use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn resource_status_follows_quantity() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("stocked").await;

    // Above the low-stock threshold (10.0 in test settings)
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Wheat seed",
            "seeds",
            120.0,
            "kg",
        )
        .await;

    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["status"], "available");

    // Drop below the threshold
    let resp = app
        .auth_put(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "quantity": 4.0 }))
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["status"], "low_stock");

    // And to zero
    let resp = app
        .auth_put(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "quantity": 0.0 }))
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["status"], "out_of_stock");
}

#[tokio::test]
async fn resources_are_listed_by_name() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("sorted").await;

    for (name, category) in [("Tractor", "equipment"), ("Diesel", "other"), ("NPK", "fertilizer")] {
        app.create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            name,
            category,
            50.0,
            "unit",
        )
        .await;
    }

    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource", seeded.company_id),
            &seeded.member.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let resources: Vec<Value> = resp.json().await.unwrap();
    let names: Vec<&str> = resources.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Diesel", "NPK", "Tractor"]);
}

#[tokio::test]
async fn member_cannot_manage_resources() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("guarded").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/resource", seeded.company_id),
            &seeded.member.access_token,
        )
        .json(&serde_json::json!({
            "name": "Pesticide X",
            "category": "pesticide",
            "quantity": 10.0,
            "unit": "l",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("negative").await;

    let resp = app
        .auth_post(
            &format!("/api/company/{}/resource", seeded.company_id),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({
            "name": "Antimatter",
            "quantity": -1.0,
            "unit": "kg",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn delete_resource_removes_it() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("cleanup").await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Old plow",
            "equipment",
            1.0,
            "unit",
        )
        .await;

    let resp = app
        .auth_delete(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
