use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn allocate_debits_ledger_and_records_on_project() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("alloc").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Corn")
        .await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Corn seed",
            "seeds",
            100.0,
            "kg",
        )
        .await;

    let resp = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/allocation",
                seeded.company_id, pid
            ),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 30.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let record: Value = resp.json().await.unwrap();
    assert_eq!(record["name"], "Corn seed");
    assert_eq!(record["quantity"], 30.0);

    // Ledger debited
    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["quantity"], 70.0);

    // Allocation record on the aggregate
    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let project: Value = resp.json().await.unwrap();
    let allocations = project["allocated_resources"].as_array().unwrap();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0]["resource_id"], rid);
}

#[tokio::test]
async fn insufficient_stock_is_a_conflict_and_writes_nothing() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("shortage").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Barley")
        .await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Barley seed",
            "seeds",
            10.0,
            "kg",
        )
        .await;

    let resp = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/allocation",
                seeded.company_id, pid
            ),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 11.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let err: Value = resp.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("Insufficient stock"));

    // Nothing moved
    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["quantity"], 10.0);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["allocated_resources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn double_allocation_of_same_resource_is_a_conflict() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("twice").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Rye")
        .await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Rye seed",
            "seeds",
            100.0,
            "kg",
        )
        .await;
    let path = format!(
        "/api/company/{}/project/{}/allocation",
        seeded.company_id, pid
    );

    let resp = app
        .auth_post(&path, &seeded.admin.access_token)
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post(&path, &seeded.admin.access_token)
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let err: Value = resp.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("already allocated"));
}

#[tokio::test]
async fn deallocate_restores_quantity_and_removes_record() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("restore").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Oats")
        .await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Oat seed",
            "seeds",
            50.0,
            "kg",
        )
        .await;

    app.auth_post(
        &format!(
            "/api/company/{}/project/{}/allocation",
            seeded.company_id, pid
        ),
        &seeded.admin.access_token,
    )
    .json(&serde_json::json!({ "resource_id": rid, "quantity": 15.0 }))
    .send()
    .await
    .unwrap();

    let resp = app
        .auth_delete(
            &format!(
                "/api/company/{}/project/{}/allocation/{}",
                seeded.company_id, pid, rid
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["quantity"], 50.0);

    let resp = app
        .auth_get(
            &format!("/api/company/{}/project/{}", seeded.company_id, pid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["allocated_resources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deallocate_without_allocation_is_not_found() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("nothing").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Fallow")
        .await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Lime",
            "other",
            10.0,
            "kg",
        )
        .await;

    let resp = app
        .auth_delete(
            &format!(
                "/api/company/{}/project/{}/allocation/{}",
                seeded.company_id, pid, rid
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // Quantity untouched
    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["quantity"], 10.0);
}

#[tokio::test]
async fn concurrent_allocations_cannot_over_commit() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("race").await;
    let rid = app
        .create_resource(
            &seeded.company_id,
            &seeded.admin.access_token,
            "Diesel",
            "other",
            10.0,
            "l",
        )
        .await;
    let pid_a = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Field A")
        .await;
    let pid_b = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Field B")
        .await;

    // Two projects each want 6 of the 10 available
    let req_a = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/allocation",
                seeded.company_id, pid_a
            ),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 6.0 }))
        .send();
    let req_b = app
        .auth_post(
            &format!(
                "/api/company/{}/project/{}/allocation",
                seeded.company_id, pid_b
            ),
            &seeded.admin.access_token,
        )
        .json(&serde_json::json!({ "resource_id": rid, "quantity": 6.0 }))
        .send();

    let (resp_a, resp_b) = tokio::join!(req_a, req_b);
    let status_a = resp_a.unwrap().status().as_u16();
    let status_b = resp_b.unwrap().status().as_u16();

    let mut statuses = [status_a, status_b];
    statuses.sort();
    assert_eq!(statuses, [201, 409], "exactly one allocation may win");

    // The winner left 4 behind; never negative
    let resp = app
        .auth_get(
            &format!("/api/company/{}/resource/{}", seeded.company_id, rid),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let resource: Value = resp.json().await.unwrap();
    assert_eq!(resource["quantity"], 4.0);
}
