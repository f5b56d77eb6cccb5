use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn project_csv_export_is_parseable() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("csvout").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Olives")
        .await;

    // One completed task of two: 50% progress
    let base = format!("/api/company/{}/project/{}", seeded.company_id, pid);
    app.auth_post(&format!("{}/task", base), &seeded.admin.access_token)
        .json(&serde_json::json!({ "title": "Prune", "status": "completed" }))
        .send()
        .await
        .unwrap();
    app.auth_post(&format!("{}/task", base), &seeded.admin.access_token)
        .json(&serde_json::json!({ "title": "Press" }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            &format!("/api/company/{}/export/project?format=csv", seeded.company_id),
            &seeded.accountant.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let body = resp.bytes().await.unwrap();
    let mut reader = csv::Reader::from_reader(body.as_ref());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Title");
    assert_eq!(&headers[2], "Progress (%)");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Olives");
    assert_eq!(&records[0][2], "50");
    assert_eq!(&records[0][4], "2");
}

#[tokio::test]
async fn resource_pdf_export_has_pdf_magic() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("pdfout").await;
    app.create_resource(
        &seeded.company_id,
        &seeded.admin.access_token,
        "Hay",
        "feed",
        200.0,
        "bales",
    )
    .await;

    let resp = app
        .auth_get(
            &format!(
                "/api/company/{}/export/resource?format=pdf",
                seeded.company_id
            ),
            &seeded.accountant.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "application/pdf");

    let body = resp.bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("%%EOF"));
    assert!(text.contains("Hay"));
}

#[tokio::test]
async fn output_export_lists_project_outputs() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("harvest").await;
    let pid = app
        .create_project(&seeded.company_id, &seeded.admin.access_token, "Potatoes")
        .await;

    app.auth_post(
        &format!("/api/company/{}/project/{}/output", seeded.company_id, pid),
        &seeded.admin.access_token,
    )
    .json(&serde_json::json!({
        "description": "Early crop",
        "quantity": 850.0,
        "unit": "kg",
    }))
    .send()
    .await
    .unwrap();

    let resp = app
        .auth_get(
            &format!(
                "/api/company/{}/export/project/{}/output",
                seeded.company_id, pid
            ),
            &seeded.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let body = resp.bytes().await.unwrap();
    let mut reader = csv::Reader::from_reader(body.as_ref());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Early crop");
    assert_eq!(&records[0][1], "850");
}

#[tokio::test]
async fn member_cannot_export_reports() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_company("noreport").await;

    let resp = app
        .auth_get(
            &format!("/api/company/{}/export/project", seeded.company_id),
            &seeded.member.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
