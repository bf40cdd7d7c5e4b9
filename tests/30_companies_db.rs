mod common;

use anyhow::Result;
use serde_json::json;

// One test function per binary: the connection pool is process-wide and
// bound to the runtime that first opens it.
#[tokio::test]
async fn companies_against_database() -> Result<()> {
    let Some(_pool) = common::test_db().await? else {
        return Ok(());
    };
    let app = common::app();
    let admin = common::admin_token();

    // create
    let new_company = json!({
        "handle": "new",
        "name": "New",
        "logoUrl": "http://new.img",
        "description": "DescNew",
        "numEmployees": 10
    });
    let (status, body) = common::send(&app, "POST", "/companies", Some(&admin), Some(new_company.clone())).await?;
    assert_eq!(status, 201);
    assert_eq!(body, json!({ "company": new_company }));

    let (status, body) = common::send(&app, "POST", "/companies", Some(&admin), Some(new_company)).await?;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], json!("Duplicate company: new"));

    // list, ordered by name
    let (status, body) = common::send(&app, "GET", "/companies", None, None).await?;
    assert_eq!(status, 200);
    let handles: Vec<&str> = body["companies"]
        .as_array()
        .map(|a| a.iter().filter_map(|c| c["handle"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(handles, vec!["c1", "c2", "c3", "new"]);

    // filtering
    let (status, body) = common::send(&app, "GET", "/companies?name=c", None, None).await?;
    assert_eq!(status, 200);
    assert_eq!(body["companies"].as_array().map(Vec::len), Some(3));

    let (_, body) = common::send(&app, "GET", "/companies?minEmployees=1&maxEmployees=3", None, None).await?;
    assert_eq!(
        body,
        json!({ "companies": [{
            "handle": "c2",
            "name": "C2",
            "description": "Desc2",
            "numEmployees": 2,
            "logoUrl": "http://c2.img"
        }] })
    );

    let (_, body) = common::send(&app, "GET", "/companies?name=ne&minEmployees=3", None, None).await?;
    assert_eq!(body["companies"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["companies"][0]["handle"], json!("new"));

    let (_, body) = common::send(&app, "GET", "/companies?name=nope", None, None).await?;
    assert_eq!(body, json!({ "companies": [] }));

    // get with jobs
    let (status, body) = common::send(&app, "GET", "/companies/c1", None, None).await?;
    assert_eq!(status, 200);
    assert_eq!(body["company"]["handle"], json!("c1"));
    let titles: Vec<&str> = body["company"]["jobs"]
        .as_array()
        .map(|a| a.iter().filter_map(|j| j["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["j1", "j2"]);

    let (status, body) = common::send(&app, "GET", "/companies/c3", None, None).await?;
    assert_eq!(status, 200);
    assert_eq!(body["company"]["jobs"], json!([]));

    let (status, body) = common::send(&app, "GET", "/companies/nope", None, None).await?;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": { "message": "No company: nope", "status": 404 } }));

    // partial update
    let (status, body) =
        common::send(&app, "PATCH", "/companies/c1", Some(&admin), Some(json!({ "name": "C1-new" }))).await?;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "company": {
            "handle": "c1",
            "name": "C1-new",
            "description": "Desc1",
            "numEmployees": 1,
            "logoUrl": "http://c1.img"
        } })
    );

    let (status, body) = common::send(
        &app,
        "PATCH",
        "/companies/c2",
        Some(&admin),
        Some(json!({ "numEmployees": 20, "logoUrl": null })),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(body["company"]["numEmployees"], json!(20));
    assert_eq!(body["company"]["logoUrl"], json!(null));

    let (status, _) =
        common::send(&app, "PATCH", "/companies/nope", Some(&admin), Some(json!({ "name": "new nope" }))).await?;
    assert_eq!(status, 404);

    // remove
    let (status, body) = common::send(&app, "DELETE", "/companies/c1", Some(&admin), None).await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "deleted": "c1" }));

    // jobs go with their company
    let (_, body) = common::send(&app, "GET", "/jobs?title=j1", None, None).await?;
    assert_eq!(body, json!({ "jobs": [] }));

    let (status, _) = common::send(&app, "DELETE", "/companies/c1", Some(&admin), None).await?;
    assert_eq!(status, 404);

    // the same routes over a real socket
    let base = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/companies/c2", base)).send().await?;
    assert_eq!(res.status().as_u16(), 200);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["company"]["name"], json!("C2"));

    let res = client.get(format!("{}/health", base)).send().await?;
    assert_eq!(res.status().as_u16(), 200);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["database"], json!("ok"));

    Ok(())
}
