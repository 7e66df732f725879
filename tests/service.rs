use faxinex_backend::modules::store::memory::MemoryStore;
use faxinex_backend::modules::store::DynStore;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

mod tools;

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let store: DynStore = Arc::new(MemoryStore::new());
    let app_data = tools::AppData::new(store).await;
    let client = app_data.client();

    let res = client
        .post(app_data.url("/api/users/sync"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_check_works() {
    let store: DynStore = Arc::new(MemoryStore::new());
    let app_data = tools::AppData::new(store).await;
    let client = app_data.client();

    let res = client
        .get(app_data.url("/api/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_flow_over_http() {
    let store: DynStore = Arc::new(MemoryStore::new());
    let app_data = tools::AppData::new(store).await;
    let client = app_data.client();

    let ana = tools::claims_for("user_ana", "Ana", "ana@example.com");
    let carlos = tools::claims_for("user_carlos", "Carlos", "carlos@example.com");
    let ana_token = app_data.token_for(&ana);
    let carlos_token = app_data.token_for(&carlos);

    // sync-on-login creates both user documents
    for token in [&ana_token, &carlos_token] {
        let res = client
            .post(app_data.url("/api/users/sync"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    // Ana creates the household
    let res = client
        .post(app_data.url("/api/groups"))
        .bearer_auth(&ana_token)
        .json(&json!({ "name": "Casa", "description": "Tarefas da casa" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let group: Value = res.json().await.unwrap();
    let group_id = group["id"].as_str().unwrap().to_string();
    assert_eq!(group_id.len(), 5);
    assert_eq!(group["createdBy"], json!("user_ana"));

    // Carlos joins with the code
    let res = client
        .post(app_data.url("/api/groups/join"))
        .bearer_auth(&carlos_token)
        .json(&json!({ "code": group_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(app_data.url(&format!("/api/groups/{group_id}")))
        .bearer_auth(&ana_token)
        .send()
        .await
        .unwrap();
    let view: Value = res.json().await.unwrap();
    assert_eq!(view["participants"], json!(["user_ana", "user_carlos"]));
    assert_eq!(view["members"].as_array().unwrap().len(), 2);

    // a shared chore, medium difficulty
    let res = client
        .post(app_data.url("/api/tasks"))
        .bearer_auth(&ana_token)
        .json(&json!({
            "group_id": group_id,
            "name": "Limpar cozinha",
            "description": "Pia e fogão",
            "category": "Cozinha",
            "difficulty": 2,
            "participants": ["user_ana", "user_carlos"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let task: Value = res.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], json!("Pendente"));

    // Ana completes it; both participants earn the full reward
    let res = client
        .post(app_data.url(&format!("/api/tasks/{task_id}/complete")))
        .bearer_auth(&ana_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let result: Value = res.json().await.unwrap();
    assert_eq!(result["points_awarded"], json!(5));

    for token in [&ana_token, &carlos_token] {
        let res = client
            .get(app_data.url("/api/users/me"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let me: Value = res.json().await.unwrap();
        assert_eq!(me["points"], json!(5));
    }

    // completing again is rejected
    let res = client
        .post(app_data.url(&format!("/api/tasks/{task_id}/complete")))
        .bearer_auth(&carlos_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
