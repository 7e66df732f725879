use faxinex_backend::configuration::CatalogSettings;
use faxinex_backend::modules::catalog::CatalogClient;
use faxinex_backend::modules::store::memory::MemoryStore;
use faxinex_backend::utils::groups::create_group;
use faxinex_backend::utils::groups::join_group;
use faxinex_backend::utils::tasks::errors::TaskError;
use faxinex_backend::utils::tasks::models::{NewTask, TaskStatus};
use faxinex_backend::utils::tasks::{complete_task, create_task, get_task};
use faxinex_backend::utils::users::get_user;

mod tools;

/// Catalog pointed at a discard port: every call fails fast, so difficulty
/// resolution always lands on the fallback table.
fn offline_catalog() -> CatalogClient {
    CatalogClient::new(CatalogSettings {
        base_url: "http://127.0.0.1:9".into(),
    })
}

fn new_task(group_id: &str, participants: &[&str]) -> NewTask {
    NewTask {
        group_id: group_id.to_string(),
        name: "Limpar cozinha".into(),
        description: "Limpar a pia e o fogão".into(),
        category: "Cozinha".into(),
        difficulty: 2,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

async fn group_of_two(store: &MemoryStore) -> String {
    tools::seed_user(store, "u1", "Ana").await;
    tools::seed_user(store, "u2", "Carlos").await;
    let group = create_group(store, "Casa", "desc", "u1").await.unwrap();
    join_group(store, &group.id, "u2").await.unwrap();
    group.id
}

#[tokio::test]
async fn create_task_health_check() {
    let store = MemoryStore::new();
    let group_id = group_of_two(&store).await;

    let task = create_task(&store, new_task(&group_id, &["u1", "u2"]), "u1")
        .await
        .expect("Failed to create task");

    assert_eq!(task.id.len(), 8);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.group_id, group_id);
    assert_eq!(task.participants, vec!["u1", "u2"]);
    assert_eq!(task.created_by, "u1");

    let stored = get_task(&store, &task.id).await.unwrap();
    assert_eq!(stored.status, TaskStatus::Pending);
}

#[tokio::test]
async fn create_task_requires_participants() {
    let store = MemoryStore::new();
    let group_id = group_of_two(&store).await;

    let res = create_task(&store, new_task(&group_id, &[]), "u1").await;
    match res {
        Err(TaskError::NoParticipants) => (),
        _ => panic!("Test result is {:?}", res),
    }
}

#[tokio::test]
async fn create_task_requires_a_name() {
    let store = MemoryStore::new();
    let group_id = group_of_two(&store).await;

    let mut task = new_task(&group_id, &["u1"]);
    task.name = "   ".into();
    let res = create_task(&store, task, "u1").await;
    match res {
        Err(TaskError::MissingTaskField) => (),
        _ => panic!("Test result is {:?}", res),
    }
}

#[tokio::test]
async fn create_task_checks_the_live_roster() {
    let store = MemoryStore::new();
    let group_id = group_of_two(&store).await;
    tools::seed_user(&store, "u3", "Bia").await;

    // u3 never joined, stale client snapshots notwithstanding
    let res = create_task(&store, new_task(&group_id, &["u1", "u3"]), "u1").await;
    match res {
        Err(TaskError::ParticipantNotInGroup) => (),
        _ => panic!("Test result is {:?}", res),
    }

    let res = create_task(&store, new_task(&group_id, &["u1"]), "u3").await;
    match res {
        Err(TaskError::UserNotInGroup) => (),
        _ => panic!("Test result is {:?}", res),
    }
}

#[tokio::test]
async fn create_task_unknown_group() {
    let store = MemoryStore::new();
    tools::seed_user(&store, "u1", "Ana").await;

    let res = create_task(&store, new_task("ZZZZZ", &["u1"]), "u1").await;
    match res {
        Err(TaskError::GroupDoesNotExist) => (),
        _ => panic!("Test result is {:?}", res),
    }
}

#[tokio::test]
async fn complete_task_awards_full_credit_to_every_participant() {
    let store = MemoryStore::new();
    let catalog = offline_catalog();
    let group_id = group_of_two(&store).await;
    let task = create_task(&store, new_task(&group_id, &["u1", "u2"]), "u1")
        .await
        .unwrap();

    let result = complete_task(&store, &catalog, &task.id, "u1")
        .await
        .expect("Failed to complete task");

    // difficulty 2 pays 5 points, to the completer and everyone else alike
    assert_eq!(result.points_awarded, 5);
    assert!(result.message.contains("5 pontos"));

    let completed = get_task(&store, &task.id).await.unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert_eq!(completed.completed_by.as_deref(), Some("u1"));
    assert!(completed.completed_at.is_some());

    for id in ["u1", "u2"] {
        let user = get_user(&store, id).await.unwrap().unwrap();
        assert_eq!(user.points, 5, "participant {id} missing points");
        assert!(user.last_points_update.is_some());
    }
}

#[tokio::test]
async fn complete_task_twice_rejected() {
    let store = MemoryStore::new();
    let catalog = offline_catalog();
    let group_id = group_of_two(&store).await;
    let task = create_task(&store, new_task(&group_id, &["u1", "u2"]), "u1")
        .await
        .unwrap();

    complete_task(&store, &catalog, &task.id, "u1").await.unwrap();
    let res = complete_task(&store, &catalog, &task.id, "u2").await;
    match res {
        Err(TaskError::TaskAlreadyCompleted) => (),
        _ => panic!("Test result is {:?}", res),
    }

    // nobody gets paid twice
    for id in ["u1", "u2"] {
        let user = get_user(&store, id).await.unwrap().unwrap();
        assert_eq!(user.points, 5);
    }
}

#[tokio::test]
async fn complete_task_by_non_participant_rejected() {
    let store = MemoryStore::new();
    let catalog = offline_catalog();
    let group_id = group_of_two(&store).await;
    let task = create_task(&store, new_task(&group_id, &["u1"]), "u1")
        .await
        .unwrap();

    let res = complete_task(&store, &catalog, &task.id, "u2").await;
    match res {
        Err(TaskError::UserNotParticipant) => (),
        _ => panic!("Test result is {:?}", res),
    }
}

#[tokio::test]
async fn complete_task_with_unknown_difficulty_rejected() {
    let store = MemoryStore::new();
    let catalog = offline_catalog();
    let group_id = group_of_two(&store).await;
    let mut task = new_task(&group_id, &["u1"]);
    task.difficulty = 9;
    let task = create_task(&store, task, "u1").await.unwrap();

    let res = complete_task(&store, &catalog, &task.id, "u1").await;
    match res {
        Err(TaskError::UnknownDifficulty) => (),
        _ => panic!("Test result is {:?}", res),
    }

    // nothing was written: the task is still pending and nobody was paid
    let stored = get_task(&store, &task.id).await.unwrap();
    assert_eq!(stored.status, TaskStatus::Pending);
    let user = get_user(&store, "u1").await.unwrap().unwrap();
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn points_accumulate_across_completed_tasks() {
    let store = MemoryStore::new();
    let catalog = offline_catalog();
    let group_id = group_of_two(&store).await;

    let easy = {
        let mut t = new_task(&group_id, &["u1"]);
        t.name = "Tirar o lixo".into();
        t.difficulty = 1;
        create_task(&store, t, "u1").await.unwrap()
    };
    let hard = {
        let mut t = new_task(&group_id, &["u1"]);
        t.name = "Lavar o banheiro".into();
        t.difficulty = 3;
        create_task(&store, t, "u1").await.unwrap()
    };

    complete_task(&store, &catalog, &easy.id, "u1").await.unwrap();
    let after_easy = get_user(&store, "u1").await.unwrap().unwrap().points;
    complete_task(&store, &catalog, &hard.id, "u1").await.unwrap();
    let after_hard = get_user(&store, "u1").await.unwrap().unwrap().points;

    assert_eq!(after_easy, 3);
    assert_eq!(after_hard, 11);
    assert!(after_hard >= after_easy, "points never decrease");
}
