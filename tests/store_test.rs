mod common;

use chatbot_relay::message_store::{
    Error, MessageStore, NewTurn, PostgresMessageStore, Role, StoreConfig,
};
use chrono::{Duration, TimeZone, Utc};
use common::{relay_with, ScriptedProvider};
use std::sync::Arc;
use testcontainers::clients::Cli;

// Keeps _docker and _container alive for the duration of the test
macro_rules! setup_test {
    ($docker:ident, $container:ident, $store:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());

        let host_port = $container.get_host_port_ipv4(common::POSTGRES_PORT);
        let connection_string = common::build_connection_string("127.0.0.1", host_port);
        let config = StoreConfig::from_connection_string(&connection_string).unwrap();
        let $store = PostgresMessageStore::new(config).unwrap();
        wait_until_ready(&$store).await;
        $store.ensure_schema().await.unwrap();
    };
}

/// Postgres restarts once after init; retry until it accepts queries
async fn wait_until_ready(store: &PostgresMessageStore) {
    for _ in 0..50 {
        if store.ping().await.is_ok() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
    panic!("postgres container never became ready");
}

#[tokio::test]
async fn test_ping_unreachable_database() {
    // Nothing listens on port 1
    let config = StoreConfig::from_connection_string("postgresql://u:p@127.0.0.1:1/db").unwrap();
    let store = PostgresMessageStore::new(config).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(10), store.ping())
        .await
        .expect("ping should fail fast on a refused connection");

    assert!(matches!(result, Err(Error::ConnectionError(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_find() {
    setup_test!(_docker, _container, store);

    let turn = store.insert_turn(NewTurn::user("c1", "hi")).await.unwrap();
    assert_eq!(turn.conversation_id, "c1");
    assert_eq!(turn.role, Role::User);
    assert_eq!(turn.created_at, turn.updated_at);

    let turns = store.find_turns_by_conversation("c1").await.unwrap();
    assert_eq!(turns, vec![turn]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_history_is_ordered_by_creation_time() {
    setup_test!(_docker, _container, store);

    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    for (offset, content) in [(2, "third"), (0, "first"), (1, "second")] {
        store
            .insert_turn(NewTurn::user("c1", content).with_created_at(base + Duration::seconds(offset)))
            .await
            .unwrap();
    }

    let contents: Vec<String> = store
        .find_turns_by_conversation("c1")
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_equal_timestamps_keep_insertion_order() {
    setup_test!(_docker, _container, store);

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    store.insert_turn(NewTurn::user("c1", "question").with_created_at(at)).await.unwrap();
    store.insert_turn(NewTurn::assistant("c1", "answer").with_created_at(at)).await.unwrap();

    let turns = store.find_turns_by_conversation("c1").await.unwrap();
    assert_eq!(turns[0].content, "question");
    assert_eq!(turns[1].content, "answer");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_conversations_are_isolated() {
    setup_test!(_docker, _container, store);

    store.insert_turn(NewTurn::user("c1", "one")).await.unwrap();
    store.insert_turn(NewTurn::user("c2", "two")).await.unwrap();

    assert_eq!(store.find_turns_by_conversation("c1").await.unwrap().len(), 1);
    assert_eq!(store.find_turns_by_conversation("c2").await.unwrap().len(), 1);
    assert!(store.find_turns_by_conversation("c3").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_conversations() {
    setup_test!(_docker, _container, store);

    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let turns = [
        ("c1", Role::User, "hello", 0),
        ("c1", Role::Assistant, "hi there", 1),
        ("c2", Role::User, "newer conversation", 5),
        ("c1", Role::User, "bye", 2),
    ];
    for (conversation, role, content, offset) in turns {
        store
            .insert_turn(
                NewTurn::new(conversation, role, content)
                    .with_created_at(base + Duration::seconds(offset)),
            )
            .await
            .unwrap();
    }

    let summaries = store.list_conversations().await.unwrap();
    assert_eq!(summaries.len(), 2);

    assert_eq!(summaries[0].conversation_id, "c2");
    assert_eq!(summaries[0].message_count, 1);

    let c1 = &summaries[1];
    assert_eq!(c1.conversation_id, "c1");
    assert_eq!(c1.message_count, 3);
    assert_eq!(c1.first_message, "hello");
    assert_eq!(c1.last_message, "bye");
    assert_eq!(c1.last_message_role, Role::User);
    assert_eq!(c1.last_message_time, base + Duration::seconds(2));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_conversation() {
    setup_test!(_docker, _container, store);

    store.insert_turn(NewTurn::user("c1", "hi")).await.unwrap();
    store.insert_turn(NewTurn::assistant("c1", "hello")).await.unwrap();
    store.insert_turn(NewTurn::user("c2", "keep me")).await.unwrap();

    assert_eq!(store.delete_conversation("c1").await.unwrap(), 2);
    assert_eq!(store.delete_conversation("c1").await.unwrap(), 0);

    assert!(store.find_turns_by_conversation("c1").await.unwrap().is_empty());
    assert_eq!(store.find_turns_by_conversation("c2").await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ensure_schema_is_idempotent() {
    setup_test!(_docker, _container, store);

    store.insert_turn(NewTurn::user("c1", "hi")).await.unwrap();
    store.ensure_schema().await.unwrap();

    assert_eq!(store.find_turns_by_conversation("c1").await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_relay_over_postgres() {
    setup_test!(_docker, _container, store);

    let store = Arc::new(store);
    let relay = relay_with(store.clone(), Arc::new(ScriptedProvider::streaming(&["he", "llo"])));

    let reply = relay.process_message("c1", "hi").await.unwrap();
    assert_eq!(reply.message, "hello");

    let turns = store.find_turns_by_conversation("c1").await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!((turns[0].role, turns[0].content.as_str()), (Role::User, "hi"));
    assert_eq!((turns[1].role, turns[1].content.as_str()), (Role::Assistant, "hello"));
    assert_eq!(turns[1].created_at, reply.timestamp);

    store.close();
}
