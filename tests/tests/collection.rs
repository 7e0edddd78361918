use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tests::{fixtures, record, DbTest};
use tideline::adapter::{AdapterMethod, Operation};
use tideline::query::Request;
use tideline::{Db, ErrorCode};

fn setup() -> (DbTest, Db) {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());

    let adapter = test.adapter();
    adapter.seed(fixtures::USERS, record!({ "login": "ann" }));
    adapter.seed(fixtures::USERS, record!({ "login": "bob" }));
    for name in ["rex", "tom", "kit", "max", "pip", "fay"] {
        adapter.seed(fixtures::PETS, record!({ "pet_name": name }));
    }
    for label in ["a", "b", "c", "d", "e", "f"] {
        adapter.seed(fixtures::TAGS, record!({ "label": label }));
    }

    (test, db)
}

fn change(attr: &str, targets: Value, associated: Value) -> Request {
    Request::new("user")
        .target_record_ids(targets)
        .collection_attr_name(attr)
        .associated_ids(associated)
}

fn links(test: &DbTest) -> Vec<(u64, u64)> {
    test.adapter()
        .rows(fixtures::USER_TAGS)
        .iter()
        .map(|row| {
            (
                row["user_tags"].as_u64().unwrap(),
                row["tag_users"].as_u64().unwrap(),
            )
        })
        .collect()
}

fn owners(test: &DbTest) -> Vec<Value> {
    test.adapter()
        .rows(fixtures::PETS)
        .iter()
        .map(|row| row.get("owner_id").cloned().unwrap_or(Value::Null))
        .collect()
}

#[tokio::test]
async fn many_to_many_replace() {
    let (test, db) = setup();
    test.adapter().seed(fixtures::USER_TAGS, record!({ "user_tags": 1, "tag_users": 1 }));
    test.adapter().seed(fixtures::USER_TAGS, record!({ "user_tags": 2, "tag_users": 1 }));

    db.replace_collection(change("tags", json!([1]), json!([5, 6])))
        .await
        .unwrap();

    let mut log = test.log();
    let ops = log.drain();
    assert_eq!(ops.len(), 2);

    // One destroy clearing every link of the target
    let Operation::Destroy(destroy) = &ops[0] else {
        panic!("expected destroy, got {:?}", ops[0]);
    };
    assert_eq!(destroy.using, fixtures::USER_TAGS);
    assert_eq!(Value::Object(destroy.criteria.clone()), json!({ "user_tags": { "in": [1] } }));
    assert!(!destroy.meta.fetch);
    assert!(destroy.meta.skip_all_lifecycle_callbacks);

    // Then one createEach with the cross product
    let Operation::CreateEach(create_each) = &ops[1] else {
        panic!("expected createEach, got {:?}", ops[1]);
    };
    assert_eq!(
        create_each.new_records,
        vec![
            record!({ "user_tags": 1, "tag_users": 5 }),
            record!({ "user_tags": 1, "tag_users": 6 }),
        ]
    );
    assert!(create_each.meta.skip_all_lifecycle_callbacks);

    assert_eq!(links(&test), vec![(2, 1), (1, 5), (1, 6)]);
}

#[tokio::test]
async fn many_to_many_replace_with_nothing_only_clears() {
    let (test, db) = setup();
    test.adapter().seed(fixtures::USER_TAGS, record!({ "user_tags": 1, "tag_users": 1 }));

    db.replace_collection(change("tags", json!([1, 2]), json!([])))
        .await
        .unwrap();

    let log = test.log();
    assert_eq!(log.methods(), vec![AdapterMethod::Destroy]);
    assert!(!log.any(|op| op.is_create_each()));
    assert!(links(&test).is_empty());
}

#[tokio::test]
async fn many_to_many_cross_product() {
    let (test, db) = setup();

    db.replace_collection(change("tags", json!([1, 2]), json!([3, 4])))
        .await
        .unwrap();

    assert_eq!(links(&test), vec![(1, 3), (1, 4), (2, 3), (2, 4)]);
}

#[tokio::test]
async fn many_to_many_remove() {
    let (test, db) = setup();
    for (user, tag) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 2)] {
        test.adapter().seed(
            fixtures::USER_TAGS,
            record!({ "user_tags": user, "tag_users": tag }),
        );
    }

    db.remove_from_collection(change("tags", json!([1, 2]), json!([1, 2])))
        .await
        .unwrap();

    let log = test.log();
    assert_eq!(log.count_method(AdapterMethod::Destroy, fixtures::USER_TAGS), 2);

    let mut scopes: Vec<Value> = log.with_ops(|ops| {
        ops.iter()
            .filter_map(|op| op.operation.as_destroy())
            .map(|destroy| Value::Object(destroy.criteria.clone()))
            .collect()
    });
    scopes.sort_by_key(|scope| scope["user_tags"].as_u64());

    assert_eq!(
        scopes,
        vec![
            json!({ "user_tags": 1, "tag_users": { "in": [1, 2] } }),
            json!({ "user_tags": 2, "tag_users": { "in": [1, 2] } }),
        ]
    );

    assert_eq!(links(&test), vec![(1, 3)]);
}

#[tokio::test]
async fn many_to_many_add() {
    let (test, db) = setup();
    test.adapter().seed(fixtures::USER_TAGS, record!({ "user_tags": 1, "tag_users": 1 }));

    db.add_to_collection(change("tags", json!(1), json!([2, 3])))
        .await
        .unwrap();

    assert_eq!(test.log().methods(), vec![AdapterMethod::CreateEach]);
    assert_eq!(links(&test), vec![(1, 1), (1, 2), (1, 3)]);
}

#[tokio::test]
async fn through_model() {
    let (test, db) = setup();
    test.adapter().seed(fixtures::CLUBS, record!({ "name": "chess" }));
    test.adapter().seed(fixtures::CLUBS, record!({ "name": "go" }));

    db.add_to_collection(change("clubs", json!([1]), json!([1, 2])))
        .await
        .unwrap();

    db.remove_from_collection(
        Request::new("club")
            .target_record_ids(json!([2]))
            .collection_attr_name("members")
            .associated_ids(json!([1])),
    )
    .await
    .unwrap();

    let memberships: Vec<_> = test
        .adapter()
        .rows(fixtures::MEMBERSHIPS)
        .iter()
        .map(|row| (row["member_id"].clone(), row["club_id"].clone()))
        .collect();

    assert_eq!(memberships, vec![(json!(1), json!(1))]);
}

#[tokio::test]
async fn one_to_many_remove() {
    let (test, db) = setup();
    test.adapter().seed(fixtures::PETS, record!({ "pet_name": "zed", "owner_id": 1 }));

    db.remove_from_collection(change("pets", json!([1]), json!([5])))
        .await
        .unwrap();

    let mut log = test.log();
    let ops = log.drain();
    assert_eq!(ops.len(), 1);

    let Operation::Update(update) = &ops[0] else {
        panic!("expected update, got {:?}", ops[0]);
    };
    assert_eq!(update.using, fixtures::PETS);
    assert_eq!(
        Value::Object(update.criteria.clone()),
        json!({ "id": { "in": [5] }, "owner_id": { "in": [1] } })
    );
    assert_eq!(Value::Object(update.values_to_set.clone()), json!({ "owner_id": null }));
    assert!(update.meta.skip_all_lifecycle_callbacks);
}

#[tokio::test]
async fn one_to_many_replace() {
    let (test, db) = setup();

    db.add_to_collection(change("pets", json!([1]), json!([1, 2])))
        .await
        .unwrap();
    db.add_to_collection(change("pets", json!([2]), json!([3])))
        .await
        .unwrap();
    assert_eq!(
        owners(&test),
        vec![json!(1), json!(1), json!(2), Value::Null, Value::Null, Value::Null]
    );

    let mut log = test.log();
    log.clear();

    db.replace_collection(change("pets", json!([1]), json!([2, 4])))
        .await
        .unwrap();

    // Clear first, then one update per pair
    assert_eq!(
        log.methods(),
        vec![AdapterMethod::Update, AdapterMethod::Update, AdapterMethod::Update]
    );
    log.with_ops(|ops| {
        let clear = ops[0].operation.as_update().unwrap();
        assert_eq!(Value::Object(clear.criteria.clone()), json!({ "owner_id": { "in": [1] } }));
    });

    assert_eq!(
        owners(&test),
        vec![Value::Null, json!(1), json!(2), json!(1), Value::Null, Value::Null]
    );
}

#[tokio::test]
async fn meta_and_lease_reach_every_write() {
    let (test, db) = setup();
    let lease = Arc::new("txn-7".to_string());

    db.replace_collection(
        change("tags", json!([1]), json!([2]))
            .meta(json!({ "trace": "abc" }))
            .lease(lease.clone()),
    )
    .await
    .unwrap();

    let log = test.log();
    assert_eq!(log.len(), 2);

    log.with_ops(|ops| {
        for op in ops {
            let meta = op.operation.meta();
            assert_eq!(meta.lease_as::<String>().map(|s| &s[..]), Some("txn-7"));
            assert_eq!(meta.extras.get("trace"), Some(&json!("abc")));
        }
    });
}

#[tokio::test]
async fn collection_usage_errors() {
    let (test, db) = setup();

    let err = db
        .add_to_collection(change("username", json!([1]), json!([2])))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCollectionAttrName);

    let err = db
        .add_to_collection(change("tags", json!(["one"]), json!([2])))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTargetRecordIds);

    let err = db
        .add_to_collection(change("tags", json!([1]), json!([{ "id": 2 }])))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAssociatedIds);

    // Nothing to add is a no-op, nothing to replace with is not
    db.add_to_collection(change("tags", json!([1]), json!([])))
        .await
        .unwrap();
    assert!(test.log().is_empty());
}
