use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::{fixtures, record, DbTest};
use tideline::adapter::{AdapterError, Capability, Operation, Response};
use tideline::query::Request;
use tideline::Adapter;
use tideline::{ErrorCode, Record};

fn seed_users(test: &DbTest) {
    for (login, age) in [("ann", 31), ("bob", 25), ("cyd", 47), ("dee", 25)] {
        test.adapter()
            .seed(fixtures::USERS, record!({ "login": login, "age": age }));
    }
}

fn logins(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record["username"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn records_come_back_attribute_named() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let users = db
        .find(Request::new("user").criteria(json!({ "username": "ann" })))
        .await
        .unwrap();

    assert_eq!(users, vec![record!({ "id": 1, "username": "ann", "age": 31 })]);

    // The adapter only ever sees column names
    let mut log = test.log();
    let (operation, _) = log.pop().unwrap();
    let find = operation.as_find().unwrap();
    assert_eq!(find.using, "users");
    assert_eq!(Value::Object(find.criteria.where_clause.clone()), json!({ "login": "ann" }));
    assert_eq!(find.criteria.select, vec!["user_id", "login", "age"]);
}

#[tokio::test]
async fn primary_key_shorthand() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let users = db.find(Request::new("user").criteria(3)).await.unwrap();
    assert_eq!(logins(&users), vec!["cyd"]);

    let users = db
        .find(Request::new("user").criteria(json!([2, 4])))
        .await
        .unwrap();
    assert_eq!(logins(&users), vec!["bob", "dee"]);
}

#[tokio::test]
async fn sort_skip_limit() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let users = db
        .find(Request::new("user").criteria(json!({
            "where": { "age": { "<": 40 } },
            "sort": [{ "age": "DESC" }, { "username": 1 }],
            "skip": 1,
            "limit": 2,
        })))
        .await
        .unwrap();

    assert_eq!(logins(&users), vec!["bob", "dee"]);
}

#[tokio::test]
async fn select_and_omit() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let users = db
        .find(Request::new("user").criteria(json!({ "where": { "id": 1 }, "select": ["age"] })))
        .await
        .unwrap();
    assert_eq!(users, vec![record!({ "id": 1, "age": 31 })]);

    let users = db
        .find(Request::new("user").criteria(json!({ "where": { "id": 1 }, "omit": ["age"] })))
        .await
        .unwrap();
    assert_eq!(users, vec![record!({ "id": 1, "username": "ann" })]);
}

#[tokio::test]
async fn noop_criteria_never_reach_the_adapter() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let noop = json!({ "where": { "id": { "in": [] } } });

    assert!(db.find(Request::new("user").criteria(noop.clone())).await.unwrap().is_empty());
    assert!(db.find_one(Request::new("user").criteria(noop.clone())).await.unwrap().is_none());
    assert_eq!(db.count(Request::new("user").criteria(noop.clone())).await.unwrap(), 0);
    assert_eq!(
        db.sum(Request::new("user").criteria(noop.clone()).numeric_attr_name("age"))
            .await
            .unwrap(),
        0.0
    );
    assert!(db.update(Request::new("user").criteria(noop.clone()).values_to_set(json!({ "age": 1 })))
        .await
        .unwrap()
        .is_empty());
    assert!(db.destroy(Request::new("user").criteria(noop.clone())).await.unwrap().is_empty());
    assert!(db.find(Request::new("user").criteria(false)).await.unwrap().is_empty());
    assert!(db.find(Request::new("user").criteria(json!({ "limit": 0 }))).await.unwrap().is_empty());

    db.add_to_collection(
        Request::new("user")
            .target_record_ids(json!([]))
            .collection_attr_name("tags")
            .associated_ids(json!([1])),
    )
    .await
    .unwrap();

    assert!(test.log().is_empty());
}

#[tokio::test]
async fn find_one() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    let user = db
        .find_one(Request::new("user").criteria(json!({ "username": "cyd" })))
        .await
        .unwrap();
    assert_eq!(user, Some(record!({ "id": 3, "username": "cyd", "age": 47 })));

    let missing = db
        .find_one(Request::new("user").criteria(json!({ "username": "zed" })))
        .await
        .unwrap();
    assert_eq!(missing, None);

    let err = db
        .find_one(Request::new("user").criteria(json!({ "age": 25 })))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TooManyRecords);
}

#[tokio::test]
async fn count_sum_avg() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());
    seed_users(&test);

    assert_eq!(db.count(Request::new("user")).await.unwrap(), 4);
    assert_eq!(
        db.count(Request::new("user").criteria(json!({ "age": 25 })))
            .await
            .unwrap(),
        2
    );

    let sum = db
        .sum(Request::new("user").numeric_attr_name("age"))
        .await
        .unwrap();
    assert_eq!(sum, 128.0);

    let avg = db
        .avg(
            Request::new("user")
                .criteria(json!({ "age": { ">": 30 } }))
                .numeric_attr_name("age"),
        )
        .await
        .unwrap();
    assert_eq!(avg, 39.0);

    let err = db
        .sum(Request::new("user").numeric_attr_name("username"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidNumericAttrName);
}

#[tokio::test]
async fn stream_pages_through_every_record() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());

    for i in 0..65 {
        test.adapter()
            .seed(fixtures::USERS, record!({ "login": format!("user{i:02}"), "age": i }));
    }

    let mut seen = vec![];
    db.stream(Request::new("user"), |user| {
        seen.push(user["id"].as_u64().unwrap());
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(seen, (1..=65u64).collect::<Vec<_>>());

    // 30 + 30 + 5
    assert_eq!(test.log().len(), 3);
}

#[tokio::test]
async fn stream_honors_limit_and_stops_on_error() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());

    for i in 0..40 {
        test.adapter()
            .seed(fixtures::USERS, record!({ "login": format!("user{i:02}"), "age": i }));
    }

    let mut seen = 0;
    db.stream(
        Request::new("user").criteria(json!({ "sort": "age DESC", "limit": 35 })),
        |_| {
            seen += 1;
            Ok(())
        },
    )
    .await
    .unwrap();
    assert_eq!(seen, 35);

    let mut seen = 0;
    let err = db
        .stream(Request::new("user"), |_| {
            seen += 1;
            if seen == 3 {
                Err(tideline::Error::consistency("stop"))
            } else {
                Ok(())
            }
        })
        .await
        .unwrap_err();

    assert!(err.is_consistency());
    assert_eq!(seen, 3);
}

/// Answers every find with a fixed page of users, ignoring the limit.
#[derive(Debug)]
struct IgnoresLimit {
    capability: Capability,
}

#[async_trait]
impl Adapter for IgnoresLimit {
    fn identity(&self) -> &str {
        "ignores-limit"
    }

    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn exec(&self, _datastore: &str, operation: Operation) -> Result<Response, AdapterError> {
        assert!(operation.as_find().is_some());

        Ok(Response::records(
            (1..=40)
                .map(|id| record!({ "user_id": id, "login": format!("user{id:02}") }))
                .collect(),
        ))
    }
}

#[tokio::test]
async fn stream_trims_oversized_batches() {
    let db = fixtures::models()
        .build(IgnoresLimit {
            capability: Capability::FULL,
        })
        .unwrap();

    let mut seen = 0;
    db.stream(Request::new("user").criteria(json!({ "limit": 35 })), |_| {
        seen += 1;
        Ok(())
    })
    .await
    .unwrap();

    // 30 from the first batch, 5 from the second
    assert_eq!(seen, 35);
}

#[tokio::test]
async fn usage_errors() {
    let mut test = DbTest::new();
    let db = test.setup_db(&mut fixtures::models());

    let err = db
        .find(Request::new("user").criteria(json!({ "where": { "nickname": "x" } })))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCriteria);

    let err = db
        .find(Request::new("user").populate("username", true))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPopulates);

    let err = db
        .find(Request::new("user").meta(json!({ "fetch": "yes" })))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidMeta);

    assert!(test.log().is_empty());
}
