use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::{fixtures, record, DbTest};
use tideline::adapter::{AdapterMethod, Capability};
use tideline::query::Request;
use tideline::{Db, Record};

/// Two users, three pets, two tags and a club.
fn seed(test: &DbTest) {
    let adapter = test.adapter();

    adapter.seed(fixtures::USERS, record!({ "login": "ann", "age": 31 }));
    adapter.seed(fixtures::USERS, record!({ "login": "bob", "age": 25 }));

    adapter.seed(fixtures::PETS, record!({ "pet_name": "rex", "weight": 30, "owner_id": 1 }));
    adapter.seed(fixtures::PETS, record!({ "pet_name": "tom", "weight": 4, "owner_id": 1 }));
    adapter.seed(fixtures::PETS, record!({ "pet_name": "kit", "weight": 3, "owner_id": 2 }));

    adapter.seed(fixtures::TAGS, record!({ "label": "admin" }));
    adapter.seed(fixtures::TAGS, record!({ "label": "staff" }));
    adapter.seed(fixtures::USER_TAGS, record!({ "user_tags": 1, "tag_users": 1 }));
    adapter.seed(fixtures::USER_TAGS, record!({ "user_tags": 1, "tag_users": 2 }));
    adapter.seed(fixtures::USER_TAGS, record!({ "user_tags": 2, "tag_users": 2 }));

    adapter.seed(fixtures::CLUBS, record!({ "name": "chess" }));
    adapter.seed(fixtures::MEMBERSHIPS, record!({ "member_id": 2, "club_id": 1 }));
}

fn setup(capability: Capability) -> (DbTest, Db) {
    let mut test = DbTest::with_capability(capability);
    let db = test.setup_db(&mut fixtures::models());
    seed(&test);
    (test, db)
}

fn names(value: &Value, attr: &str) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child[attr].as_str().unwrap().to_string())
        .collect()
}

async fn find_users(db: &Db, request: Request) -> Vec<Record> {
    db.find(request).await.unwrap()
}

#[tokio::test]
async fn one_to_many() {
    let (_test, db) = setup(Capability::FULL);

    let users = find_users(&db, Request::new("user").populate("pets", true)).await;

    assert_eq!(users.len(), 2);
    assert_eq!(names(&users[0]["pets"], "name"), vec!["rex", "tom"]);
    assert_eq!(names(&users[1]["pets"], "name"), vec!["kit"]);

    // Children are unserialized with their own model
    assert_eq!(
        users[1]["pets"],
        json!([{ "id": 3, "name": "kit", "weight": 3, "owner": 2 }])
    );
}

#[tokio::test]
async fn singular() {
    let (_test, db) = setup(Capability::FULL);

    let pets = db
        .find(
            Request::new("pet")
                .criteria(json!({ "select": ["name"], "sort": "id ASC" }))
                .populate("owner", true),
        )
        .await
        .unwrap();

    assert_eq!(
        pets[0],
        record!({
            "id": 1,
            "name": "rex",
            "owner": { "id": 1, "username": "ann", "age": 31 },
        })
    );
}

#[tokio::test]
async fn singular_without_populate_keeps_the_foreign_key() {
    let (_test, db) = setup(Capability::FULL);

    let pet = db.find_one(Request::new("pet").criteria(3)).await.unwrap();
    assert_eq!(pet, Some(record!({ "id": 3, "name": "kit", "weight": 3, "owner": 2 })));
}

#[tokio::test]
async fn many_to_many_via_junction() {
    let (_test, db) = setup(Capability::FULL);

    let users = find_users(&db, Request::new("user").populate("tags", true)).await;

    assert_eq!(names(&users[0]["tags"], "label"), vec!["admin", "staff"]);
    assert_eq!(names(&users[1]["tags"], "label"), vec!["staff"]);
}

#[tokio::test]
async fn many_to_many_via_through() {
    let (_test, db) = setup(Capability::FULL);

    let users = find_users(&db, Request::new("user").populate("clubs", true)).await;

    assert_eq!(users[0]["clubs"], json!([]));
    assert_eq!(names(&users[1]["clubs"], "name"), vec!["chess"]);

    let clubs = db
        .find(Request::new("club").populate("members", true))
        .await
        .unwrap();
    assert_eq!(names(&clubs[0]["members"], "username"), vec!["bob"]);
}

#[tokio::test]
async fn subcriteria_apply_per_parent() {
    let (_test, db) = setup(Capability::FULL);

    let users = find_users(
        &db,
        Request::new("user").populate(
            "pets",
            json!({ "where": { "weight": { ">": 1 } }, "sort": "weight ASC", "limit": 1 }),
        ),
    )
    .await;

    assert_eq!(names(&users[0]["pets"], "name"), vec!["tom"]);
    assert_eq!(names(&users[1]["pets"], "name"), vec!["kit"]);
}

#[tokio::test]
async fn noop_subcriteria_populates_nothing() {
    let (_test, db) = setup(Capability::FULL);

    let users = find_users(
        &db,
        Request::new("user").populate("pets", json!({ "where": { "id": { "in": [] } } })),
    )
    .await;

    assert_eq!(users[0]["pets"], json!([]));
    assert_eq!(users[1]["pets"], json!([]));
}

#[tokio::test]
async fn native_joins_send_one_find() {
    let (test, db) = setup(Capability::FULL);

    find_users(&db, Request::new("user").populate("pets", true).populate("tags", true)).await;

    let log = test.log();
    assert_eq!(log.len(), 1);

    log.with_ops(|ops| {
        let find = ops[0].operation.as_find().unwrap();
        let aliases: Vec<_> = find.joins.iter().map(|join| &join.alias[..]).collect();
        assert_eq!(aliases, vec!["pets", "tags", "tags"]);
    });
}

#[tokio::test]
async fn polyfill_matches_native_joins() {
    let requests = || {
        vec![
            Request::new("user").populate("pets", true),
            Request::new("user").populate("tags", json!({ "sort": "label DESC" })),
            Request::new("user").populate("clubs", true),
            Request::new("user")
                .populate("pets", json!({ "select": ["name"], "skip": 1 }))
                .populate("tags", true),
            Request::new("pet").populate("owner", true),
            Request::new("club").populate("members", json!({ "omit": ["age"] })),
        ]
    };

    let (_native_test, native) = setup(Capability::FULL);
    let (polyfill_test, polyfill) = setup(Capability::NO_JOIN);

    for (native_request, polyfill_request) in requests().into_iter().zip(requests()) {
        let expected = native.find(native_request).await.unwrap();
        let actual = polyfill.find(polyfill_request).await.unwrap();
        assert_eq!(actual, expected);
    }

    // The polyfill never hands joins to the adapter
    let log = polyfill_test.log();
    assert!(log.with_ops(|ops| ops
        .iter()
        .all(|op| op.operation.as_find().is_some_and(|find| find.joins.is_empty()))));
}

#[tokio::test]
async fn polyfill_queries_each_hop() {
    let (test, db) = setup(Capability::NO_JOIN);

    let users = find_users(&db, Request::new("user").populate("tags", true)).await;
    assert_eq!(names(&users[1]["tags"], "label"), vec!["staff"]);

    let mut log = test.log();
    assert_eq!(log.count_method(AdapterMethod::Find, fixtures::USERS), 1);
    assert_eq!(log.count_method(AdapterMethod::Find, fixtures::USER_TAGS), 1);
    assert_eq!(log.count_method(AdapterMethod::Find, fixtures::TAGS), 1);

    // Mediator rows are restricted to the parents that were found
    log.pop();
    let (operation, _) = log.pop().unwrap();
    let find = operation.as_find().unwrap();
    assert_eq!(find.using, fixtures::USER_TAGS);
    assert_eq!(
        Value::Object(find.criteria.where_clause.clone()),
        json!({ "user_tags": { "in": [1, 2] } })
    );
}
