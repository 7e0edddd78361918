use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::{DbTest, MemoryAdapter};
use tideline::adapter::Operation;
use tideline::query::{Method, QueryBody, Request};
use tideline::{Db, ErrorCode};

const MODELS: &str = r#"[
    {
        "identity": "user",
        "tableName": "users",
        "attributes": {
            "id": { "type": "number", "primaryKey": true, "columnName": "user_id" },
            "name": { "type": "string", "columnName": "full_name" },
            "pets": { "collection": "pet", "via": "owner" }
        }
    },
    {
        "identity": "pet",
        "attributes": {
            "id": { "type": "number", "primaryKey": true },
            "owner": { "model": "user", "columnName": "owner_id" }
        }
    }
]"#;

fn db() -> Db {
    let mut builder = Db::builder();
    builder.register_json(MODELS).unwrap();
    builder.build(MemoryAdapter::new()).unwrap()
}

#[test]
fn shorthand_criteria_become_where() {
    let db = db();

    let query = db
        .normalize(Method::Find, Request::new("user").criteria(json!({ "name": "Santa" })))
        .unwrap();

    let QueryBody::Find { criteria, populates } = &query.body else {
        panic!("expected a find body, got {:?}", query.body);
    };

    assert_eq!(Value::Object(criteria.where_clause.clone()), json!({ "name": "Santa" }));
    assert_eq!(criteria.select, vec!["*"]);
    assert_eq!(criteria.limit, None);
    assert_eq!(criteria.skip, 0);
    assert!(populates.is_empty());
}

#[test]
fn compiled_query_is_column_named() {
    let db = db();

    let query = db
        .normalize(
            Method::Find,
            Request::new("user")
                .criteria(json!({
                    "where": { "or": [{ "name": "Santa" }, { "id": { ">": 10 } }] },
                    "sort": "name DESC",
                }))
                .populate("pets", true),
        )
        .unwrap();

    let Operation::Find(find) = db.compile(query).unwrap() else {
        panic!("expected a find operation");
    };

    assert_eq!(find.using, "users");
    assert_eq!(
        Value::Object(find.criteria.where_clause),
        json!({ "or": [{ "full_name": "Santa" }, { "user_id": { ">": 10 } }] })
    );
    assert_eq!(find.criteria.sort[0].key, "full_name");
    assert_eq!(find.criteria.select, vec!["user_id", "full_name"]);

    let [join] = &find.joins[..] else {
        panic!("expected one join, got {:?}", find.joins);
    };
    assert_eq!((&join.parent_key[..], &join.child_key[..]), ("user_id", "owner_id"));
}

#[test]
fn collection_queries_have_no_single_compiled_form() {
    let db = db();

    let query = db
        .normalize(
            Method::AddToCollection,
            Request::new("user")
                .target_record_ids(1)
                .collection_attr_name("pets")
                .associated_ids(json!([2])),
        )
        .unwrap();

    let err = db.compile(query).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Consistency);
}

#[test]
fn schema_errors_surface_at_build() {
    let mut builder = Db::builder();
    builder
        .register_json(
            r#"{
                "identity": "user",
                "attributes": { "pets": { "collection": "pet", "via": "owner" } }
            }"#,
        )
        .unwrap();

    let err = builder.build(MemoryAdapter::new()).unwrap_err();
    assert!(err.is_consistency());
}

#[tokio::test]
async fn datastore_defaults_and_overrides() {
    let mut test = DbTest::new();
    let mut builder = Db::builder();
    builder
        .datastore("primary")
        .register(tests::fixtures::user())
        .register(tests::fixtures::pet())
        .register(tests::fixtures::tag())
        .register(tests::fixtures::user_tags())
        .register(tests::fixtures::club())
        .register(tests::fixtures::membership().datastore("archive"));

    let db = test.setup_db(&mut builder);

    db.find(Request::new("user")).await.unwrap();
    db.find(Request::new("membership")).await.unwrap();

    let datastores: Vec<String> =
        test.log().with_ops(|ops| ops.iter().map(|op| op.datastore.clone()).collect());
    assert_eq!(datastores, vec!["primary", "archive"]);
}
