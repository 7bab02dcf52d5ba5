//! End-to-end tests over a catalog of tables, views, and derived objects

use repindex::description::table_hash_input;
use repindex::{
    ColumnToAdd, Error, IdAndVersion, ParameterValue, ReplicaIndex, ReplicationType, SqlContext,
    SubType, TableType, ViewFilter,
};

fn syn(id: i64) -> IdAndVersion {
    IdAndVersion::current(id)
}

/// syn1 entity view, syn2 table, syn3 materialized view over both,
/// syn4 virtual table aggregating syn3
fn populated() -> ReplicaIndex {
    let index = ReplicaIndex::new();
    let catalog = index.catalog();
    catalog.create_view(syn(1), TableType::EntityView).unwrap();
    catalog.create_table(syn(2)).unwrap();
    catalog
        .create_materialized_view(syn(3), vec![syn(1), syn(2)])
        .unwrap();
    catalog
        .create_virtual_table(syn(4), "select foo, count(*) from syn3 group by foo")
        .unwrap();
    catalog.record_change(&syn(1)).unwrap();
    catalog.record_change(&syn(2)).unwrap();
    catalog.record_change(&syn(3)).unwrap();
    index
}

#[test]
fn test_materialized_view_create_sql() {
    let index = populated();
    assert_eq!(
        index.create_index_sql(&syn(3)).unwrap(),
        "CREATE TABLE IF NOT EXISTS T3( ROW_ID BIGINT NOT NULL AUTO_INCREMENT, \
         ROW_VERSION BIGINT NOT NULL DEFAULT 0, ROW_BENEFACTOR_A0 BIGINT NOT NULL, \
         PRIMARY KEY (ROW_ID), KEY (ROW_BENEFACTOR_A0))"
    );
}

#[test]
fn test_materialized_view_build_columns() {
    let index = populated();
    assert_eq!(
        index
            .select_columns(&syn(3), SqlContext::Build, false, false)
            .unwrap(),
        vec![ColumnToAdd::new(syn(1), "IFNULL(_A0.ROW_BENEFACTOR,-1)")]
    );
    assert_eq!(
        index
            .select_columns(&syn(3), SqlContext::Query, true, false)
            .unwrap(),
        vec![
            ColumnToAdd::new(syn(3), "ROW_ID"),
            ColumnToAdd::new(syn(3), "ROW_VERSION"),
        ]
    );
}

#[test]
fn test_virtual_table_hash_covers_whole_graph() {
    let index = populated();
    let description = index.describe(&syn(4)).unwrap();
    assert_eq!(table_hash_input(&description), "+syn3-3+syn1-1+syn2-2");
    assert_eq!(
        index.table_hash(&syn(4)).unwrap(),
        "abb1da661f8394a7a820f7d46f2081b0"
    );
}

#[test]
fn test_hash_changes_with_leaf() {
    let index = populated();
    let before = index.table_hash(&syn(4)).unwrap();
    index.catalog().record_change(&syn(2)).unwrap();
    assert_ne!(index.table_hash(&syn(4)).unwrap(), before);
}

#[test]
fn test_dropped_source_fails_resolution() {
    let index = populated();
    index.catalog().drop_object(&syn(2)).unwrap();
    assert!(matches!(
        index.table_hash(&syn(4)),
        Err(Error::TableNotFound(_))
    ));
}

#[test]
fn test_virtual_table_preprocess() {
    let index = populated();
    assert_eq!(
        index
            .preprocess_query(&syn(4), "select * from syn4 where foo > 1")
            .unwrap(),
        "WITH syn4 AS (select foo, count(*) from syn3 group by foo) select * from syn4 where foo > 1"
    );
}

#[test]
fn test_virtual_table_over_itself_rejected() {
    let index = ReplicaIndex::new();
    index
        .catalog()
        .create_virtual_table(syn(5), "select * from syn5")
        .unwrap();
    assert!(matches!(
        index.describe(&syn(5)),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_view_filter_for_scope() {
    let filter = ViewFilter::hierarchical(
        ReplicationType::Entity,
        [SubType::File, SubType::Folder],
        [100, 200],
    )
    .unwrap();
    let narrowed = filter
        .new_builder()
        .add_limit_object_ids([7])
        .build()
        .unwrap();

    let params = narrowed.get_parameters();
    assert_eq!(params.get("limitObjectIds"), Some(&ParameterValue::Ids(vec![7])));
    assert_eq!(
        serde_json::to_value(&params).unwrap(),
        serde_json::json!({
            "limitObjectIds": [7],
            "mainType": "ENTITY",
            "parentIds": [100, 200],
            "subTypes": ["file", "folder"],
        })
    );
    assert_eq!(filter.get_sub_views().len(), 2);
}
