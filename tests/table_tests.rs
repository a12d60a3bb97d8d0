// tests/table_tests.rs

use kusto_tool::{
    Column, DType, DatabaseRef, Error, Expr, JoinKind, JoinStrategy, Project, Schema, Summarize,
    TableExpr,
};

fn tbl() -> TableExpr {
    let schema = Schema::from_pairs([("foo", DType::String), ("bar", DType::Int)]);
    TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema)
}

fn assert_unknown(result: Result<impl std::fmt::Debug, Error>, expected: &str) {
    match result {
        Err(Error::UnknownColumn { column, .. }) => assert_eq!(column, expected),
        other => panic!("Expected UnknownColumn({}), got {:?}", expected, other),
    }
}

// ============================================================================
// Schema and column lookup
// ============================================================================

#[test]
fn test_column_lookup() {
    let tbl = tbl();
    assert_eq!(tbl.col("foo").unwrap().dtype(), DType::String);
    assert_eq!(tbl.col("bar").unwrap().dtype(), DType::Int);
    assert_eq!(tbl.col("foo").unwrap(), *tbl.schema().get("foo").unwrap());
}

#[test]
fn test_schema_from_columns() {
    let schema = Schema::from_columns([
        Column::new("foo", DType::String),
        Column::new("bar", DType::Int),
    ]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    assert_eq!(tbl.col("bar").unwrap().dtype(), DType::Int);
    assert_eq!(tbl.schema().names(), vec!["foo", "bar"]);
}

#[test]
fn test_unknown_column_raises() {
    assert_unknown(tbl().col("baz"), "baz");
}

#[test]
fn test_no_columns() {
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), Schema::new());
    assert_unknown(tbl.col("baz"), "baz");
}

#[test]
fn test_schema_from_json_object() {
    let json = serde_json::json!({"foo": "string", "bar": "int", "bag": "dynamic"});
    let schema = Schema::from_json(&json).unwrap();
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.get("bag").unwrap().dtype(), DType::Dynamic);
}

#[test]
fn test_schema_from_json_list() {
    let json = serde_json::json!([
        {"name": "foo", "type": "string"},
        {"name": "bar", "type": "long"}
    ]);
    let schema = Schema::from_json(&json).unwrap();
    assert_eq!(schema.names(), vec!["foo", "bar"]);
    assert_eq!(schema.get("bar").unwrap().dtype(), DType::Long);
}

#[test]
fn test_schema_from_json_rejects_other_shapes() {
    assert!(matches!(
        Schema::from_json(&serde_json::json!("foo")),
        Err(Error::Schema(_))
    ));
    assert!(matches!(
        Schema::from_json(&serde_json::json!([1, 2])),
        Err(Error::Schema(_))
    ));
}

#[test]
fn test_schema_from_json_unknown_type() {
    let json = serde_json::json!({"foo": "varchar"});
    assert!(matches!(Schema::from_json(&json), Err(Error::UnknownType(t)) if t == "varchar"));
}

#[test]
fn test_dtype_parsing() {
    assert_eq!("string".parse::<DType>().unwrap(), DType::String);
    assert_eq!("double".parse::<DType>().unwrap(), DType::Real);
    assert_eq!("Boolean".parse::<DType>().unwrap(), DType::Bool);
    assert_eq!("date".parse::<DType>().unwrap(), DType::DateTime);
    assert!("blob".parse::<DType>().is_err());
}

// ============================================================================
// Property access through the table
// ============================================================================

#[test]
fn test_property_access_on_dynamic_column() {
    let schema = Schema::from_pairs([("foo", DType::Dynamic)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    let prop = tbl.col("foo").unwrap().field("bar").unwrap();
    assert_eq!(prop.to_string(), "foo.bar");
}

#[test]
fn test_property_access_on_string_column_fails() {
    let result = tbl().col("foo").unwrap().field("bar");
    assert!(matches!(result, Err(Error::InvalidPropertyAccess { .. })));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_empty_pipeline_renders_anchor() {
    assert_eq!(tbl().render(), "cluster('test').database('testdb').['tbl']\n");
}

#[test]
fn test_project() {
    let tbl = tbl();
    let foo = tbl.col("foo").unwrap();
    let bar = tbl.col("bar").unwrap();
    let query = tbl.project(Project::new([&foo, &bar]).rename("baz", &bar)).unwrap();
    assert_eq!(
        query.to_string(),
        "cluster('test').database('testdb').['tbl']\n| project foo,\nbar,\nbaz = bar\n"
    );
    assert_eq!(query.schema().names(), vec!["foo", "bar", "baz"]);
    assert_eq!(query.col("baz").unwrap().dtype(), DType::Int);
}

#[test]
fn test_project_rename_col() {
    let schema = Schema::from_pairs([("foo", DType::Int)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    let foo = tbl.col("foo").unwrap();
    let expr = tbl.project(Project::default().rename("bar", &foo)).unwrap();

    assert_eq!(expr.schema().get("bar").unwrap().dtype(), DType::Int);
    assert!(!expr.schema().contains("foo"));
    assert_eq!(
        expr.render(),
        "cluster('test').database('testdb').['tbl']\n| project bar = foo\n"
    );
}

#[test]
fn test_project_math_expr() {
    let schema = Schema::from_pairs([("foo", DType::Int)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    let foo = tbl.col("foo").unwrap();
    let expr = tbl
        .project(Project::default().rename("bar", Expr::from(&foo) + 1))
        .unwrap();

    assert_eq!(expr.schema().get("bar").unwrap().dtype(), DType::Int);
    assert!(!expr.schema().contains("foo"));
    assert_eq!(
        expr.render(),
        "cluster('test').database('testdb').['tbl']\n| project bar = foo + 1\n"
    );
}

#[test]
fn test_project_narrows_schema() {
    let tbl = tbl();
    let projected = tbl.project_names(["foo"]).unwrap();
    assert_unknown(projected.col("bar"), "bar");
    assert!(tbl.col("bar").is_ok());
}

#[test]
fn test_project_unknown_name_fails() {
    assert_unknown(tbl().project_names(["foo", "nope"]), "nope");
}

#[test]
fn test_project_stale_column_fails() {
    let tbl = tbl();
    let bar = tbl.col("bar").unwrap();
    let narrowed = tbl.project_names(["foo"]).unwrap();
    assert_unknown(narrowed.project(Project::new([&bar])), "bar");
}

#[test]
fn test_count() {
    let tbl = tbl();
    let query = tbl.project_names(["foo", "bar"]).unwrap().count();
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['tbl']\n| project foo,\nbar\n| count\n"
    );
    assert_eq!(query.col("Count").unwrap().dtype(), DType::Long);
}

#[test]
fn test_distinct() {
    let tbl = tbl();
    let bar = tbl.col("bar").unwrap();
    let foo = tbl.col("foo").unwrap();
    let query = tbl.distinct([&bar, &foo]).unwrap();
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['tbl']\n| distinct bar,\nfoo\n"
    );
}

#[test]
fn test_filter() {
    let tbl = tbl();
    let bar = tbl.col("bar").unwrap();
    let cases = [
        (bar.eq("foo"), "bar == 'foo'"),
        (bar.ne("foo"), "bar != 'foo'"),
        (bar.lt("foo"), "bar < 'foo'"),
        (bar.le("foo"), "bar <= 'foo'"),
        (bar.gt("foo"), "bar > 'foo'"),
        (bar.ge("foo"), "bar >= 'foo'"),
    ];
    for (expr, text) in cases {
        assert_eq!(
            tbl.filter([expr]).render(),
            format!("cluster('test').database('testdb').['tbl']\n| where {}\n", text)
        );
    }
}

#[test]
fn test_limit_and_take() {
    let tbl = TableExpr::new("tbl", DatabaseRef::new("c", "db"), Schema::new());
    assert_eq!(tbl.limit(1000).render(), "cluster('c').database('db').['tbl']\n| limit 1000\n");
    assert_eq!(tbl.take(1000).render(), "cluster('c').database('db').['tbl']\n| limit 1000\n");
}

#[test]
fn test_evaluate() {
    let schema = Schema::from_pairs([("foo", DType::Dynamic)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("cluster", "db"), schema);
    let foo = tbl.col("foo").unwrap();
    assert_eq!(
        tbl.evaluate(foo.bag_unpack()).render(),
        "cluster('cluster').database('db').['tbl']\n| evaluate bag_unpack(foo)\n"
    );
}

#[test]
fn test_order() {
    let tbl = tbl();
    let foo = tbl.col("foo").unwrap();
    let bar = tbl.col("bar").unwrap();
    assert_eq!(
        tbl.order([foo.desc(), bar.asc()]).render(),
        "cluster('test').database('testdb').['tbl']\n| order by\n\tfoo desc,\n\tbar asc\n"
    );
}

// ============================================================================
// Extend and branching
// ============================================================================

#[test]
fn test_extend() {
    let schema = Schema::from_pairs([("foo", DType::String)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    let tbl_2 = tbl.extend([("bar", "baz")]);

    assert!(tbl_2.schema().contains("bar"));
    assert_eq!(tbl_2.col("bar").unwrap().dtype(), DType::String);
    assert!(!tbl.schema().contains("bar"));
    assert_eq!(
        tbl_2.render(),
        "cluster('test').database('testdb').['tbl']\n| extend\n\tbar='baz'\n"
    );
    assert_eq!(tbl.render(), "cluster('test').database('testdb').['tbl']\n");
}

#[test]
fn test_branches_do_not_share_appends() {
    let base = tbl().limit(10);
    let left = base.count();
    let right = base.extend([("baz", 1)]);

    assert_eq!(base.operations().len(), 1);
    assert_eq!(
        left.render(),
        "cluster('test').database('testdb').['tbl']\n| limit 10\n| count\n"
    );
    assert_eq!(
        right.render(),
        "cluster('test').database('testdb').['tbl']\n| limit 10\n| extend\n\tbaz=1\n"
    );
}

#[test]
fn test_chained_pipeline() {
    let tbl = tbl();
    let foo = tbl.col("foo").unwrap();
    let bar = tbl.col("bar").unwrap();
    let query = tbl
        .filter([foo.has("x"), bar.gt(2)])
        .extend([("doubled", Expr::from(&bar) * 2)])
        .order([bar.asc()])
        .take(5);
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['tbl']\n\
         | where foo has 'x' and bar > 2\n\
         | extend\n\tdoubled=bar * 2\n\
         | order by\n\tbar asc\n\
         | limit 5\n"
    );
    assert_eq!(query.col("doubled").unwrap().dtype(), DType::Int);
}

// ============================================================================
// Summarize
// ============================================================================

#[test]
fn test_summarize_updates_schema() {
    let tbl = tbl();
    let bar = tbl.col("bar").unwrap();
    let query = tbl
        .summarize(Summarize::new().named("total", bar.sum()).agg(bar.dcount()).by(["foo"]))
        .unwrap();

    assert_eq!(query.schema().names(), vec!["foo", "dcount_bar", "total"]);
    assert_eq!(query.col("total").unwrap().dtype(), DType::Int);
    assert_eq!(query.col("dcount_bar").unwrap().dtype(), DType::Long);
    assert_unknown(query.col("bar"), "bar");
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['tbl']\n| summarize\n\tdcount_bar=dcount(bar, 1),\n\ttotal=sum(bar)\n\tby foo\n"
    );
}

#[test]
fn test_summarize_unknown_by_fails_without_appending() {
    let tbl = tbl();
    assert_unknown(tbl.summarize(Summarize::new().by(["nope"])), "nope");
    assert!(tbl.operations().is_empty());
}

#[test]
fn test_summarize_unknown_shufflekey_fails() {
    let tbl = tbl();
    let result = tbl.summarize(Summarize::new().by(["foo"]).shufflekey(["nope"]));
    assert_unknown(result, "nope");
}

// ============================================================================
// Join
// ============================================================================

fn wide(name: &str) -> TableExpr {
    let schema = Schema::from_pairs([
        ("foo", DType::String),
        ("bar", DType::String),
        ("baz", DType::Int),
    ]);
    TableExpr::new(name, DatabaseRef::new("test", "testdb"), schema)
}

#[test]
fn test_table_join() {
    let t1 = wide("table1");
    let t2 = wide("table2");
    let join = t1
        .join(&t2, ["foo", "bar"], JoinKind::Inner, Some(JoinStrategy::Shuffle))
        .unwrap();
    let expected = "cluster('test').database('testdb').['table1']
| join kind=inner hint.strategy=shuffle (
\tcluster('test').database('testdb').['table2']
) on foo, bar
";
    assert_eq!(join.render(), expected);
}

#[test]
fn test_join_right_pipeline_is_nested() {
    let t1 = wide("table1");
    let t2 = wide("table2").take(5);
    let join = t1.join(&t2, ["foo"], JoinKind::Inner, None).unwrap();
    assert_eq!(
        join.render(),
        "cluster('test').database('testdb').['table1']\n| join kind=inner (\n\tcluster('test').database('testdb').['table2']\n| limit 5\n) on foo\n"
    );
}

#[test]
fn test_join_schema_suffixes_clashing_columns() {
    let t1 = wide("table1");
    let t2 = wide("table2");
    let join = t1.join(&t2, ["foo"], JoinKind::Inner, None).unwrap();
    assert_eq!(
        join.schema().names(),
        vec!["foo", "bar", "baz", "foo1", "bar1", "baz1"]
    );
}

#[test]
fn test_left_outer_join_keeps_right_keys_suffixed() {
    let t1 = wide("table1");
    let t2 = TableExpr::new(
        "table2",
        DatabaseRef::new("test", "testdb"),
        Schema::from_pairs([("foo", DType::String), ("extra", DType::Long)]),
    );
    let join = t1.join(&t2, ["foo"], JoinKind::LeftOuter, None).unwrap();
    assert_eq!(join.schema().names(), vec!["foo", "bar", "baz", "foo1", "extra"]);
    assert_eq!(join.col("foo1").unwrap().dtype(), DType::String);
}

#[test]
fn test_semi_join_keeps_left_schema() {
    let t1 = wide("table1");
    let t2 = TableExpr::new(
        "table2",
        DatabaseRef::new("test", "testdb"),
        Schema::from_pairs([("foo", DType::String), ("extra", DType::Long)]),
    );
    let join = t1.join(&t2, ["foo"], JoinKind::LeftSemi, None).unwrap();
    assert_eq!(join.schema().names(), vec!["foo", "bar", "baz"]);
}

#[test]
fn test_join_unknown_key_fails() {
    let t1 = wide("table1");
    let t2 = TableExpr::new(
        "table2",
        DatabaseRef::new("test", "testdb"),
        Schema::from_pairs([("foo", DType::String)]),
    );
    assert_unknown(t1.join(&t2, ["bar"], JoinKind::Inner, None), "bar");
    assert!(t1.operations().is_empty());
}

// ============================================================================
// Open schemas
// ============================================================================

fn undeclared(name: &str) -> TableExpr {
    TableExpr::new(name, DatabaseRef::new("test", "testdb"), Schema::open())
}

#[test]
fn test_open_schema_accepts_any_group_key() {
    let query = undeclared("StormEvents")
        .summarize(Summarize::new().agg(kusto_tool::function::count()).by(["State"]))
        .unwrap();
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['StormEvents']\n| summarize\n\tcount_=count()\n\tby State\n"
    );
    assert_eq!(query.schema().names(), vec!["State", "count_"]);
    assert_eq!(query.col("State").unwrap().dtype(), DType::Dynamic);
    assert!(!query.schema().is_open());
}

#[test]
fn test_open_schema_project_keeps_column_types() {
    let tbl = undeclared("StormEvents");
    let state = Column::new("State", DType::String);
    let query = tbl.project(Project::new([&state])).unwrap();
    assert_eq!(query.render(), "cluster('test').database('testdb').['StormEvents']\n| project State\n");
    assert_eq!(query.col("State").unwrap().dtype(), DType::String);
    assert_unknown(query.project_names(["EventType"]), "EventType");
}

#[test]
fn test_open_schema_lookup_still_fails() {
    assert_unknown(undeclared("StormEvents").col("State"), "State");
}

#[test]
fn test_open_schema_join() {
    let left = undeclared("table1");
    let right = undeclared("table2");
    let join = left.join(&right, ["id"], JoinKind::Inner, None).unwrap();
    assert!(join.render().ends_with(") on id\n"));
    assert!(join.schema().is_open());
}

#[test]
fn test_evaluate_opens_schema() {
    let schema = Schema::from_pairs([("id", DType::Long), ("props", DType::Dynamic)]);
    let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    let props = tbl.col("props").unwrap();
    assert_unknown(tbl.summarize(Summarize::new().by(["Region"])), "Region");

    let unpacked = tbl.evaluate(props.bag_unpack());
    assert!(unpacked.schema().is_open());
    assert_eq!(unpacked.col("id").unwrap().dtype(), DType::Long);

    let query = unpacked.summarize(Summarize::new().by(["Region"])).unwrap();
    assert_eq!(
        query.render(),
        "cluster('test').database('testdb').['tbl']\n| evaluate bag_unpack(props)\n| summarize\n\tby Region\n"
    );
}

#[test]
fn test_extend_keeps_schema_open() {
    let wider = undeclared("tbl").extend([("n", 1)]);
    assert!(wider.schema().is_open());
    assert_eq!(wider.col("n").unwrap().dtype(), DType::Long);
}

// ============================================================================
// Empty clauses and string-named columns
// ============================================================================

#[test]
fn test_empty_clauses_are_skipped() {
    let tbl = tbl();
    let unchanged = tbl
        .filter(Vec::<Expr>::new())
        .extend(Vec::<(String, Expr)>::new())
        .order(Vec::<Column>::new());
    assert!(unchanged.operations().is_empty());
    assert_eq!(unchanged.render(), "cluster('test').database('testdb').['tbl']\n");
}

#[test]
fn test_distinct_names() {
    let query = tbl().distinct_names(["foo"]).unwrap();
    assert_eq!(query.render(), "cluster('test').database('testdb').['tbl']\n| distinct foo\n");
    assert_eq!(query.schema().names(), vec!["foo"]);
    assert_unknown(tbl().distinct_names(["nope"]), "nope");
}

// ============================================================================
// Long pipelines
// ============================================================================

#[test]
fn test_long_pipeline_drops_without_overflow() {
    let mut tbl = tbl();
    for _ in 0..100_000 {
        tbl = tbl.limit(1);
    }
    let branch = tbl.take(2);
    assert_eq!(branch.operations().len(), 100_001);
    drop(tbl);
    drop(branch);
}
