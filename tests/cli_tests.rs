// tests/cli_tests.rs

use kusto_tool::cli::{CliError, RenderOptions, SetOptions, execute_render, execute_set, json_to_literal};

#[test]
fn test_render_with_params() {
    let options = RenderOptions {
        query: "{{ t }} | take {{ n }}".to_string(),
        params: Some(r#"{"t": "StormEvents", "n": 10}"#.to_string()),
    };
    assert_eq!(execute_render(&options).unwrap(), "StormEvents | take 10");
}

#[test]
fn test_render_without_params() {
    let options = RenderOptions {
        query: "StormEvents | count".to_string(),
        params: None,
    };
    assert_eq!(execute_render(&options).unwrap(), "StormEvents | count");
}

#[test]
fn test_render_rejects_non_object_params() {
    let options = RenderOptions {
        query: "T".to_string(),
        params: Some("[1, 2]".to_string()),
    };
    assert!(matches!(execute_render(&options), Err(CliError::InvalidParams(_))));
}

#[test]
fn test_render_rejects_bad_json() {
    let options = RenderOptions {
        query: "T".to_string(),
        params: Some("{".to_string()),
    };
    assert!(matches!(execute_render(&options), Err(CliError::Json(_))));
}

#[test]
fn test_render_missing_param() {
    let options = RenderOptions {
        query: "{{ t }}".to_string(),
        params: None,
    };
    let err = execute_render(&options).unwrap_err();
    assert!(err.to_string().contains("'t'"));
}

#[test]
fn test_set() {
    let options = SetOptions {
        render: RenderOptions {
            query: "T | take 1".to_string(),
            params: None,
        },
        table: "Out".to_string(),
        folder: "f".to_string(),
        docstring: "d".to_string(),
        replace: false,
    };
    assert_eq!(
        execute_set(&options).unwrap(),
        ".set-or-append Out\nwith (\nfolder = \"f\",\ndocstring = \"d\",\n)\n<|\nT | take 1"
    );
}

#[test]
fn test_literal_object() {
    assert_eq!(
        json_to_literal(r#"{"a": "x"}"#).unwrap(),
        "datatable(key: string, value: string)[\n    'a', 'x',\n]"
    );
}

#[test]
fn test_literal_array_and_scalar() {
    assert_eq!(json_to_literal(r#"["a", 1]"#).unwrap(), "dynamic([\n\t'a',\n\t1\n])");
    assert_eq!(json_to_literal(r#""a""#).unwrap(), "'a'");
    assert_eq!(json_to_literal("3.5").unwrap(), "3.5");
}
