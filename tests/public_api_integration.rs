// Integration test for the public API
use devmind::{DevMind, DevMindBuilder, DevMindError, Result, ToolSchema, ToolResult, AnalyzeResult, ImportRef, VERSION};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("app/models")).unwrap();
    fs::write(
        root.join("app/__init__.py"),
        "from app.models import user\nimport logging\n",
    )
    .unwrap();
    fs::write(
        root.join("app/models/user.py"),
        "import dataclasses\n\nclass User:\n    def greet(self):\n        return 'hi'\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# demo\n").unwrap();
    temp_dir
}

#[test]
fn test_public_api_exports() {
    let _version: &str = VERSION;

    let builder: DevMindBuilder = DevMind::builder();
    let _devmind: Result<DevMind> = builder.build();

    let _tools: Vec<ToolSchema> = DevMind::get_tool_definitions();

    let _error: DevMindError = DevMindError::NotIndexed("x".to_string());
}

#[test]
fn test_version_constant() {
    assert!(!VERSION.is_empty());
    assert!(VERSION.starts_with("0."));
}

#[test]
fn test_tool_definitions_structure() {
    let tools = DevMind::get_tool_definitions();
    let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    for expected in ["analyze_project", "get_file_summary", "get_file_content", "list_subdirectories"] {
        assert!(tool_names.contains(&expected));
    }

    for tool in &tools {
        assert!(!tool.name.is_empty());
        assert!(!tool.description.is_empty());
        assert!(tool.input_schema.is_object());
    }
}

#[tokio::test]
async fn test_full_workflow() {
    let project = create_project();
    let devmind = DevMind::builder().build().unwrap();

    assert!(!devmind.is_indexed());
    assert_eq!(devmind.get_stats().total_files, 0);

    let result: AnalyzeResult = devmind.analyze(project.path()).await.unwrap();
    assert_eq!(
        result.files,
        vec!["README.md", "app/__init__.py", "app/models/user.py"]
    );

    let record = devmind.get_summary("app/__init__.py").unwrap();
    assert_eq!(
        record.imports,
        vec![ImportRef::from_module("app.models"), ImportRef::direct("logging")]
    );

    let user = devmind.get_summary("app/models/user.py").unwrap();
    assert_eq!(
        user.summary,
        "Detected 2 functions/classes. First 2: ['class User:', 'def greet(self):']"
    );

    let content = devmind.get_full_content("README.md").unwrap();
    assert_eq!(content, "# demo\n");

    assert_eq!(devmind.list_subdirectories(project.path()).unwrap(), vec!["app"]);
    assert_eq!(devmind.get_stats().total_files, 3);
    assert_eq!(devmind.get_stats().total_imports, 3);
}

#[tokio::test]
async fn test_execute_tool_interface() {
    let project = create_project();
    let devmind = DevMind::builder().build().unwrap();

    let result = devmind.execute_tool("invalid_tool", json!({})).await.unwrap();
    assert!(!result.success);
    assert!(result.error.is_some());

    let result: ToolResult = devmind
        .execute_tool("analyze_project", json!({"path": project.path()}))
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.data["count"], 3);

    let result = devmind
        .execute_tool("get_file_summary", json!({"relative_path": "app/models/user.py"}))
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.data["imports"][0]["module_direct"], "dataclasses");

    let result = devmind.execute_tool("get_file_summary", json!({})).await;
    assert!(matches!(result, Err(DevMindError::InvalidInput(_))));
}

#[test]
fn test_error_types() {
    let error = DevMindError::NotIndexed("a.py".to_string());
    match error {
        DevMindError::NotIndexed(path) => assert_eq!(path, "a.py"),
        _ => panic!("Unexpected error type"),
    }

    let error = DevMindError::Config("bad".to_string());
    assert_eq!(error.kind(), "config");
}
