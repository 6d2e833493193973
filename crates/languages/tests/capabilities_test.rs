//! Integration tests for the language capabilities over real parses

use pathminer_core::{Language, SyntaxTree};
use pathminer_languages::{capability_for, TreeSitterFrontEnd};
use pretty_assertions::assert_eq;
use std::path::Path;

fn parse(language: Language, source: &str) -> SyntaxTree {
    TreeSitterFrontEnd::new(language)
        .parse_source(source, Path::new("fixture"))
        .expect("Failed to parse fixture")
}

fn method_names(language: Language, source: &str) -> Vec<Option<String>> {
    let tree = parse(language, source);
    let capability = capability_for(language);
    capability
        .method_nodes(&tree)
        .into_iter()
        .map(|method| {
            capability
                .name_node(&tree, method)
                .and_then(|name| tree[name].token.clone())
        })
        .collect()
}

#[test]
fn test_rust_methods_and_names() {
    let source = r#"
struct Counter;

impl Counter {
    fn increment(&mut self) {}
}

fn computeSum(a: i32, b: i32) -> i32 { a + b }
"#;
    assert_eq!(
        method_names(Language::Rust, source),
        vec![Some("increment".to_string()), Some("computeSum".to_string())]
    );

    let tree = parse(Language::Rust, source);
    let file_name = capability_for(Language::Rust).file_name_node(&tree).unwrap();
    assert_eq!(tree[file_name].token.as_deref(), Some("Counter"));
}

#[test]
fn test_python_lambda_has_no_name() {
    let source = "def compute_sum(a, b):\n    return a + b\n\nsquare = lambda x: x * x\n";
    assert_eq!(
        method_names(Language::Python, source),
        vec![Some("compute_sum".to_string()), None]
    );
}

#[test]
fn test_javascript_methods_and_arrow_functions() {
    let source = r#"
class Calculator {
  add(a, b) { return a + b; }
}
function computeSum(xs) { return xs.reduce((acc, x) => acc + x, 0); }
"#;
    assert_eq!(
        method_names(Language::JavaScript, source),
        vec![
            Some("add".to_string()),
            Some("computeSum".to_string()),
            None
        ]
    );
}

#[test]
fn test_rust_type_annotations() {
    let source = "fn f(count: usize) { let mut total: u64 = 0; let (a, b) = (1, 2); }\n";
    let tree = parse(Language::Rust, source);
    let annotations = capability_for(Language::Rust)
        .type_annotations(&tree)
        .expect("Rust carries type annotations");

    let resolved: Vec<_> = annotations
        .iter()
        .map(|a| {
            (
                tree[a.identifier].token.clone().unwrap_or_default(),
                tree.text(a.type_node),
            )
        })
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("count".to_string(), "usize".to_string()),
            ("total".to_string(), "u64".to_string()),
        ]
    );
}

#[test]
fn test_python_type_annotations() {
    let source = "def f(name: str, limit: int = 3, plain=None):\n    pass\n";
    let tree = parse(Language::Python, source);
    let annotations = capability_for(Language::Python)
        .type_annotations(&tree)
        .expect("Python carries type annotations");

    let resolved: Vec<_> = annotations
        .iter()
        .map(|a| {
            (
                tree[a.identifier].token.clone().unwrap_or_default(),
                tree.text(a.type_node),
            )
        })
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("name".to_string(), "str".to_string()),
            ("limit".to_string(), "int".to_string()),
        ]
    );
}

#[test]
fn test_javascript_has_no_type_annotations() {
    let tree = parse(Language::JavaScript, "let x = 1;\n");
    assert!(capability_for(Language::JavaScript)
        .type_annotations(&tree)
        .is_none());
}

#[test]
fn test_literal_placeholders() {
    let rust = capability_for(Language::Rust);
    assert_eq!(rust.literal_placeholder("string_literal"), Some("<STR>"));
    assert_eq!(rust.literal_placeholder("integer_literal"), Some("<NUM>"));
    assert_eq!(rust.literal_placeholder("identifier"), None);

    let js = capability_for(Language::JavaScript);
    assert_eq!(js.literal_placeholder("template_string"), Some("<STR>"));
}

#[test]
fn test_file_name_looks_through_decorators_and_exports() {
    let source = "import functools\n\n@functools.cache\ndef load_config():\n    pass\n\nclass Loader:\n    pass\n";
    let tree = parse(Language::Python, source);
    let name = capability_for(Language::Python)
        .file_name_node(&tree)
        .unwrap();
    assert_eq!(tree[name].token.as_deref(), Some("load_config"));

    let source = "export const VERSION = 1;\nexport function renderPage() {}\nclass Helper {}\n";
    let tree = parse(Language::JavaScript, source);
    let name = capability_for(Language::JavaScript)
        .file_name_node(&tree)
        .unwrap();
    assert_eq!(tree[name].token.as_deref(), Some("renderPage"));
}
