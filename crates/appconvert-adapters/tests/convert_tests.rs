//! End-to-end conversions through the real adapters.

use std::path::Path;
use std::sync::Arc;

use appconvert_adapters::{LocalFilesystem, MemoryFilesystem, StaticRegistry, builtin_templates};
use appconvert_core::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn definition() -> AppDefinition {
    AppDefinition::from_value(json!({
        "version": "2.1.0",
        "platformVersion": "15.4.1",
        "authentication": {
            "type": "oauth2",
            "oauth2Config": {
                "authorizeUrl": {"url": "https://example.com/authorize"},
                "getAccessToken": {"source": "return z.request(bundle.request);"}
            }
        },
        "triggers": {
            "recipe": {
                "key": "recipe",
                "noun": "Recipe",
                "display": {"label": "New Recipe", "description": "Triggers on a new recipe."},
                "operation": {
                    "inputFields": [{"key": "style", "default": "mediterranean"}],
                    "perform": {"source": "const response = await z.request('https://example.com/recipes');\nreturn response.data;"}
                }
            }
        },
        "searches": {
            "findRecipe": {
                "key": "findRecipe",
                "operation": {
                    "inputFields": [{"key": "name", "required": true}],
                    "perform": {"source": "return [];"}
                }
            }
        }
    }))
    .unwrap()
}

fn service(fs: Arc<dyn Filesystem>) -> ConvertService {
    ConvertService::new(
        fs,
        Arc::new(StaticRegistry::new().with_fallback("3.8.1")),
        ConvertOptions::new(builtin_templates::bundled_templates()),
    )
}

#[tokio::test]
async fn converts_into_a_real_directory() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("recipes");

    let written = service(Arc::new(LocalFilesystem::new()))
        .convert(AppInfo::default().with_title("Recipe Book"), definition(), &out)
        .await
        .unwrap();

    for path in &written {
        assert!(path.is_file(), "{} missing", path.display());
    }

    let trigger = std::fs::read_to_string(out.join("triggers/recipe.js")).unwrap();
    assert!(trigger.contains("const perform = async (z, bundle) => {"));
    assert!(trigger.contains("    perform: perform,\n"));
    assert!(trigger.contains("key: 'style',"));

    let test = std::fs::read_to_string(out.join("test/triggers/recipe.js")).unwrap();
    assert!(test.contains("describe('triggers.recipe', () => {"));
    assert!(test.contains("App.triggers['recipe'].operation.perform"));
    assert!(test.contains("access_token: process.env.ACCESS_TOKEN,"));
    assert!(test.contains("style: 'mediterranean',"));

    let search_test = std::fs::read_to_string(out.join("test/searches/find_recipe.js")).unwrap();
    assert!(search_test.contains("name: null,"));

    let env = std::fs::read_to_string(out.join(".env")).unwrap();
    assert!(env.contains("ACCESS_TOKEN=YOUR_ACCESS_TOKEN\n"));

    let gitignore = std::fs::read_to_string(out.join(".gitignore")).unwrap();
    assert!(gitignore.contains("node_modules/"));

    let package: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("package.json")).unwrap()).unwrap();
    assert_eq!(package["name"], "recipe-book");
    assert_eq!(package["version"], "2.1.1");
    assert_eq!(package["dependencies"]["zapier-platform-core"], "15.4.1");
    assert!(package["dependencies"]
        .get("zapier-platform-legacy-scripting-runner")
        .is_none());
}

#[tokio::test]
async fn dry_run_plan_matches_written_files() {
    let templates = builtin_templates::bundled_templates();
    let fs = builtin_templates::required_files()
        .into_iter()
        .fold(MemoryFilesystem::new(), |fs, name| {
            let content = std::fs::read_to_string(templates.join(name)).unwrap();
            fs.with_file(templates.join(name), content)
        });

    let service = service(Arc::new(fs.clone()));
    let planned = service.planned_paths(&definition()).unwrap();

    let written = service
        .convert(
            AppInfo::default().with_title("Recipe Book"),
            definition(),
            Path::new("/out"),
        )
        .await
        .unwrap();

    let expected: Vec<_> = planned.iter().map(|p| p.under(Path::new("/out"))).collect();
    assert_eq!(written, expected);
    for path in &written {
        assert!(fs.read_file(path).is_some(), "{} missing", path.display());
    }
}

#[tokio::test]
async fn missing_templates_fail_the_run() {
    let dir = TempDir::new().unwrap();

    let err = ConvertService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(StaticRegistry::new()),
        ConvertOptions::new(dir.path().join("no-templates")),
    )
    .convert(
        AppInfo::default().with_title("Recipe Book"),
        definition(),
        &dir.path().join("out"),
    )
    .await
    .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NotFound);
}
