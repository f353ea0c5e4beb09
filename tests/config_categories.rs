use kasai_news::config::categories::{load_rules_default, load_rules_from};
use kasai_news::CategoryRules;
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("categories.toml");
    fs::write(
        &p_toml,
        r#"
default = "その他"

[[rules]]
name = "交通"
tag = "traffic"
keywords = ["渋滞", "運休"]
"#,
    )
    .unwrap();
    let rules = load_rules_from(&p_toml).unwrap();
    assert_eq!(rules.category_names(), vec!["交通", "その他"]);
    assert_eq!(rules.classify_text("東西線が運休"), "交通");

    let p_json = dir.path().join("categories.json");
    fs::write(
        &p_json,
        r#"{"rules":[{"name":"天気","keywords":["台風"]}]}"#,
    )
    .unwrap();
    let rules = load_rules_from(&p_json).unwrap();
    assert_eq!(rules.classify_text("台風接近"), "天気");
    assert_eq!(rules.default_category(), "その他");
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var("NEWS_CATEGORIES_PATH");

    // 1) Nothing → built-in seed
    let v = load_rules_default().unwrap();
    assert_eq!(v, CategoryRules::default_seed());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("categories.toml"),
        r#"[[rules]]
name = "A"
keywords = ["a"]
"#,
    )
    .unwrap();
    assert_eq!(load_rules_default().unwrap().category_names(), vec!["A", "その他"]);

    // 3) Env var wins
    let p_env = tmp.path().join("rules.json");
    fs::write(&p_env, r#"{"rules":[{"name":"X","keywords":["x"]}]}"#).unwrap();
    env::set_var("NEWS_CATEGORIES_PATH", p_env.display().to_string());
    assert_eq!(load_rules_default().unwrap().category_names(), vec!["X", "その他"]);
    env::remove_var("NEWS_CATEGORIES_PATH");

    env::set_current_dir(&old).unwrap();
}
