mod common;

use common::Fixture;
use tsconfig_files_check::{
    config::{load_config, update_config, LoadConfigErrorKind, WriteConfigErrorKind},
    error::Error,
};

const STRICT_TSCONFIG: &str = r#"{
  // Files in this list must type-check with strict options
  "compilerOptions": {
    "strict": true,
    "noEmit": true,
  },
  "files": [
    "src/a.ts",
    "./src/b.ts",
  ],
}
"#;

#[test]
fn load_tolerates_comments_and_trailing_commas() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.strict.json", STRICT_TSCONFIG);

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(err) => panic!("Unexpected error: {:?}", err),
    };

    assert_eq!(
        config.declared_files(),
        &[fixture.path("src/a.ts"), fixture.path("src/b.ts")]
    );
    assert_eq!(
        config.compiler_options().as_value(),
        &serde_json::json!({ "strict": true, "noEmit": true })
    );
    assert_eq!(config.directory(), &fixture.root());
    assert_eq!(config.file_name(), "tsconfig.strict.json");
}

#[test]
fn load_without_files_declares_nothing() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "compilerOptions": { "strict": true } }"#);

    let config = load_config(&path).unwrap();
    assert!(config.declared_files().is_empty());
}

#[test]
fn load_resolves_parent_relative_entries() {
    let fixture = Fixture::new();
    let path = fixture.write(
        "config/tsconfig.json",
        r#"{ "files": ["../src/a.ts", "../src/a.ts", "b.ts"] }"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(
        config.declared_files(),
        &[fixture.path("src/a.ts"), fixture.path("config/b.ts")]
    );
}

#[test]
fn load_missing_config() {
    let fixture = Fixture::new();
    let err = load_config(&fixture.path("tsconfig.json")).unwrap_err();
    assert!(matches!(err.kind(), LoadConfigErrorKind::NotFound { .. }));
}

#[test]
fn load_unreadable_config() {
    let fixture = Fixture::new();
    let directory = fixture.mkdir("tsconfig.json");
    let err = load_config(&directory).unwrap_err();
    assert!(matches!(err.kind(), LoadConfigErrorKind::Unreadable { .. }));
}

#[test]
fn load_config_below_a_regular_file() {
    let fixture = Fixture::new();
    fixture.write("project", "not a directory\n");
    let err = load_config(&fixture.path("project/tsconfig.json")).unwrap_err();
    assert!(matches!(err.kind(), LoadConfigErrorKind::Unreadable { .. }));
    assert_eq!(Error::from(err).code(), "CONFIG_UNREADABLE");
}

#[test]
fn load_exposes_base_configuration() {
    let fixture = Fixture::new();
    let path = fixture.write(
        "tsconfig.strict.json",
        r#"{ "extends": "./tsconfig.json", "files": [] }"#,
    );
    let config = load_config(&path).unwrap();
    assert_eq!(config.extends(), Some(&serde_json::json!("./tsconfig.json")));

    let path = fixture.write("tsconfig.json", r#"{ "files": [] }"#);
    assert_eq!(load_config(&path).unwrap().extends(), None);
}

#[test]
fn load_unparsable_config() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "files": ["a.ts" }"#);
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err.kind(), LoadConfigErrorKind::Parse { .. }));
}

#[test]
fn load_rejects_non_list_files() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "files": "a.ts" }"#);
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err.kind(), LoadConfigErrorKind::InvalidFiles { .. }));
}

#[test]
fn update_appends_relative_entries_after_existing_ones() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "files": ["a.ts"] }"#);
    let config = load_config(&path).unwrap();

    let added = update_config(&path, config.document(), &[fixture.path("b.ts")]).unwrap();

    assert_eq!(added, 1);
    assert_eq!(fixture.files_entry("tsconfig.json"), vec!["a.ts", "b.ts"]);
}

#[test]
fn update_creates_missing_files_list() {
    let fixture = Fixture::new();
    let path = fixture.write("config/tsconfig.json", r#"{ "compilerOptions": {} }"#);
    let config = load_config(&path).unwrap();

    update_config(&path, config.document(), &[fixture.path("src/a.ts")]).unwrap();

    assert_eq!(
        fixture.files_entry("config/tsconfig.json"),
        vec!["../src/a.ts"]
    );
}

#[test]
fn update_skips_entries_already_listed() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", STRICT_TSCONFIG);
    let config = load_config(&path).unwrap();

    let added = update_config(
        &path,
        config.document(),
        &[
            fixture.path("src/a.ts"),
            fixture.path("src/b.ts"),
            fixture.path("src/c.ts"),
            fixture.path("src/c.ts"),
        ],
    )
    .unwrap();

    assert_eq!(added, 1);
    assert_eq!(
        fixture.files_entry("tsconfig.json"),
        vec!["src/a.ts", "./src/b.ts", "src/c.ts"]
    );
}

#[test]
fn update_twice_is_byte_for_byte_identical() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", STRICT_TSCONFIG);
    let to_add = [fixture.path("src/c.ts"), fixture.path("src/d.ts")];

    let config = load_config(&path).unwrap();
    update_config(&path, config.document(), &to_add).unwrap();
    let first = fixture.read("tsconfig.json");

    let config = load_config(&path).unwrap();
    let added = update_config(&path, config.document(), &to_add).unwrap();
    let second = fixture.read("tsconfig.json");

    assert_eq!(added, 0);
    assert_eq!(first, second);
}

#[test]
fn update_preserves_unrelated_keys_in_order() {
    let fixture = Fixture::new();
    let path = fixture.write(
        "tsconfig.json",
        r#"{
  "extends": "./tsconfig.base.json",
  "files": [],
  "compilerOptions": { "strictNullChecks": true, "lib": ["es2020", "dom"] },
  "exclude": ["dist"]
}"#,
    );
    let config = load_config(&path).unwrap();

    update_config(&path, config.document(), &[fixture.path("a.ts")]).unwrap();

    let expected = r#"{
  "extends": "./tsconfig.base.json",
  "files": [
    "a.ts"
  ],
  "compilerOptions": {
    "strictNullChecks": true,
    "lib": [
      "es2020",
      "dom"
    ]
  },
  "exclude": [
    "dist"
  ]
}
"#;
    assert_eq!(fixture.read("tsconfig.json"), expected);
}

#[test]
fn update_after_config_disappeared() {
    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "files": [] }"#);
    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let err = update_config(&path, config.document(), &[fixture.path("a.ts")]).unwrap_err();

    assert!(matches!(err.kind(), WriteConfigErrorKind::NotFound { .. }));
    assert_eq!(Error::from(err).code(), "CONFIG_NOT_FOUND");
    assert!(!path.as_path().exists());
}

#[cfg(unix)]
#[test]
fn update_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new();
    let path = fixture.write("tsconfig.json", r#"{ "files": [] }"#);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
    let config = load_config(&path).unwrap();

    update_config(&path, config.document(), &[fixture.path("a.ts")]).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[cfg(unix)]
#[test]
fn update_writes_through_symlinked_config() {
    let fixture = Fixture::new();
    let target = fixture.write("shared/tsconfig.json", r#"{ "files": [] }"#);
    let link = fixture.path("tsconfig.json");
    std::os::unix::fs::symlink(&target, &link).unwrap();
    let config = load_config(&link).unwrap();

    update_config(&link, config.document(), &[fixture.path("a.ts")]).unwrap();

    assert!(std::fs::symlink_metadata(&link)
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(fixture.files_entry("shared/tsconfig.json"), vec!["a.ts"]);
}
