//! End-to-end detection tests against real directories

use shipwright::{Archetype, Detector, Language, RealFileSystem};
use std::fs;
use tempfile::TempDir;

fn detect(dir: &TempDir) -> shipwright::DetectionResult {
    Detector::new(RealFileSystem::new())
        .detect(dir.path())
        .expect("detection failed")
}

#[test]
fn flask_project_with_port_override() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), "Flask==2.3\n").unwrap();
    fs::write(dir.path().join("app.py"), "app.run(port=6000)\n").unwrap();

    let result = detect(&dir);
    assert_eq!(result.archetype, Some(Archetype::Flask));
    assert_eq!(result.port, 6000);
    assert_eq!(result.start_command, "gunicorn -w 4 -b 0.0.0.0:5000 app:app");
}

#[test]
fn nextjs_project_keeps_default_port() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"next": "^14.0.0"}}"#,
    )
    .unwrap();

    let result = detect(&dir);
    assert_eq!(result.archetype, Some(Archetype::Nextjs));
    assert_eq!(result.port, 3000);
}

#[test]
fn python_markers_win_over_package_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), "django==4.2\n").unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"react": "^18"}}"#,
    )
    .unwrap();

    let result = detect(&dir);
    assert_eq!(result.language, Some(Language::Python));
    assert_eq!(result.archetype, Some(Archetype::Django));
}

#[test]
fn each_archetype_detected_from_canonical_markers() {
    let cases: Vec<(Archetype, &str, &str)> = vec![
        (Archetype::Flask, "requirements.txt", "flask==2.3\n"),
        (Archetype::Django, "requirements.txt", "django==4.2\n"),
        (Archetype::Fastapi, "requirements.txt", "fastapi==0.110\n"),
        (
            Archetype::Nextjs,
            "package.json",
            r#"{"dependencies": {"next": "^14"}}"#,
        ),
        (
            Archetype::Nuxtjs,
            "package.json",
            r#"{"dependencies": {"nuxt": "^3"}}"#,
        ),
        (
            Archetype::Nestjs,
            "package.json",
            r#"{"dependencies": {"@nestjs/core": "^10"}}"#,
        ),
        (
            Archetype::ReactSpa,
            "package.json",
            r#"{"dependencies": {"react": "^18"}}"#,
        ),
        (
            Archetype::VueSpa,
            "package.json",
            r#"{"dependencies": {"vue": "^3"}}"#,
        ),
    ];

    for (expected, marker, content) in cases {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(marker), content).unwrap();

        let result = detect(&dir);
        assert_eq!(result.archetype, Some(expected), "marker {}", marker);

        let defaults = expected.defaults();
        assert_eq!(result.port, defaults.port, "port for {}", expected);
        assert_eq!(result.build_command, defaults.build_command);
        assert_eq!(result.start_command, defaults.start_command);
    }
}

#[test]
fn flask_factory_refinement_needs_both_conditions() {
    // run.py present with create_app: refined
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();
    fs::write(dir.path().join("run.py"), "app = create_app()\n").unwrap();

    let result = detect(&dir);
    assert!(result.start_command.ends_with("run:app"));

    // run.py present without create_app: untouched
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();
    fs::write(dir.path().join("run.py"), "from app import app\n").unwrap();

    let result = detect(&dir);
    assert!(result.start_command.ends_with("app:app"));
}

#[test]
fn env_keys_and_presence_flags_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"next": "^14"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(".env"),
        "DATABASE_URL=postgres://x\nAPI_TOKEN=y\n# comment\n",
    )
    .unwrap();
    fs::write(dir.path().join("Dockerfile"), "FROM node:20\n").unwrap();
    fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();

    let result = detect(&dir);
    assert_eq!(result.env_keys, vec!["DATABASE_URL", "API_TOKEN"]);
    assert!(result.has_dockerfile);
    assert!(result.has_ci);
}

#[test]
fn unknown_directory_detects_without_failing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "nothing to see\n").unwrap();

    let result = detect(&dir);
    assert!(result.archetype.is_none());
}
