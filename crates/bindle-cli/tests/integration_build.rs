//! Integration tests driving the command implementations end to end.

use std::path::Path;

use bindle_cli::cli::{BuildArgs, CheckArgs, GraphArgs};
use bindle_cli::commands;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// A minimal extension source tree: a factored pair sharing one module,
/// plus the inpage/contentscript pair.
fn scaffold_sources(src: &Path) {
    write(src, "lib/shared.js", "var shared = 'util';");
    write(src, "ui.js", "require('./lib/shared')\nvar ui = shared;");
    write(
        src,
        "background.js",
        "require('./lib/shared')\nvar bg = shared;",
    );
    write(
        src,
        "inpage.js",
        "var inpage = process.env.NODE_ENV;\nconsole.log(inpage);",
    );
    write(src, "contentscript.js", "var content = 1;");
}

fn write_config(dir: &Path, src: &Path, dist: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("bindle.toml");
    std::fs::write(
        &path,
        format!(
            "src_dir = \"{}\"\ndist_dir = \"{}\"\nplatforms = [\"chrome\"]\n{extra}",
            src.display(),
            dist.display()
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn dev_build_writes_every_bundle() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("app");
    let dist = root.path().join("dist");
    scaffold_sources(&src);
    let config = write_config(root.path(), &src, &dist, "");

    commands::build_execute(BuildArgs {
        dev: true,
        test: false,
        config: Some(config),
    })
    .await
    .unwrap();

    for name in [
        "common.js",
        "ui.js",
        "background.js",
        "inpage.js",
        "contentscript.js",
    ] {
        assert!(dist.join("chrome").join(name).exists(), "missing {name}");
    }

    // Dev builds substitute NODE_ENV=development and stay unminified.
    let inpage = std::fs::read_to_string(dist.join("chrome/inpage.js")).unwrap();
    assert!(inpage.contains("development"));
    assert!(!inpage.contains("process.env.NODE_ENV"));
}

#[tokio::test]
async fn dev_build_ships_inline_source_maps() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("app");
    let dist = root.path().join("dist");
    scaffold_sources(&src);
    let config = write_config(root.path(), &src, &dist, "");

    commands::build_execute(BuildArgs {
        dev: true,
        test: false,
        config: Some(config),
    })
    .await
    .unwrap();

    for name in ["inpage.js", "ui.js", "common.js"] {
        let bundle = std::fs::read_to_string(dist.join("chrome").join(name)).unwrap();
        assert!(
            bundle.contains("sourceMappingURL=data:application/json"),
            "no inline map in {name}"
        );
    }
    // No external map directory in dev.
    assert!(!dist.join("sourcemaps").exists());
}

#[tokio::test]
async fn production_build_minifies_and_writes_external_maps() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("app");
    let dist = root.path().join("dist");
    scaffold_sources(&src);
    let config = write_config(root.path(), &src, &dist, "");

    commands::build_execute(BuildArgs {
        dev: false,
        test: false,
        config: Some(config),
    })
    .await
    .unwrap();

    let inpage = std::fs::read_to_string(dist.join("chrome/inpage.js")).unwrap();
    assert!(inpage.contains("sourceMappingURL=../sourcemaps/inpage.js.map"));
    assert!(dist.join("sourcemaps/inpage.js.map").exists());

    // production substitution, minified output
    assert!(inpage.contains("production"));
    let original = std::fs::read_to_string(src.join("inpage.js")).unwrap();
    let code = inpage.split("//#").next().unwrap();
    assert!(code.len() <= original.len() + 16, "output not minified");
}

#[tokio::test]
async fn graph_command_dumps_deps_without_bundles() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("app");
    let dist = root.path().join("dist");
    scaffold_sources(&src);
    let config = write_config(root.path(), &src, &dist, "");
    let out = root.path().join("deps.json");

    commands::graph_execute(GraphArgs {
        out: Some(out.clone()),
        config: Some(config),
    })
    .await
    .unwrap();

    let deps: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let ui_deps = deps["modules"]["ui.js"]["deps"].as_array().unwrap();
    assert!(ui_deps.contains(&serde_json::Value::String("lib/shared.js".to_string())));

    // No bundle output was written.
    assert!(!dist.join("chrome/ui.js").exists());
}

#[tokio::test]
async fn check_rejects_an_invalid_config() {
    let root = tempfile::tempdir().unwrap();
    let config = root.path().join("bindle.toml");
    std::fs::write(&config, "platforms = []\n").unwrap();

    let err = commands::check_execute(CheckArgs {
        config: Some(config),
    })
    .await
    .unwrap_err();
    assert!(err.to_string().contains("platforms"));
}

#[tokio::test]
async fn check_accepts_a_valid_config() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("app");
    let dist = root.path().join("dist");
    std::fs::create_dir_all(&src).unwrap();
    let config = write_config(root.path(), &src, &dist, "[livereload]\nenabled = true\n");

    commands::check_execute(CheckArgs {
        config: Some(config),
    })
    .await
    .unwrap();
}
