// Shared build script helper: turns a crate README.md into its rustdoc front page.
// Include it from build.rs with: include!("../build_common.rs");
//
// The including file must import std::env, std::fs and std::path::Path.

/// Write `OUT_DIR/README_GENERATED.md` from the crate README.
///
/// Links of the form `](src/foo.rs)` are rewritten to `](foo)` so rustdoc
/// resolves them as modules, and `](../../README.md` is pointed at the
/// workspace repository URL. A missing README still produces an empty file
/// because every `lib.rs` includes the generated output.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path).unwrap_or_default();

    let mut rustdoc_content = content.replace("](src/", "](").replace(".rs)", ")");

    if let Some(url) = workspace_repo_url(crate_dir) {
        rustdoc_content = rustdoc_content.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rustdoc_content).unwrap();
}

/// `repository = "..."` from the workspace manifest, if present.
fn workspace_repo_url(crate_dir: &str) -> Option<String> {
    let workspace_toml = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(workspace_toml).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        if !line.starts_with("repository") || !line.contains('=') {
            return None;
        }
        let start = line.find('"')?;
        let end = line.rfind('"')?;
        (start < end).then(|| line[start + 1..end].to_string())
    })
}
