// build.rs

use glob::glob;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A bundled corpus matrix, as seen by the build script.
#[derive(Debug)]
struct CorpusMatrix {
    pub name: String,
    pub path: PathBuf,
}

/// Discovers every bundled `.mtx` file of both corpora under `data/`.
fn get_all_matrices() -> Vec<CorpusMatrix> {
    let data_dirs = ["data/matrici_def_pos", "data/matrici_non_def_pos"];
    let mut matrices: Vec<CorpusMatrix> = data_dirs
        .into_iter()
        .flat_map(|dir| glob(&format!("{}/*.mtx", dir)).expect("Failed to read glob pattern"))
        .filter_map(Result::ok)
        .filter_map(|path| {
            let stem = path.file_stem()?.to_string_lossy().to_string();
            let name = stem
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
                .collect();
            Some(CorpusMatrix { name, path })
        })
        .collect();
    matrices.sort_by(|a, b| a.path.cmp(&b.path));
    matrices
}

fn main() {
    println!("cargo:rerun-if-changed=data");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("corpus_tests.rs");
    let mut file = BufWriter::new(File::create(&dest_path).unwrap());

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    // One `#[test]` per bundled matrix, each solving it with the default library.
    for matrix in get_all_matrices() {
        let class = matrix
            .path
            .parent()
            .and_then(|p| p.file_name())
            .map(|d| d.to_string_lossy().to_string())
            .unwrap_or_default();
        let test_fn_name = format!("corpus_{}_{}", class.trim_start_matches("matrici_"), matrix.name);
        let abs_path = manifest_dir.join(&matrix.path);

        writeln!(
            file,
            r#"
#[test]
fn {fn_name}() -> anyhow::Result<()> {{
    run_accuracy_test_for_matrix("{path}")
}}
"#,
            fn_name = test_fn_name,
            path = abs_path.to_str().unwrap().escape_default(),
        )
        .unwrap();
    }
}
