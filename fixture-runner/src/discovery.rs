use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub fn collect_fixture_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| is_fixture_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn is_fixture_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yaml_files_are_fixtures() {
        assert!(is_fixture_file(Path::new("fixtures/format/basic.yaml")));
        assert!(is_fixture_file(Path::new("a.yml")));
        assert!(!is_fixture_file(Path::new("fixtures/README.md")));
        assert!(!is_fixture_file(Path::new("fixtures")));
    }
}
