//! Port extraction from source files
//!
//! Scans a short, language-specific list of entry-point candidates against
//! ordered regex patterns. The first match wins, in file order then pattern
//! order, and overrides the archetype's default port.

use crate::fs::FileSystem;
use super::Language;
use regex::Regex;
use std::path::Path;

/// Patterns checked against each candidate file, in order
const PORT_PATTERNS: [&str; 3] = [
    r#"port\s*[=:]\s*(\d{4,5})"#,
    r#"listen\s*\(\s*(\d{4,5})"#,
    r#"PORT\s*[=:]\s*["']?(\d{4,5})"#,
];

const PYTHON_CANDIDATES: [&str; 3] = ["app.py", "main.py", "run.py"];
const NODE_CANDIDATES: [&str; 3] = ["server.js", "index.js", "app.js"];

/// Find a port declared in source, if any
pub fn scan_for_port<F: FileSystem>(fs: &F, dir: &Path, language: Language) -> Option<u16> {
    let candidates: &[&str] = match language {
        Language::Python => &PYTHON_CANDIDATES,
        Language::Node => &NODE_CANDIDATES,
    };

    for candidate in candidates {
        let path = dir.join(candidate);
        if !fs.is_file(&path) {
            continue;
        }
        let content = match fs.read_to_string(&path) {
            Ok(c) => c,
            Err(_) => continue,
        };
        for pattern in PORT_PATTERNS {
            let re = match Regex::new(pattern) {
                Ok(r) => r,
                Err(_) => continue,
            };
            if let Some(port) = re
                .captures(&content)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<u16>().ok())
            {
                return Some(port);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::PathBuf;

    #[test]
    fn test_python_run_call() {
        let fs = MockFileSystem::new();
        fs.add_file("app.py", "app.run(host=\"0.0.0.0\", port=6000)\n");

        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Python);
        assert_eq!(port, Some(6000));
    }

    #[test]
    fn test_upper_case_assignment() {
        let fs = MockFileSystem::new();
        fs.add_file("main.py", "PORT = \"4500\"\n");

        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Python);
        assert_eq!(port, Some(4500));
    }

    #[test]
    fn test_node_listen_call() {
        let fs = MockFileSystem::new();
        fs.add_file("server.js", "app.listen(8080, () => {});\n");

        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Node);
        assert_eq!(port, Some(8080));
    }

    #[test]
    fn test_file_order_wins_over_pattern_order() {
        let fs = MockFileSystem::new();
        fs.add_file("server.js", "const PORT = 9100;\n");
        fs.add_file("index.js", "app.listen(3000);\n");

        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Node);
        assert_eq!(port, Some(9100));
    }

    #[test]
    fn test_short_numbers_ignored() {
        let fs = MockFileSystem::new();
        fs.add_file("app.py", "port = 80\n");

        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Python);
        assert_eq!(port, None);
    }

    #[test]
    fn test_no_candidates_present() {
        let fs = MockFileSystem::new();
        fs.add_dir(".");
        let port = scan_for_port(&fs, &PathBuf::from("/mock"), Language::Node);
        assert_eq!(port, None);
    }
}
