//! Operator-facing terminal output
//!
//! Status lines and reports go to stdout; structured logs stay on stderr.

use crate::deploy::{DnsCheck, PipelineOutcome};
use crate::detect::DetectionResult;
use crate::generate::GeneratedFile;
use console::style;
use std::fmt::Write as _;

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Human-readable report of what detection found
pub fn detection_summary(detection: &DetectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Project detection").bold());
    match detection.archetype {
        Some(archetype) => {
            let _ = writeln!(out, "  Type:       {}", archetype);
            let _ = writeln!(out, "  Port:       {}", detection.port);
            let _ = writeln!(out, "  Build:      {}", detection.build_command);
            let _ = writeln!(out, "  Start:      {}", detection.start_command);
            if let Some(entry) = &detection.entry_file {
                let _ = writeln!(out, "  Entry:      {}", entry);
            }
        }
        None => {
            let _ = writeln!(out, "  Type:       unknown (you will be asked)");
        }
    }
    if !detection.env_keys.is_empty() {
        let _ = writeln!(
            out,
            "  Env keys:   {} found in an env file",
            detection.env_keys.len()
        );
    }
    if detection.has_dockerfile {
        let _ = writeln!(out, "  Dockerfile: present (will be backed up)");
    }
    if detection.has_ci {
        let _ = writeln!(out, "  CI:         present (will be backed up)");
    }
    out
}

/// One line per generated file, marking backups
pub fn generation_report(files: &[GeneratedFile]) -> String {
    let mut out = String::new();
    for file in files {
        if file.backed_up {
            let _ = writeln!(
                out,
                "  {} {} {}",
                style("✓").green(),
                file.path.display(),
                style("(previous version saved as .backup)").dim()
            );
        } else {
            let _ = writeln!(out, "  {} {}", style("✓").green(), file.path.display());
        }
    }
    out
}

pub fn report_dns(check: &DnsCheck) {
    match check {
        DnsCheck::Match { address } => {
            print_success(&format!("domain resolves to the server ({})", address));
        }
        DnsCheck::Mismatch { resolved, expected } => {
            print_warning(&format!(
                "domain resolves to {:?}, expected {:?}; DNS may still be propagating",
                resolved, expected
            ));
        }
        DnsCheck::Unresolved { reason } => {
            print_warning(&format!(
                "domain does not resolve yet ({}); continuing anyway",
                reason
            ));
        }
    }
}

pub fn report_pipeline(outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Success => print_success("pipeline completed successfully"),
        PipelineOutcome::Failure { conclusion } => {
            print_error(&format!("pipeline finished with conclusion: {}", conclusion));
        }
        PipelineOutcome::Timeout => {
            print_warning("pipeline did not finish within the polling window; check it manually");
        }
        PipelineOutcome::Unavailable => {
            print_warning("could not query pipeline runs (is gh installed and authenticated?)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Archetype, DetectionResult};

    #[test]
    fn test_detection_summary_known_type() {
        let mut detection = DetectionResult::seed(Archetype::Flask);
        detection.env_keys = vec!["SECRET_KEY".to_string()];
        detection.has_dockerfile = true;

        let summary = detection_summary(&detection);
        assert!(summary.contains("flask"));
        assert!(summary.contains("5000"));
        assert!(summary.contains("Dockerfile: present"));
        assert!(summary.contains("1 found"));
    }

    #[test]
    fn test_detection_summary_unknown_type() {
        let summary = detection_summary(&DetectionResult::unknown());
        assert!(summary.contains("unknown"));
    }

    #[test]
    fn test_generation_report_marks_backups() {
        let files = vec![
            GeneratedFile {
                path: "Dockerfile".into(),
                backed_up: true,
            },
            GeneratedFile {
                path: "docker-compose.yml".into(),
                backed_up: false,
            },
        ];

        let report = generation_report(&files);
        assert!(report.contains("Dockerfile"));
        assert!(report.contains(".backup"));
        assert!(report.contains("docker-compose.yml"));
    }
}
