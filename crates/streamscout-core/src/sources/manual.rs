//! Operator-supplied host list
//!
//! Plain text, one host per line. Blank lines and `#` comments are ignored.
//! A missing file is the normal case and is not reported as a problem.

use std::path::Path;

use tracing::{info, warn};

use crate::candidate::normalize_host;

/// Load and normalize the manual domains file
pub async fn load_manual_domains(path: &Path) -> Vec<String> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "manual domains unreadable");
            return Vec::new();
        }
    };

    let hosts = parse_manual_domains(&raw);
    info!(path = %path.display(), count = hosts.len(), "loaded manual domains");
    hosts
}

fn parse_manual_domains(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(normalize_host)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let raw = "# operator list\n\nKodiaq.Zirvedesin24.sbs\n  *.panda.zirvedesin31.sbs  \n# old.example\n";
        assert_eq!(
            parse_manual_domains(raw),
            vec!["kodiaq.zirvedesin24.sbs", "panda.zirvedesin31.sbs"]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let hosts = load_manual_domains(&dir.path().join("manual_domains.txt")).await;
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual_domains.txt");
        tokio::fs::write(&path, "127.0.0.1:8080\n").await.unwrap();

        assert_eq!(load_manual_domains(&path).await, vec!["127.0.0.1:8080"]);
    }
}
