use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::domain::email::Email;
use crate::error::FetchError;
use crate::store::repo::FlagRepository;

/// Where the static email collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// http(s) strings become URLs, anything else is a local path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => DataSource::Url(s.to_string()),
            _ => DataSource::File(PathBuf::from(s)),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(u) => write!(f, "{u}"),
            DataSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Retrieves the base collection and overlays persisted flags before any
/// consumer sees it. Single attempt, no retry. The flag store is injected
/// so the overlay step is testable in isolation.
pub struct EmailFetcher {
    source: DataSource,
    client: reqwest::blocking::Client,
    flags: Arc<dyn FlagRepository>,
}

impl EmailFetcher {
    pub fn new(source: DataSource, flags: Arc<dyn FlagRepository>) -> Self {
        Self {
            source,
            client: reqwest::blocking::Client::new(),
            flags,
        }
    }

    pub fn fetch(&self) -> Result<Vec<Email>, FetchError> {
        let mut emails = match &self.source {
            DataSource::Url(url) => self.fetch_url(url)?,
            DataSource::File(path) => fetch_file(path)?,
        };

        // Mandatory overlay: flag-store state wins over whatever the
        // source carried; absent overrides mean false.
        let overrides = self.flags.load();
        for email in &mut emails {
            let flags = overrides.get(&email.id).copied().unwrap_or_default();
            email.is_favorite = flags.is_favorite.unwrap_or(false);
            email.is_read = flags.is_read.unwrap_or(false);
        }

        log::info!("fetched {} emails from {}", emails.len(), self.source);
        Ok(emails)
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<Email>, FetchError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(resp.json()?)
    }
}

fn fetch_file(path: &Path) -> Result<Vec<Email>, FetchError> {
    let raw = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::domain::email::{FlagMap, FlagUpdate};
    use crate::store::memory::MemoryFlagStore;

    const TWO_EMAILS: &str = r#"[
        {
            "id": "m-1",
            "sender": "alice@example.com",
            "recipient": "bob@example.com",
            "subject": "Status report",
            "body": "All green.",
            "date": "2024-03-01T08:00:00Z",
            "isFavorite": true,
            "isRead": true
        },
        {
            "id": "m-2",
            "sender": "carol@example.com",
            "recipient": "bob@example.com",
            "subject": "Lunch",
            "body": "Noon?",
            "date": "2024-03-02T11:00:00Z"
        }
    ]"#;

    fn write_source(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("emails.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(json.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("https://example.com/data/emails.json"),
            DataSource::Url("https://example.com/data/emails.json".into())
        );
        assert_eq!(
            DataSource::parse("/var/data/emails.json"),
            DataSource::File(PathBuf::from("/var/data/emails.json"))
        );
    }

    #[test]
    fn overlay_replaces_source_flags_with_store_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, TWO_EMAILS);

        let mut table = FlagMap::new();
        table.insert("m-2".into(), FlagUpdate::favorite(true));
        let store = Arc::new(MemoryFlagStore::with_table(table));

        let fetcher = EmailFetcher::new(DataSource::File(path), store);
        let emails = fetcher.fetch().unwrap();

        // m-1 claimed favorite+read on the wire but has no override, so
        // both flags fall back to false.
        let m1 = emails.iter().find(|e| e.id == "m-1").unwrap();
        assert!(!m1.is_favorite);
        assert!(!m1.is_read);

        let m2 = emails.iter().find(|e| e.id == "m-2").unwrap();
        assert!(m2.is_favorite);
        assert!(!m2.is_read);
    }

    #[test]
    fn partial_override_defaults_absent_fields_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, TWO_EMAILS);

        let mut table = FlagMap::new();
        table.insert("m-1".into(), FlagUpdate::read(true));
        let store = Arc::new(MemoryFlagStore::with_table(table));

        let emails = EmailFetcher::new(DataSource::File(path), store).fetch().unwrap();
        let m1 = emails.iter().find(|e| e.id == "m-1").unwrap();
        assert!(m1.is_read);
        assert!(!m1.is_favorite);
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let store = Arc::new(MemoryFlagStore::default());
        let fetcher = EmailFetcher::new(DataSource::File("/no/such/file.json".into()), store);
        let err = fetcher.fetch().unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, r#"{"not": "an array"}"#);
        let store = Arc::new(MemoryFlagStore::default());
        let err = EmailFetcher::new(DataSource::File(path), store).fetch().unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
