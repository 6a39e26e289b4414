// src/engine/digest.rs

/// Remembers the last progress digest so it is only emitted on change.
#[derive(Debug, Default, Clone)]
pub struct ProgressDigest {
    last: Option<String>,
}

impl ProgressDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `digest` and return it if it differs from the previous one.
    pub fn observe(&mut self, digest: String) -> Option<&str> {
        if self.last.as_deref() == Some(digest.as_str()) {
            return None;
        }
        self.last = Some(digest);
        self.last.as_deref()
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_only_on_change() {
        let mut digest = ProgressDigest::new();
        assert_eq!(digest.observe(".w".to_string()), Some(".w"));
        assert_eq!(digest.observe(".w".to_string()), None);
        assert_eq!(digest.observe("Rw".to_string()), Some("Rw"));
        assert_eq!(digest.observe("Rw".to_string()), None);
        assert_eq!(digest.last(), Some("Rw"));
    }

    #[test]
    fn empty_digest_is_emitted_once() {
        let mut digest = ProgressDigest::new();
        assert_eq!(digest.observe(String::new()), Some(""));
        assert_eq!(digest.observe(String::new()), None);
    }
}
