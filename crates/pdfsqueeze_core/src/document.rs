use std::fmt;

use bytes::Bytes;
use sha2::{Digest, Sha256};

/// Identity token of an upload: SHA-256 over the file name and content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight hex digits, enough to tell uploads apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }

    fn fingerprint(file_name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((file_name.len() as u64).to_le_bytes());
        hasher.update(file_name.as_bytes());
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            use std::fmt::Write;
            let _ = write!(&mut hex, "{byte:02x}");
        }
        Self(hex)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    id: DocumentId,
    file_name: String,
    bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let bytes = bytes.into();
        let id = DocumentId::fingerprint(&file_name, &bytes);
        Self {
            id,
            file_name,
            bytes,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Name as supplied by the browser. Never passed to the compression tool.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_name_and_content() {
        let a = UploadedDocument::new("a.pdf", &b"%PDF-1.4 one"[..]);
        let same = UploadedDocument::new("a.pdf", &b"%PDF-1.4 one"[..]);
        let renamed = UploadedDocument::new("b.pdf", &b"%PDF-1.4 one"[..]);
        let edited = UploadedDocument::new("a.pdf", &b"%PDF-1.4 two"[..]);

        assert_eq!(a.id(), same.id());
        assert_ne!(a.id(), renamed.id());
        assert_ne!(a.id(), edited.id());
        assert_eq!(a.id().as_str().len(), 64);
        assert_eq!(a.id().short().len(), 8);
    }

    #[test]
    fn name_and_content_boundary_is_unambiguous() {
        let left = UploadedDocument::new("ab", &b"c"[..]);
        let right = UploadedDocument::new("a", &b"bc"[..]);
        assert_ne!(left.id(), right.id());
    }
}
