//! Transport-neutral `multipart/form-data` body.

use bytes::Bytes;
use mime::Mime;

/// An uploaded file as picked in the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Mime,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartPart {
    Text(String),
    File(FileUpload),
}

/// Ordered list of named parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<(String, MultipartPart)>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_owned(), MultipartPart::Text(value.into())));
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file: FileUpload) -> Self {
        self.parts.push((name.to_owned(), MultipartPart::File(file)));
        self
    }

    pub fn parts(&self) -> impl Iterator<Item = (&str, &MultipartPart)> {
        self.parts.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// First text part named `name`.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, p)| match p {
            MultipartPart::Text(v) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    /// First file part named `name`.
    #[must_use]
    pub fn get_file(&self, name: &str) -> Option<&FileUpload> {
        self.parts.iter().find_map(|(n, p)| match p {
            MultipartPart::File(f) if n == name => Some(f),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
