use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;

/// Form field carrying the job description file.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
/// Form field (repeated) carrying resume files.
pub const RESUMES_FIELD: &str = "resumes";

/// A file received from the visitor. Only the name feeds scoring; the bytes
/// are kept so the results screen can hand them back through a transient link.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// File parts of a multipart body, in arrival order, tagged with their field name.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<(String, UploadedFile)>,
}

impl UploadForm {
    /// Reads every file part. Parts without a file name are skipped: browsers
    /// send one with an empty name when the file picker was left empty.
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content = field.bytes().await?;
            if file_name.trim().is_empty() {
                continue;
            }
            form.files
                .push((field_name, UploadedFile::new(file_name, content)));
        }
        Ok(form)
    }

    /// First file sent under `field`, if any.
    pub fn take_first(&mut self, field: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|(name, _)| name == field)?;
        Some(self.files.remove(index).1)
    }

    /// All files sent under `field`, in upload order.
    pub fn take_all(&mut self, field: &str) -> Vec<UploadedFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(name, _)| name == field);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }
}
