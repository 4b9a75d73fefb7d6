use bytes::Bytes;
use engine_logging::engine_debug;

/// A file as delivered by an input event, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// An accepted image file. Only constructed by [`try_acquire`], so the MIME
/// type is always `image/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    mime_type: String,
    bytes: Bytes,
}

impl CandidateFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("input event carried no file")]
    Empty,
    #[error("unsupported file type {mime_type:?} for {name}")]
    UnsupportedFileType { name: String, mime_type: String },
}

/// Selects the first file of an input payload if it is an image.
///
/// Any further files are ignored.
pub fn try_acquire(
    files: impl IntoIterator<Item = RawFile>,
) -> Result<CandidateFile, AcquisitionError> {
    let file = files.into_iter().next().ok_or(AcquisitionError::Empty)?;
    if !is_image_mime(&file.mime_type) {
        return Err(AcquisitionError::UnsupportedFileType {
            name: file.name,
            mime_type: file.mime_type,
        });
    }
    Ok(CandidateFile {
        name: file.name,
        mime_type: file.mime_type,
        bytes: file.bytes,
    })
}

/// Like [`try_acquire`], but rejections are silent no-ops.
pub fn acquire(files: impl IntoIterator<Item = RawFile>) -> Option<CandidateFile> {
    match try_acquire(files) {
        Ok(file) => Some(file),
        Err(err) => {
            engine_debug!("Ignoring file input: {}", err);
            None
        }
    }
}

fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Hover state changes over the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
}

impl DragEvent {
    pub fn is_hovering(self) -> bool {
        matches!(self, DragEvent::Enter | DragEvent::Over)
    }
}
