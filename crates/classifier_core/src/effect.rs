use crate::{CandidateFile, ImageId, RequestToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A file was selected; the driver answers with `Msg::DispatchReady`.
    DispatchClassification { image_id: ImageId },
    /// Send the file to the remote classifier under `token`.
    Classify {
        token: RequestToken,
        image_id: ImageId,
        file: CandidateFile,
    },
    /// The session no longer owns this image; free any preview resource.
    ReleaseImage { image_id: ImageId },
}
