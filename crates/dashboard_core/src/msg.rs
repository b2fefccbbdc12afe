#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file to upload.
    FileSelected(crate::SelectedFile),
    /// User clicked Upload.
    UploadClicked,
    /// User cleared the selection and the last result.
    ResetClicked,
    /// Engine finished an upload.
    UploadFinished {
        upload_id: crate::UploadId,
        result: Result<crate::UploadResponse, crate::UploadError>,
        /// Wall-clock completion time in milliseconds since the Unix epoch.
        completed_at_ms: u64,
    },
}
