#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the file to the processing endpoint.
    SubmitUpload {
        upload_id: crate::UploadId,
        file: crate::SelectedFile,
    },
    /// The embed reference changed; the host must load it.
    ReloadEmbed { reference: crate::EmbedReference },
}
