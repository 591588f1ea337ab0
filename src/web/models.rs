use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};

/// The submission form. Both fields are optional at the transport level so
/// the handler can answer missing input with a rendered page instead of an
/// extractor-level 400. The image part may carry a filename; it is accepted
/// but not used.
#[derive(Debug, MultipartForm)]
pub struct InferForm {
    pub prompt: Option<Text<String>>,
    pub image: Option<Bytes>,
}
