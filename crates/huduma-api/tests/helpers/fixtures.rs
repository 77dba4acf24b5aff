use axum_test::multipart::{MultipartForm, Part};

/// Smallest byte string that starts like a PDF.
pub fn minimal_pdf() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj << >> endobj\ntrailer << >>\n%%EOF\n".to_vec()
}

pub fn file_part(name: &str, mime: &str, data: Vec<u8>) -> Part {
    Part::bytes(data).file_name(name).mime_type(mime)
}

/// The form the library page submits: one file and a service label.
pub fn upload_form(name: &str, mime: &str, data: Vec<u8>, service: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("service", service)
        .add_part("file", file_part(name, mime, data))
}

pub fn pdf_form(name: &str, service: &str) -> MultipartForm {
    upload_form(name, "application/pdf", minimal_pdf(), service)
}
