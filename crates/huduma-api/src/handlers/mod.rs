pub mod chat;
pub mod document_list;
pub mod document_upload;
