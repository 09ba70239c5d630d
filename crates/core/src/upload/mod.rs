//! Upload handling: which files are accepted, where they are stored and
//! how an upload becomes a catalog entry.

mod error;
mod form;
mod policy;
mod sink;

pub use error::UploadError;
pub use form::{format_file_size, UploadForm};
pub use policy::{stored_file_name, FileKind, UploadPolicy};
pub use sink::{PendingFile, StoredFile, UploadSession};
