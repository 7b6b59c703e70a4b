//! Client side of the ship image classifier: file acquisition and
//! validation, the request to the prediction service and the projection of
//! its verdict onto the page.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod render;
pub mod result;

pub use backend::{Backend, BackendReply, HttpBackend};
pub use config::ClientConfig;
pub use controller::{
    Disposition, DragEvent, PendingRequest, PreviewRequest, Screen, UiState, UploadController,
};
pub use error::ClassifyError;
pub use file::{FileCandidate, MAX_UPLOAD_BYTES, SelectedFile, validate};
pub use render::{PredictionBar, ResultPanel};
pub use result::{ClassificationResult, ErrorBody, ShipDescription};
