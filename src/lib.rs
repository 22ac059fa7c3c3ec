// Library root
// -----------
// The binary (`main.rs`) wires these modules together; integration tests
// drive `api` and `pipeline` directly against a local mock server.
//
// Module responsibilities:
// - `api`: Pinata HTTP calls (file pin, JSON pin) and their wire types.
// - `pipeline`: the image-then-metadata sequence.
// - `config`: CLI / env / config file resolution and the tracing filter.
// - `error`: the `UploadError` taxonomy.
// - `ui`: spinner, prompts and the final summary.
pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ui;

pub use api::{PinResponse, PinataClient};
pub use error::{Stage, UploadError};
pub use pipeline::{AssetRequest, PinnedAsset};
