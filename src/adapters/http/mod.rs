//! HTTP adapters - REST API implementations.
//!
//! - `login` - `POST /login`
//! - `submission` - `POST /upload`, `POST /pdf`, `POST /avisos`
//! - `multipart` - schema-driven body decoding shared by the submission routes
//! - `envelope` - the `{ok, message, payload}` body every write endpoint returns

mod envelope;
pub mod login;
pub mod multipart;
mod router;
pub mod submission;

pub use envelope::ResultEnvelope;
pub use login::{login_routes, LoginHandlers};
pub use multipart::{ParseError, UploadLimits};
pub use router::{app_router, RouterConfig};
pub use submission::{submission_routes, SubmissionHandlers};
