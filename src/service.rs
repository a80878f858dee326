mod aggregate;
mod annotate;
mod error;
mod headers;
mod render;
mod routes;
mod state;
mod status;
mod validate;

pub use aggregate::*;
pub use annotate::Annotator;
pub use error::ServiceError;
pub use headers::*;
pub use render::*;
pub use routes::router;
pub use state::ServiceState;
pub use status::*;
pub use validate::*;
