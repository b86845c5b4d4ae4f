//! Data transfer objects for Web API.

pub mod request;
pub mod response;
pub mod validation;

pub use request::{CredentialsRequest, Pagination, PaginationQuery};
pub use response::{AddFileResponse, HealthResponse, TokenResponse};
pub use validation::ValidatedJson;
