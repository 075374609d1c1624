//! Token values issued by the Yahoo token endpoint.

pub mod record;
pub mod secret;
