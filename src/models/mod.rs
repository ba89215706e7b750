pub mod artifact;
pub mod form;
pub mod request;

pub use artifact::*;
pub use form::*;
pub use request::*;
