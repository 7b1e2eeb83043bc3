pub mod session;

pub use session::session_from_headers;
