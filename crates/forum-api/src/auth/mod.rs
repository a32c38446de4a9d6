pub mod jwt;
pub mod session;

pub use session::{JwtCookieSessionResolver, Session, SessionResolver, SessionUser};
