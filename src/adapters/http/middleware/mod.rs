pub mod catch_panic;
pub mod request_id;

pub use catch_panic::CatchPanicMiddleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdExt, RequestIdMiddleware};
