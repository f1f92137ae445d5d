/*
 * Responsibility
 * - handler が受け取る型付き extractor の公開窓口
 */
mod auth_ctx;
mod json_body;
mod path_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json_body::JsonBody;
pub use path_id::*;
