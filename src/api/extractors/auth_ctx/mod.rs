/*!
 * Verified caller of a permission-gated request
 *
 * - types: AuthCtx (subject, permissions, 検証済み claims)
 * - core: handler 用 extractor (axum 依存はここだけ)
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
