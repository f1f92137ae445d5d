//! Request gate for protected routes.
//!
//! Layers run in this order, and the first failure ends the request:
//! 1. `access::authenticate` - bearer token → verified `AuthCtx` in extensions
//! 2. `role::require_role` - route's `RolePolicy` (SuperAdmin always passes)
//! 3. `ownership::require_cart_owner` - `/cart/{id}` must belong to the caller;
//!    the loaded row is left in extensions as `OwnedCartItem`
//!
//! With `route_layer`, the layer added last runs first.

pub mod access;
pub mod ownership;
pub mod role;

pub use access::{authenticate, verify_bearer};
pub use ownership::{OwnedCartItem, ensure_owns_all, require_cart_owner};
pub use role::require_role;
