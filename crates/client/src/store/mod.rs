//! Client-side state stores.
//!
//! - [`cart`] - device-local shopping cart with a durable snapshot
//! - [`wishlist`] - per-user wishlist cached from the backend
//! - [`persist`] - durable local storage backends and the
//!   recently-viewed list

pub mod cart;
pub mod persist;
pub mod wishlist;

pub use cart::CartStore;
pub use persist::{FileStorage, MemoryStorage, RecentlyViewed, StorageBackend};
pub use wishlist::{AuthSession, EntryState, WishlistError, WishlistStore};
