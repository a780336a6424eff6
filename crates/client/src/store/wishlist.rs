//! The per-user wishlist store.
//!
//! The backend owns the wishlist; this store is a read cache with
//! optimistic local mutation. It is reloaded in full whenever the
//! authenticated identity changes (sign-in fetches, sign-out clears
//! with no remote call) and never persisted locally.
//!
//! Each entry moves through a small state machine - absent,
//! pending-add, present, pending-remove - so in-flight races (a
//! double-clicked add) are observable and testable rather than
//! fire-and-forget. The write lock is held only across state
//! transitions, never across a remote call.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::RwLock;

use quickcart_core::{ProductId, UserId, WishlistItem};

use crate::api::{ApiError, WishlistApi};

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The operation needs a signed-in user. Raised synchronously,
    /// before any network call; the caller should prompt sign-in.
    #[error("Sign in to use the wishlist")]
    AuthRequired,

    /// The remote call failed; local state was left consistent.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// An authenticated user's session handle.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The signed-in user.
    pub user_id: UserId,
    /// Bearer token for wishlist/order/review calls.
    pub token: SecretString,
}

impl AuthSession {
    /// Create a session from a user id and bearer token.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: SecretString::from(token.into()),
        }
    }
}

/// Where a product currently sits in the wishlist lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Not wishlisted and no operation in flight.
    Absent,
    /// An add has been dispatched but not yet confirmed.
    PendingAdd,
    /// Confirmed present in the local cache.
    Present,
    /// A remove (or move-to-cart) is in flight.
    PendingRemove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    Add,
    Remove,
}

#[derive(Default)]
struct WishlistState {
    session: Option<AuthSession>,
    items: Vec<WishlistItem>,
    pending: HashMap<ProductId, PendingOp>,
}

/// Shared handle to the session's wishlist cache.
///
/// Generic over the [`WishlistApi`] seam so it can be exercised against
/// a stub backend. Cheap to clone; all clones share state.
pub struct WishlistStore<W: WishlistApi> {
    inner: Arc<WishlistInner<W>>,
}

impl<W: WishlistApi> Clone for WishlistStore<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct WishlistInner<W> {
    api: W,
    state: RwLock<WishlistState>,
}

impl<W: WishlistApi> WishlistStore<W> {
    /// Create an empty, signed-out wishlist store.
    #[must_use]
    pub fn new(api: W) -> Self {
        Self {
            inner: Arc::new(WishlistInner {
                api,
                state: RwLock::new(WishlistState::default()),
            }),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Sign a user in and load their wishlist from the backend.
    ///
    /// The session is kept even if the initial fetch fails (the items
    /// stay empty and the error is rethrown; a later
    /// [`WishlistStore::refresh_wishlist`] can retry).
    ///
    /// # Errors
    ///
    /// Returns an error if the initial wishlist fetch fails.
    pub async fn sign_in(&self, session: AuthSession) -> Result<(), WishlistError> {
        {
            let mut state = self.inner.state.write().await;
            state.session = Some(session);
            state.items.clear();
            state.pending.clear();
        }
        self.refresh_wishlist().await
    }

    /// Sign out: drop the session and the cached items. No remote call.
    pub async fn sign_out(&self) {
        let mut state = self.inner.state.write().await;
        state.session = None;
        state.items.clear();
        state.pending.clear();
    }

    /// The signed-in user, if any.
    pub async fn session_user(&self) -> Option<UserId> {
        let state = self.inner.state.read().await;
        state.session.as_ref().map(|s| s.user_id.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the wishlist.
    ///
    /// Without a signed-in user this fails with
    /// [`WishlistError::AuthRequired`] and performs no network call.
    /// While an add for the same product is already in flight, further
    /// adds are a no-op. On remote success the returned entry is
    /// prepended to the local cache; on failure the local state is left
    /// unchanged and the error is rethrown.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or the remote failure.
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), WishlistError> {
        let (user_id, token) = {
            let mut state = self.inner.state.write().await;
            let Some(session) = &state.session else {
                return Err(WishlistError::AuthRequired);
            };
            if state.pending.get(product_id) == Some(&PendingOp::Add) {
                return Ok(());
            }
            let creds = (session.user_id.clone(), session.token.clone());
            state.pending.insert(product_id.clone(), PendingOp::Add);
            creds
        };

        let result = self.inner.api.add_wishlist_item(&token, product_id).await;

        let mut state = self.inner.state.write().await;
        state.pending.remove(product_id);
        match result {
            Ok(item) => {
                // Discard stale completions after an identity change.
                if state.session.as_ref().is_some_and(|s| s.user_id == user_id) {
                    state.items.retain(|i| i.product.id != *product_id);
                    state.items.insert(0, item);
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a product from the wishlist.
    ///
    /// Without a signed-in user this silently no-ops (deliberately
    /// different from add, which fails loudly). On remote success the
    /// entry is filtered out of the local cache; remote errors are
    /// rethrown.
    ///
    /// # Errors
    ///
    /// Returns the remote failure, if any.
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), WishlistError> {
        let Some((user_id, token)) = self.begin_removal(product_id).await else {
            return Ok(());
        };

        let result = self.inner.api.remove_wishlist_item(&token, product_id).await;
        self.finish_removal(product_id, &user_id, result).await
    }

    /// Move a wishlist entry into the cart.
    ///
    /// Calls the backend's move-to-cart and removes the entry from the
    /// local cache. This store does NOT add the product to the local
    /// [`CartStore`](crate::store::CartStore); whether the call site
    /// also does so is its own explicit contract.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or the remote failure.
    pub async fn move_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), WishlistError> {
        let (user_id, token) = self.require_session().await?;
        {
            let mut state = self.inner.state.write().await;
            state.pending.insert(product_id.clone(), PendingOp::Remove);
        }

        let result = self
            .inner
            .api
            .move_wishlist_item_to_cart(&token, product_id, quantity)
            .await;
        self.finish_removal(product_id, &user_id, result).await
    }

    /// Remove every entry from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or the remote failure.
    pub async fn clear_wishlist(&self) -> Result<(), WishlistError> {
        let (user_id, token) = self.require_session().await?;

        self.inner.api.clear_wishlist(&token).await?;

        let mut state = self.inner.state.write().await;
        if state.session.as_ref().is_some_and(|s| s.user_id == user_id) {
            state.items.clear();
            state.pending.clear();
        }
        Ok(())
    }

    /// Reload the wishlist from the backend, replacing the local cache
    /// wholesale.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or the remote failure.
    pub async fn refresh_wishlist(&self) -> Result<(), WishlistError> {
        let (user_id, token) = self.require_session().await?;

        let items = self.inner.api.fetch_wishlist(&token).await?;

        let mut state = self.inner.state.write().await;
        if state.session.as_ref().is_some_and(|s| s.user_id == user_id) {
            state.items = items;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether a product is in the local wishlist cache.
    pub async fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        let state = self.inner.state.read().await;
        state.items.iter().any(|i| i.product.id == *product_id)
    }

    /// The lifecycle state of a product's wishlist entry.
    pub async fn entry_state(&self, product_id: &ProductId) -> EntryState {
        let state = self.inner.state.read().await;
        match state.pending.get(product_id) {
            Some(PendingOp::Add) => EntryState::PendingAdd,
            Some(PendingOp::Remove) => EntryState::PendingRemove,
            None if state.items.iter().any(|i| i.product.id == *product_id) => EntryState::Present,
            None => EntryState::Absent,
        }
    }

    /// A cloned snapshot of the cached wishlist entries.
    pub async fn items(&self) -> Vec<WishlistItem> {
        let state = self.inner.state.read().await;
        state.items.clone()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Session handle or `AuthRequired`.
    async fn require_session(&self) -> Result<(UserId, SecretString), WishlistError> {
        let state = self.inner.state.read().await;
        state
            .session
            .as_ref()
            .map(|s| (s.user_id.clone(), s.token.clone()))
            .ok_or(WishlistError::AuthRequired)
    }

    /// Start a removal: `None` means signed out or already pending
    /// (silent no-op), `Some` marks the entry pending-remove.
    async fn begin_removal(&self, product_id: &ProductId) -> Option<(UserId, SecretString)> {
        let mut state = self.inner.state.write().await;
        let session = state.session.as_ref()?;
        if state.pending.get(product_id) == Some(&PendingOp::Remove) {
            return None;
        }
        let handle = (session.user_id.clone(), session.token.clone());
        state.pending.insert(product_id.clone(), PendingOp::Remove);
        Some(handle)
    }

    /// Finish a removal: clear pending, filter the item on success.
    async fn finish_removal(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
        result: Result<(), ApiError>,
    ) -> Result<(), WishlistError> {
        let mut state = self.inner.state.write().await;
        state.pending.remove(product_id);
        match result {
            Ok(()) => {
                if state.session.as_ref().is_some_and(|s| &s.user_id == user_id) {
                    state.items.retain(|i| i.product.id != *product_id);
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use tokio::sync::Semaphore;

    use quickcart_core::{Price, WishlistItemId, WishlistProduct};

    fn entry(user: &str, product: &str) -> WishlistItem {
        WishlistItem {
            id: WishlistItemId::new(format!("wl-{product}")),
            user_id: UserId::new(user),
            product: WishlistProduct {
                id: ProductId::new(product),
                name: format!("Product {product}"),
                price: Price::from_major(1000),
                sale_price: None,
                image: None,
                stock: 5,
            },
            created_at: Utc::now(),
        }
    }

    /// Stub backend: counts calls, optionally fails adds, optionally
    /// parks adds on a gate so pending states are observable.
    #[derive(Clone, Default)]
    struct StubApi {
        calls: Arc<AtomicUsize>,
        initial: Vec<WishlistItem>,
        fail_add: bool,
        add_gate: Option<Arc<Semaphore>>,
    }

    impl WishlistApi for StubApi {
        async fn fetch_wishlist(
            &self,
            _token: &SecretString,
        ) -> Result<Vec<WishlistItem>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.initial.clone())
        }

        async fn add_wishlist_item(
            &self,
            _token: &SecretString,
            product_id: &ProductId,
        ) -> Result<WishlistItem, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.add_gate {
                gate.acquire().await.unwrap().forget();
            }
            if self.fail_add {
                return Err(ApiError::Status {
                    status: 500,
                    message: "backend down".to_string(),
                });
            }
            Ok(entry("u-1", product_id.as_str()))
        }

        async fn remove_wishlist_item(
            &self,
            _token: &SecretString,
            _product_id: &ProductId,
        ) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn clear_wishlist(&self, _token: &SecretString) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn move_wishlist_item_to_cart(
            &self,
            _token: &SecretString,
            _product_id: &ProductId,
            _quantity: u32,
        ) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn session() -> AuthSession {
        AuthSession::new("u-1", "tok-abc123")
    }

    #[tokio::test]
    async fn test_add_without_auth_fails_before_network() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = WishlistStore::new(StubApi {
            calls: Arc::clone(&calls),
            ..StubApi::default()
        });

        let err = store
            .add_to_wishlist(&ProductId::new("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WishlistError::AuthRequired));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(store.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_without_auth_is_silent_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = WishlistStore::new(StubApi {
            calls: Arc::clone(&calls),
            ..StubApi::default()
        });

        store
            .remove_from_wishlist(&ProductId::new("p1"))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_in_loads_wishlist() {
        let store = WishlistStore::new(StubApi {
            initial: vec![entry("u-1", "p1"), entry("u-1", "p2")],
            ..StubApi::default()
        });

        store.sign_in(session()).await.unwrap();
        assert_eq!(store.items().await.len(), 2);
        assert!(store.is_in_wishlist(&ProductId::new("p1")).await);
    }

    #[tokio::test]
    async fn test_sign_out_clears_without_remote_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = WishlistStore::new(StubApi {
            calls: Arc::clone(&calls),
            initial: vec![entry("u-1", "p1")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();
        let after_sign_in = calls.load(Ordering::SeqCst);

        store.sign_out().await;
        assert!(store.items().await.is_empty());
        assert!(store.session_user().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), after_sign_in);
    }

    #[tokio::test]
    async fn test_add_prepends_remote_entry() {
        let store = WishlistStore::new(StubApi {
            initial: vec![entry("u-1", "p1")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();

        store.add_to_wishlist(&ProductId::new("p2")).await.unwrap();
        let items = store.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product.id, ProductId::new("p2"));
        assert_eq!(
            store.entry_state(&ProductId::new("p2")).await,
            EntryState::Present
        );
    }

    #[tokio::test]
    async fn test_add_failure_leaves_state_unchanged() {
        let store = WishlistStore::new(StubApi {
            fail_add: true,
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();

        let err = store
            .add_to_wishlist(&ProductId::new("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WishlistError::Api(_)));
        assert!(!store.is_in_wishlist(&ProductId::new("p1")).await);
        assert_eq!(
            store.entry_state(&ProductId::new("p1")).await,
            EntryState::Absent
        );
    }

    #[tokio::test]
    async fn test_double_click_add_is_single_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));
        let store = WishlistStore::new(StubApi {
            calls: Arc::clone(&calls),
            add_gate: Some(Arc::clone(&gate)),
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();
        let fetch_calls = calls.load(Ordering::SeqCst);

        let p1 = ProductId::new("p1");
        let first = tokio::spawn({
            let store = store.clone();
            let p1 = p1.clone();
            async move { store.add_to_wishlist(&p1).await }
        });
        tokio::task::yield_now().await;

        // First add is parked on the gate: visible as pending.
        assert_eq!(store.entry_state(&p1).await, EntryState::PendingAdd);

        // Second click is a no-op while the first is in flight.
        store.add_to_wishlist(&p1).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), fetch_calls + 1);

        gate.add_permits(1);
        first.await.unwrap().unwrap();
        assert_eq!(store.entry_state(&p1).await, EntryState::Present);
    }

    #[tokio::test]
    async fn test_remove_filters_local_state() {
        let store = WishlistStore::new(StubApi {
            initial: vec![entry("u-1", "p1"), entry("u-1", "p2")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();

        store
            .remove_from_wishlist(&ProductId::new("p1"))
            .await
            .unwrap();
        assert!(!store.is_in_wishlist(&ProductId::new("p1")).await);
        assert!(store.is_in_wishlist(&ProductId::new("p2")).await);
    }

    #[tokio::test]
    async fn test_move_to_cart_removes_locally_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = WishlistStore::new(StubApi {
            calls: Arc::clone(&calls),
            initial: vec![entry("u-1", "p1")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();
        let before = calls.load(Ordering::SeqCst);

        store.move_to_cart(&ProductId::new("p1"), 1).await.unwrap();
        assert!(!store.is_in_wishlist(&ProductId::new("p1")).await);
        assert_eq!(calls.load(Ordering::SeqCst), before + 1);
    }

    #[tokio::test]
    async fn test_move_to_cart_without_auth_requires_sign_in() {
        let store = WishlistStore::new(StubApi::default());
        let err = store
            .move_to_cart(&ProductId::new("p1"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, WishlistError::AuthRequired));
    }

    #[tokio::test]
    async fn test_clear_wishlist_empties_local_state() {
        let store = WishlistStore::new(StubApi {
            initial: vec![entry("u-1", "p1"), entry("u-1", "p2")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();

        store.clear_wishlist().await.unwrap();
        assert!(store.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let store = WishlistStore::new(StubApi {
            initial: vec![entry("u-1", "p1")],
            ..StubApi::default()
        });
        store.sign_in(session()).await.unwrap();
        store.add_to_wishlist(&ProductId::new("p9")).await.unwrap();
        assert_eq!(store.items().await.len(), 2);

        // Refresh goes back to server truth.
        store.refresh_wishlist().await.unwrap();
        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, ProductId::new("p1"));
    }
}
