//! Order creation and payment handoff endpoints.

use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

use quickcart_core::{NewOrder, Order, OrderId, PaymentSession};

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct InitializePaymentBody<'a> {
    order_id: &'a OrderId,
}

impl ApiClient {
    /// Create an order from a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, order), fields(lines = order.lines.len()))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        order: &NewOrder,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint("orders")?;
        self.send_json(Self::authorize(self.http().post(url), token).json(order))
            .await
    }

    /// Initialize payment for an order.
    ///
    /// Returns a [`PaymentSession`] whose `authorization_url` the UI
    /// redirects to. Runs under the shorter payment timeout so a hung
    /// provider surfaces as [`ApiError::Timeout`], which the UI renders
    /// as a retry-capable message distinct from generic failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or times out.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn initialize_payment(
        &self,
        token: &SecretString,
        order_id: &OrderId,
    ) -> Result<PaymentSession, ApiError> {
        let url = self.endpoint("payments/initialize")?;
        let request = Self::authorize(self.payment_http().post(url), token)
            .json(&InitializePaymentBody { order_id });
        self.send_json(request).await
    }
}
