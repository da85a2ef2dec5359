//! # Checkout
//!
//! A three-state workflow over the session cart:
//!
//! ```text
//!            submit (COD)
//!   Form ─────────────────────────────────▶ Success
//!     │                                        ▲   │
//!     │ submit (BankTransfer)   confirm_payment│   │ restart (cart not empty)
//!     ▼                                        │   ▼
//!   PaymentDetails ────────────────────────────┘  Form
//! ```
//!
//! - **Form**: the buyer's details are validated and the order is submitted. Nothing is
//!   submitted while a field is invalid or the cart is empty.
//! - **PaymentDetails**: the order exists and the buyer is shown where to transfer the money.
//!   The cart is kept until the buyer confirms the transfer; nothing verifies it.
//! - **Success**: the order exists and the cart is empty.
//!
//! Only a created order clears the cart. A failed submission leaves both the cart and the
//! state as they were.

pub mod adapter;
pub mod payment;
pub mod validation;

pub use adapter::OrderSubmissionAdapter;
pub use payment::{amount_to_pay, transfer_memo, PaymentReference};
pub use validation::{validate_customer, CheckoutField, FieldErrors};

use crate::backend::SubmissionError;
use crate::cart_actor::CartError;
use crate::clients::CartClient;
use crate::config::PaymentConfig;
use crate::model::{CheckoutDraft, PaymentMethod, SubmittedOrder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Form,
    PaymentDetails {
        order: SubmittedOrder,
        reference: PaymentReference,
    },
    Success {
        order: SubmittedOrder,
    },
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Form => "Form",
            CheckoutState::PaymentDetails { .. } => "PaymentDetails",
            CheckoutState::Success { .. } => "Success",
        }
    }

    pub fn order(&self) -> Option<&SubmittedOrder> {
        match self {
            CheckoutState::Form => None,
            CheckoutState::PaymentDetails { order, .. } | CheckoutState::Success { order } => {
                Some(order)
            }
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// Nothing to check out; send the buyer back to shopping.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Checkout form is invalid: {0}")]
    Validation(FieldErrors),

    #[error("An order is already being submitted")]
    SubmissionInFlight,

    #[error("Cannot {action} while in {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Clears the in-flight flag however the submission ends, including cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::SubmissionInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CheckoutOrchestrator {
    cart: CartClient,
    adapter: OrderSubmissionAdapter,
    payment: PaymentConfig,
    user_id: Option<String>,
    state: Mutex<CheckoutState>,
    in_flight: AtomicBool,
}

impl CheckoutOrchestrator {
    pub fn new(cart: CartClient, adapter: OrderSubmissionAdapter, payment: PaymentConfig) -> Self {
        Self {
            cart,
            adapter,
            payment,
            user_id: None,
            state: Mutex::new(CheckoutState::Form),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Attaches orders to an identified user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn transition(&self, to: CheckoutState) -> CheckoutState {
        let mut state = self.lock();
        info!(from = state.name(), to = to.name(), "Checkout transition");
        *state = to.clone();
        to
    }

    fn require_state(&self, action: &'static str, expected: &'static str) -> Result<(), CheckoutError> {
        let state = self.lock().name();
        if state == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidState { action, state })
        }
    }

    /// Validates the form and submits the order for the current cart.
    ///
    /// Cash on delivery clears the cart and ends in `Success`. Bank transfer keeps the cart
    /// and moves to `PaymentDetails`.
    #[instrument(name = "submit", skip(self, draft), fields(method = %draft.payment_method))]
    pub async fn submit(&self, draft: &CheckoutDraft) -> Result<CheckoutState, CheckoutError> {
        self.require_state("submit", "Form")?;
        let _guard = InFlight::acquire(&self.in_flight)?;

        let cart = self.cart.snapshot().await?;
        if cart.is_empty() {
            warn!("Checkout attempted with an empty cart");
            return Err(CheckoutError::EmptyCart);
        }
        validate_customer(&draft.customer).map_err(CheckoutError::Validation)?;

        let total = cart.total_price();
        let amount = amount_to_pay(
            total,
            draft.payment_method,
            draft.transfer_option,
            self.payment.deposit_percentage,
        );
        let order_draft = OrderSubmissionAdapter::build_draft(
            &cart.lines,
            draft,
            amount,
            self.user_id.clone(),
        );

        let order = self.adapter.submit(order_draft).await?;
        info!(order_id = %order.id, total, amount_to_pay = amount, "Order accepted");

        let next = match draft.payment_method {
            PaymentMethod::Cod => {
                self.clear_cart_after(&order).await;
                CheckoutState::Success { order }
            }
            PaymentMethod::BankTransfer => {
                let reference = PaymentReference::for_order(&order, &self.payment);
                CheckoutState::PaymentDetails { order, reference }
            }
        };
        Ok(self.transition(next))
    }

    /// The buyer says the transfer is done. Not verified.
    #[instrument(skip(self))]
    pub async fn confirm_payment(&self) -> Result<CheckoutState, CheckoutError> {
        let order = match &*self.lock() {
            CheckoutState::PaymentDetails { order, .. } => order.clone(),
            other => {
                return Err(CheckoutError::InvalidState {
                    action: "confirm payment",
                    state: other.name(),
                })
            }
        };
        self.cart.clear().await?;
        info!(order_id = %order.id, "Transfer confirmed by buyer");
        Ok(self.transition(CheckoutState::Success { order }))
    }

    /// Back to a fresh form after a finished checkout. The cart must have something in it.
    #[instrument(skip(self))]
    pub async fn restart(&self) -> Result<CheckoutState, CheckoutError> {
        self.require_state("restart", "Success")?;
        if self.cart.snapshot().await?.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(self.transition(CheckoutState::Form))
    }

    /// The order is already created; a failed clear is logged, not returned.
    async fn clear_cart_after(&self, order: &SubmittedOrder) {
        if let Err(e) = self.cart.clear().await {
            warn!(order_id = %order.id, error = %e, "Cart not cleared after order");
        }
    }
}
