//! Checkout wizard: a linear Shipping -> Payment -> Review flow.
//!
//! Validation is per-field presence checking only, done before any state
//! advances. Completing the flow snapshots the cart into a new order,
//! appends it to the order book, and clears the cart - in that order, so a
//! failed append never loses the cart.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::instrument;

use essenza_core::{CartItem, OrderId, OrderStatus, PaymentMethod, Price};

use crate::cart::CartContainer;
use crate::error::{Result, StorefrontError};
use crate::orders::{Order, OrderBook, ShippingAddress};

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
}

/// What the review step shows before the order is placed.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub items: Vec<CartItem>,
    pub shipping: ShippingAddress,
    pub payment: PaymentMethod,
    pub total_items: u32,
    pub total_price: Price,
}

/// The 3-step checkout wizard.
///
/// Steps must be completed in order; submitting out of turn is a validation
/// error. The wizard holds no store handle - it only assembles the order and
/// hands it to the [`OrderBook`] at the end.
#[derive(Debug)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    shipping: Option<ShippingAddress>,
    payment: Option<PaymentMethod>,
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutWizard {
    /// Start a fresh wizard at the shipping step.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: CheckoutStep::Shipping,
            shipping: None,
            payment: None,
        }
    }

    /// The step the wizard is currently on.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Submit the shipping form and advance to payment.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if called out of turn or if a
    /// required field is empty. No state changes on failure.
    pub fn submit_shipping(&mut self, shipping: ShippingAddress) -> Result<()> {
        if self.step != CheckoutStep::Shipping {
            return Err(step_error("shipping"));
        }
        require(&shipping.name, "name")?;
        require(&shipping.line1, "address line")?;
        require(&shipping.city, "city")?;
        require(&shipping.postal_code, "postal code")?;
        require(&shipping.phone, "phone")?;

        self.shipping = Some(shipping);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Select the payment method and advance to review.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if called out of turn.
    pub fn submit_payment(&mut self, payment: PaymentMethod) -> Result<()> {
        if self.step != CheckoutStep::Payment {
            return Err(step_error("payment"));
        }
        self.payment = Some(payment);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Assemble the review summary from the current cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if called before review or on
    /// an empty cart.
    pub fn review(&self, cart: &CartContainer) -> Result<OrderDraft> {
        let (shipping, payment) = self.review_state()?;
        if cart.is_empty() {
            return Err(StorefrontError::Validation(
                "cannot check out an empty cart".to_owned(),
            ));
        }
        Ok(OrderDraft {
            items: cart.snapshot(),
            shipping: shipping.clone(),
            payment,
            total_items: cart.total_items(),
            total_price: cart.total_price()?,
        })
    }

    /// Place the order: snapshot the cart, append to the book, clear the cart.
    ///
    /// Produces exactly one new order whose items equal the pre-checkout cart
    /// contents; the cart is empty immediately after. The wizard is consumed.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if the wizard has not reached
    /// review or the cart is empty, and `StorefrontError::Order` /
    /// `StorefrontError::Store` if persisting fails (the cart is left
    /// untouched in that case).
    #[instrument(skip(self, cart, orders))]
    pub fn place_order(self, cart: &mut CartContainer, orders: &OrderBook) -> Result<Order> {
        let (shipping, payment) = self.review_state()?;
        if cart.is_empty() {
            return Err(StorefrontError::Validation(
                "cannot check out an empty cart".to_owned(),
            ));
        }

        let order = Order {
            id: generate_order_id(),
            created_at: Utc::now(),
            items: cart.snapshot(),
            shipping: shipping.clone(),
            payment,
            status: OrderStatus::Placed,
            cancellation: None,
        };

        orders.append(order.clone())?;
        cart.clear()?;
        Ok(order)
    }

    fn review_state(&self) -> Result<(&ShippingAddress, PaymentMethod)> {
        if self.step != CheckoutStep::Review {
            return Err(step_error("review"));
        }
        match (&self.shipping, self.payment) {
            (Some(shipping), Some(payment)) => Ok((shipping, payment)),
            // unreachable once step is Review, but never panic over it
            _ => Err(step_error("review")),
        }
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(StorefrontError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn step_error(step: &str) -> StorefrontError {
    StorefrontError::Validation(format!("checkout step '{step}' is not active"))
}

/// Generate a timestamp-based order ID.
///
/// `ESZ-{unix millis}-{4 random alphanumerics}` - unique to practical
/// collision odds, not globally guaranteed.
fn generate_order_id() -> OrderId {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();
    OrderId::new(format!("ESZ-{}-{}", Utc::now().timestamp_millis(), suffix))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use essenza_core::{CurrencyCode, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            name: "Ada".to_owned(),
            line1: "1 Rose Lane".to_owned(),
            line2: None,
            city: "Grasse".to_owned(),
            postal_code: "06130".to_owned(),
            phone: "5550100".to_owned(),
        }
    }

    fn cart_item(id: &str, price_minor: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Perfume {id}"),
            category: "oud".to_owned(),
            price: Price::from_minor(price_minor, CurrencyCode::USD),
            quantity,
            image_url: String::new(),
        }
    }

    fn fixtures() -> (CartContainer, OrderBook) {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let cart = CartContainer::new(store.clone(), notifier.clone()).unwrap();
        let orders = OrderBook::new(store, notifier);
        (cart, orders)
    }

    #[test]
    fn test_checkout_snapshots_and_clears_cart() {
        let (mut cart, orders) = fixtures();
        cart.add_item(cart_item("p1", 1000, 2)).unwrap();
        cart.add_item(cart_item("p2", 500, 1)).unwrap();
        let before = cart.snapshot();

        let mut wizard = CheckoutWizard::new();
        wizard.submit_shipping(shipping()).unwrap();
        wizard.submit_payment(PaymentMethod::Card).unwrap();
        let order = wizard.place_order(&mut cart, &orders).unwrap();

        assert_eq!(order.items, before);
        assert!(cart.is_empty());
        assert_eq!(orders.list().unwrap().len(), 1);
    }

    #[test]
    fn test_steps_must_run_in_order() {
        let mut wizard = CheckoutWizard::new();
        assert!(wizard.submit_payment(PaymentMethod::Card).is_err());

        wizard.submit_shipping(shipping()).unwrap();
        // shipping step is done, resubmitting it is out of turn
        assert!(wizard.submit_shipping(shipping()).is_err());

        wizard.submit_payment(PaymentMethod::Upi).unwrap();
        assert_eq!(wizard.step(), CheckoutStep::Review);
    }

    #[test]
    fn test_presence_validation_does_not_advance() {
        let mut wizard = CheckoutWizard::new();
        let mut bad = shipping();
        bad.city = "  ".to_owned();

        let err = wizard.submit_shipping(bad).unwrap_err();
        assert!(err.to_string().contains("city"));
        assert_eq!(wizard.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let (mut cart, orders) = fixtures();
        let mut wizard = CheckoutWizard::new();
        wizard.submit_shipping(shipping()).unwrap();
        wizard.submit_payment(PaymentMethod::CashOnDelivery).unwrap();

        assert!(wizard.review(&cart).is_err());
        let wizard_err = CheckoutWizard::new().place_order(&mut cart, &orders);
        assert!(wizard_err.is_err());
        assert!(orders.list().unwrap().is_empty());
    }

    #[test]
    fn test_review_totals() {
        let (mut cart, _orders) = fixtures();
        cart.add_item(cart_item("p1", 1250, 2)).unwrap();

        let mut wizard = CheckoutWizard::new();
        wizard.submit_shipping(shipping()).unwrap();
        wizard.submit_payment(PaymentMethod::Card).unwrap();
        let draft = wizard.review(&cart).unwrap();

        assert_eq!(draft.total_items, 2);
        assert_eq!(draft.total_price.amount, Decimal::new(2500, 2));
    }

    #[test]
    fn test_order_id_shape() {
        let id = generate_order_id();
        let id = id.as_str();
        assert!(id.starts_with("ESZ-"));
        let parts: Vec<_> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 4);
    }
}
