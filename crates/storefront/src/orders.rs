//! Order records, the persisted order book, and the synthetic tracking
//! timeline.
//!
//! An order is created once at checkout completion and never deleted; only
//! its status and an optional cancellation sub-record ever change. The book
//! is the global `perfume_orders` list (not per-user). Tracking is derived
//! entirely from the order's creation timestamp by fixed offsets - it is
//! presentation-only and reflects no real fulfillment system.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use essenza_core::{CartItem, OrderId, OrderStatus, PaymentMethod};

use crate::notify::{NoticeLevel, Notifier};
use crate::store::{KeyValueStore, StoreError, keys, read_json, write_json};

/// Errors from order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// No order with this ID exists.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The order is already cancelled; cancelling again is rejected.
    #[error("order {0} is already cancelled")]
    AlreadyCancelled(OrderId),

    /// The order has progressed past the cancellation window.
    #[error("order {id} cannot be cancelled (status: {status})")]
    NotCancellable { id: OrderId, status: OrderStatus },

    /// The order is in a terminal status and cannot advance.
    #[error("order {0} is in a terminal status")]
    Terminal(OrderId),

    /// The persisted store failed underneath the book.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Shipping destination snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// Cancellation sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// Free-text reason given by the user.
    pub reason: String,
    /// When the cancellation happened.
    pub cancelled_at: DateTime<Utc>,
}

/// An order: the immutable checkout snapshot plus its mutable status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    /// Cart lines snapshotted at checkout completion.
    pub items: Vec<CartItem>,
    pub shipping: ShippingAddress,
    pub payment: PaymentMethod,
    pub status: OrderStatus,
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
}

/// One stop on the synthetic tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub status: OrderStatus,
    /// When this stop is (or was) expected, derived from `created_at`.
    pub expected_at: DateTime<Utc>,
    /// Whether the stop has occurred relative to now.
    pub reached: bool,
}

/// Persisted order book over the global `perfume_orders` list.
pub struct OrderBook {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl OrderBook {
    /// Create an order book over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// All orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` on read or parse failure.
    pub fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(read_json(self.store.as_ref(), keys::ORDERS)?.unwrap_or_default())
    }

    /// The order with this ID, if any.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` on read or parse failure.
    pub fn get(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.list()?.into_iter().find(|order| &order.id == id))
    }

    /// Append a freshly created order to the book.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` if persisting fails.
    #[instrument(skip(self, order), fields(order = %order.id))]
    pub fn append(&self, order: Order) -> Result<(), OrderError> {
        let mut orders = self.list()?;
        orders.push(order);
        write_json(self.store.as_ref(), keys::ORDERS, &orders)?;
        Ok(())
    }

    /// Cancel an order with a free-text reason.
    ///
    /// Rejected once the order is already cancelled or past the cancellation
    /// window; a cancelled order can never become delivered.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound`, `OrderError::AlreadyCancelled`, or
    /// `OrderError::NotCancellable` accordingly.
    #[instrument(skip(self, reason), fields(order = %id))]
    pub fn cancel(&self, id: &OrderId, reason: &str) -> Result<Order, OrderError> {
        let mut orders = self.list()?;
        let order = orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::AlreadyCancelled(id.clone()));
        }
        if !order.status.can_cancel() {
            return Err(OrderError::NotCancellable {
                id: id.clone(),
                status: order.status,
            });
        }

        order.status = OrderStatus::Cancelled;
        order.cancellation = Some(Cancellation {
            reason: reason.to_owned(),
            cancelled_at: Utc::now(),
        });
        let cancelled = order.clone();

        write_json(self.store.as_ref(), keys::ORDERS, &orders)?;
        self.notifier
            .notify(NoticeLevel::Info, &format!("order {id} cancelled"));
        Ok(cancelled)
    }

    /// Move an order one step along the fulfillment chain (admin-lite hook).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Terminal` for delivered or cancelled orders and
    /// `OrderError::NotFound` for unknown IDs.
    #[instrument(skip(self), fields(order = %id))]
    pub fn advance_status(&self, id: &OrderId) -> Result<Order, OrderError> {
        let mut orders = self.list()?;
        let order = orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        let next = order
            .status
            .next()
            .ok_or_else(|| OrderError::Terminal(id.clone()))?;
        order.status = next;
        let advanced = order.clone();

        write_json(self.store.as_ref(), keys::ORDERS, &orders)?;
        Ok(advanced)
    }
}

/// Fixed offsets from order creation to each tracking stop.
const TIMELINE: [(OrderStatus, i64); 5] = [
    (OrderStatus::Placed, 0),
    (OrderStatus::Confirmed, 1),
    (OrderStatus::Shipped, 24),
    (OrderStatus::OutForDelivery, 72),
    (OrderStatus::Delivered, 96),
];

/// The synthetic tracking timeline for an order.
///
/// Stops are `created_at` plus fixed hour offsets; `reached` compares each
/// stop against the current time. A cancelled order's timeline truncates at
/// the cancellation: the placed stop, then a terminal cancelled event.
#[must_use]
pub fn tracking_timeline(order: &Order) -> Vec<TrackingEvent> {
    if let Some(cancellation) = &order.cancellation {
        return vec![
            TrackingEvent {
                status: OrderStatus::Placed,
                expected_at: order.created_at,
                reached: true,
            },
            TrackingEvent {
                status: OrderStatus::Cancelled,
                expected_at: cancellation.cancelled_at,
                reached: true,
            },
        ];
    }

    let now = Utc::now();
    TIMELINE
        .iter()
        .map(|&(status, hours)| {
            let expected_at = order.created_at + Duration::hours(hours);
            TrackingEvent {
                status,
                expected_at,
                reached: expected_at <= now,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use essenza_core::{CurrencyCode, Price, ProductId};

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

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::new(id),
            created_at: Utc::now(),
            items: vec![CartItem {
                id: ProductId::new("p1"),
                name: "Iris Nocturne".to_owned(),
                category: "floral".to_owned(),
                price: Price::from_major(80, CurrencyCode::USD),
                quantity: 1,
                image_url: String::new(),
            }],
            shipping: shipping(),
            payment: PaymentMethod::Card,
            status: OrderStatus::Placed,
            cancellation: None,
        }
    }

    fn book() -> OrderBook {
        OrderBook::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        )
    }

    #[test]
    fn test_append_and_get() {
        let book = book();
        book.append(order("o1")).unwrap();
        book.append(order("o2")).unwrap();

        assert_eq!(book.list().unwrap().len(), 2);
        let fetched = book.get(&OrderId::new("o1")).unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Placed);
        assert!(book.get(&OrderId::new("o3")).unwrap().is_none());
    }

    #[test]
    fn test_cancel_records_reason() {
        let book = book();
        book.append(order("o1")).unwrap();

        let cancelled = book.cancel(&OrderId::new("o1"), "changed my mind").unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(
            cancelled.cancellation.unwrap().reason,
            "changed my mind"
        );
    }

    #[test]
    fn test_cancel_is_terminal() {
        let book = book();
        book.append(order("o1")).unwrap();
        book.cancel(&OrderId::new("o1"), "first").unwrap();

        // cancelling again is rejected
        assert!(matches!(
            book.cancel(&OrderId::new("o1"), "second"),
            Err(OrderError::AlreadyCancelled(_))
        ));

        // and a cancelled order can never advance toward delivered
        assert!(matches!(
            book.advance_status(&OrderId::new("o1")),
            Err(OrderError::Terminal(_))
        ));
    }

    #[test]
    fn test_cancel_window_closes_at_shipped() {
        let book = book();
        book.append(order("o1")).unwrap();
        book.advance_status(&OrderId::new("o1")).unwrap(); // confirmed
        book.advance_status(&OrderId::new("o1")).unwrap(); // shipped

        assert!(matches!(
            book.cancel(&OrderId::new("o1"), "too late"),
            Err(OrderError::NotCancellable { .. })
        ));
    }

    #[test]
    fn test_cancel_unknown_order() {
        let book = book();
        assert!(matches!(
            book.cancel(&OrderId::new("ghost"), "?"),
            Err(OrderError::NotFound(_))
        ));
    }

    #[test]
    fn test_timeline_offsets() {
        let order = order("o1");
        let timeline = tracking_timeline(&order);

        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline[0].status, OrderStatus::Placed);
        assert!(timeline[0].reached);
        assert_eq!(
            timeline[4].expected_at - order.created_at,
            Duration::hours(96)
        );
        // delivery four days out has not happened yet
        assert!(!timeline[4].reached);
    }

    #[test]
    fn test_timeline_for_cancelled_order_truncates() {
        let book = book();
        book.append(order("o1")).unwrap();
        let cancelled = book.cancel(&OrderId::new("o1"), "no longer needed").unwrap();

        let timeline = tracking_timeline(&cancelled);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].status, OrderStatus::Cancelled);
        assert!(timeline.iter().all(|event| event.reached));
    }
}
