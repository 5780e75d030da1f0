//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_clients`] to get clients and the receiver behind them.
//! Then use helpers like [`expect_place_order`] to assert what was sent and
//! answer on the captured responder.

use tokio::sync::mpsc;

use crate::clients::StorefrontClients;
use crate::domain::{Order, OrderDraft, OrderStatus, ProductCreate, Product};
use crate::messages::{ServiceResponse, StorefrontRequest};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::reconcile::RestockReport;

/// Creates clients whose requests land on a receiver the test controls.
///
/// The test plays the service: it pulls each request off the channel, checks
/// it, and answers success or failure deterministically.
pub fn create_mock_clients(buffer_size: usize) -> (StorefrontClients, mpsc::Receiver<StorefrontRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StorefrontClients::new(sender), receiver)
}

/// Helper to verify that the next message is a PlaceOrder request
pub async fn expect_place_order(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<(OrderDraft, ServiceResponse<Order, OrderError>)> {
    match receiver.recv().await {
        Some(StorefrontRequest::PlaceOrder { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a ChangeStatus request
pub async fn expect_change_status(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<(String, OrderStatus, ServiceResponse<Order, OrderError>)> {
    match receiver.recv().await {
        Some(StorefrontRequest::ChangeStatus {
            order_number,
            status,
            respond_to,
        }) => Some((order_number, status, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a DeleteOrder request
pub async fn expect_delete_order(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<(String, ServiceResponse<Option<RestockReport>, OrderError>)> {
    match receiver.recv().await {
        Some(StorefrontRequest::DeleteOrder {
            order_number,
            respond_to,
        }) => Some((order_number, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a CreateProduct request
pub async fn expect_create_product(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<(ProductCreate, ServiceResponse<Product, ProductError>)> {
    match receiver.recv().await {
        Some(StorefrontRequest::CreateProduct { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (clients, mut receiver) = create_mock_clients(10);

        let create_task = tokio::spawn(async move {
            clients
                .products
                .create_product(ProductCreate::new("Mug", 9.5, "Kitchen", 3))
                .await
        });

        let (params, responder) = expect_create_product(&mut receiver)
            .await
            .expect("Expected CreateProduct request");
        assert_eq!(params.name, "Mug");
        responder
            .send(Ok(Product::new("P1", params.name, params.price, params.quantity)))
            .unwrap();

        let product = create_task.await.unwrap().unwrap();
        assert_eq!(product.id, "P1");
        assert_eq!(product.stock_level(), Some(3));
    }

    #[tokio::test]
    async fn test_closed_service_reports_communication_error() {
        let (clients, receiver) = create_mock_clients(1);
        drop(receiver);

        let result = clients.orders.get_order("ORD-1".to_string()).await;
        assert!(matches!(result, Err(OrderError::ActorCommunicationError(_))));
    }

    #[tokio::test]
    async fn test_dropped_responder_reports_communication_error() {
        let (clients, mut receiver) = create_mock_clients(1);

        let task = tokio::spawn(async move { clients.orders.delete_order("ORD-1".to_string()).await });

        let (order_number, responder) = expect_delete_order(&mut receiver).await.unwrap();
        assert_eq!(order_number, "ORD-1");
        drop(responder);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(OrderError::ActorCommunicationError(_))));
    }
}
