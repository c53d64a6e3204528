//! # Mock Framework
//!
//! Stand-in for the table actor, so tests can see exactly which requests a
//! backend sends and choose the replies.
//!
//! Use [`create_mock_table`] to get a client and a receiver, hand the client
//! to [`crate::backend::MemoryBackend::new`], then answer with helpers like
//! [`expect_list`] or [`expect_update`].

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

type Reply<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a table client whose requests arrive on the returned receiver.
pub fn create_mock_table<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a List request.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Reply<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Reply<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Next message must be an Update request.
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request.
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, BackendError, MemoryBackend};
    use crate::domain::{Customer, Order};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_mock_table() {
        let (table, mut receiver) = create_mock_table::<Order>(10);
        let backend = MemoryBackend::new(table);

        let list_task = tokio::spawn(async move { backend.list_orders().await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        responder
            .send(Ok(vec![Order::new("1", "NAT-1", Customer::Natura, date, 1, 1)]))
            .unwrap();

        let result = list_task.await.unwrap().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].identifier, "NAT-1");
    }

    #[tokio::test]
    async fn test_mock_table_failure_maps_to_backend_error() {
        let (table, mut receiver) = create_mock_table::<Order>(10);
        let backend = MemoryBackend::new(table);

        let delete_task = tokio::spawn(async move { backend.delete_order("7").await });

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, "7");
        responder.send(Err(FrameworkError::NotFound(id))).unwrap();

        assert_eq!(
            delete_task.await.unwrap(),
            Err(BackendError::NotFound("7".to_string()))
        );
    }
}
