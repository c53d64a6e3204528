#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;
    use tokio::sync::{broadcast, mpsc};

    use crate::actor_framework::{FrameworkError, ResourceRequest};
    use crate::backend::{Backend, BackendError, MemoryBackend};
    use crate::board::notice::{self, Notice};
    use crate::board::{BoardService, FormField, View};
    use crate::clients::Dashboard;
    use crate::domain::{
        Credentials, Customer, Order, OrderInsert, OrderPatch, Session, SessionUser,
    };
    use crate::error::{BoardError, FormError};
    use crate::filter::{ActiveFilter, OrderFilter};
    use crate::mock_framework::{
        create_mock_table, expect_create, expect_delete, expect_list, expect_update,
    };

    const EMAIL: &str = "admin@example.com";
    const PASSWORD: &str = "secret";

    type Table = mpsc::Receiver<ResourceRequest<Order>>;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
    }

    fn rows() -> Vec<Order> {
        vec![
            Order::new("1", "NAT-001", Customer::Natura, date(), 2, 5),
            Order::new("2", "AVON-002", Customer::Avon, date(), 1, 1),
        ]
    }

    fn dashboard_over<B: Backend>(backend: B) -> (Dashboard<B>, broadcast::Receiver<Notice>) {
        let (service, board) = BoardService::new(10);
        tokio::spawn(service.run());
        let (notices, notice_rx) = broadcast::channel(16);
        (Dashboard::new(Arc::new(backend), board, notices), notice_rx)
    }

    fn setup() -> (Dashboard<MemoryBackend>, Table, broadcast::Receiver<Notice>) {
        let (table, table_rx) = create_mock_table::<Order>(10);
        let backend = MemoryBackend::new(table).with_account(EMAIL, PASSWORD);
        let (dashboard, notice_rx) = dashboard_over(backend);
        (dashboard, table_rx, notice_rx)
    }

    /// Memory backend whose sign-out call always fails.
    struct SignOutFails(MemoryBackend);

    impl Backend for SignOutFails {
        async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
            self.0.list_orders().await
        }

        async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<(), BackendError> {
            self.0.update_order(id, patch).await
        }

        async fn insert_order(&self, row: OrderInsert) -> Result<(), BackendError> {
            self.0.insert_order(row).await
        }

        async fn delete_order(&self, id: &str) -> Result<(), BackendError> {
            self.0.delete_order(id).await
        }

        async fn current_session(&self) -> Result<Option<Session>, BackendError> {
            self.0.current_session().await
        }

        async fn sign_in(&self, credentials: Credentials) -> Result<Session, BackendError> {
            self.0.sign_in(credentials).await
        }

        async fn sign_out(&self) -> Result<(), BackendError> {
            Err(BackendError::Network("Cannot reach backend".to_string()))
        }
    }

    /// Start the dashboard, answering the initial fetch with `orders`.
    async fn started(dashboard: &Dashboard<MemoryBackend>, table: &mut Table, orders: Vec<Order>) {
        let d = dashboard.clone();
        let task = tokio::spawn(async move { d.start().await });
        let responder = expect_list(table).await.expect("Expected initial List");
        responder.send(Ok(orders)).unwrap();
        assert_eq!(task.await.unwrap(), Ok(View::PublicList));
    }

    async fn signed_in(dashboard: &Dashboard<MemoryBackend>) {
        dashboard.show_login().await.unwrap();
        assert_eq!(dashboard.login(EMAIL, PASSWORD).await, Ok(View::AdminPanel));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        let hits = dashboard.search("nat").await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        // The query is kept as typed; uppercasing is only for display.
        assert_eq!(
            dashboard.snapshot().await.unwrap().filter,
            ActiveFilter::Search("nat".to_string())
        );

        let all = dashboard.clear_search().await.unwrap();
        assert_eq!(all, rows());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let (dashboard, mut table, mut notices) = setup();

        // First fetch fails: the board leaves Loading with an empty list
        let d = dashboard.clone();
        let task = tokio::spawn(async move { d.start().await });
        let responder = expect_list(&mut table).await.expect("Expected initial List");
        responder.send(Err(FrameworkError::Rejected("offline".to_string()))).unwrap();
        assert_eq!(task.await.unwrap(), Ok(View::PublicList));
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::FETCH_FAILED));
        assert!(dashboard.snapshot().await.unwrap().orders.is_empty());

        // A later fetch succeeds, then another fails: the rows stay put
        let d = dashboard.clone();
        let task = tokio::spawn(async move { d.refresh().await });
        expect_list(&mut table).await.expect("Expected List").send(Ok(rows())).unwrap();
        assert_eq!(task.await.unwrap(), Ok(2));

        let d = dashboard.clone();
        let task = tokio::spawn(async move { d.refresh().await });
        let responder = expect_list(&mut table).await.expect("Expected List");
        responder.send(Err(FrameworkError::Rejected("offline".to_string()))).unwrap();
        assert_eq!(
            task.await.unwrap(),
            Err(BoardError::Backend(BackendError::Rejected("offline".to_string())))
        );
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::FETCH_FAILED));

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.view, View::PublicList);
        assert_eq!(snapshot.orders, rows());
    }

    #[tokio::test]
    async fn test_toggle_flow() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        let d = dashboard.clone();
        let toggle_task = tokio::spawn(async move { d.toggle_arrival("1").await });

        // Expect the flag update, and nothing else in the patch
        let (id, patch, responder) = expect_update(&mut table).await.expect("Expected Update");
        assert_eq!(id, "1");
        assert_eq!(patch, OrderPatch::arrival(true));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "chegou_na_base": true })
        );
        let updated = rows()[0].clone().with_arrived(true);
        responder.send(Ok(updated.clone())).unwrap();

        // Expect the refetch
        let responder = expect_list(&mut table).await.expect("Expected refetch");
        responder.send(Ok(vec![updated, rows()[1].clone()])).unwrap();

        assert_eq!(toggle_task.await.unwrap(), Ok(()));
        let snapshot = dashboard.snapshot().await.unwrap();
        assert!(snapshot.orders[0].arrived);
        assert!(!snapshot.orders[1].arrived);
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::success(notice::STATUS_UPDATED)
        );
    }

    #[tokio::test]
    async fn test_toggle_unknown_order_sends_nothing() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        assert_eq!(
            dashboard.toggle_arrival("99").await,
            Err(BoardError::OrderNotFound("99".to_string()))
        );
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::STATUS_FAILED));
        assert!(table.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_list() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        let d = dashboard.clone();
        let toggle_task = tokio::spawn(async move { d.toggle_arrival("2").await });
        let (_, _, responder) = expect_update(&mut table).await.expect("Expected Update");
        responder.send(Err(FrameworkError::Rejected("offline".to_string()))).unwrap();

        assert_eq!(
            toggle_task.await.unwrap(),
            Err(BoardError::Backend(BackendError::Rejected("offline".to_string())))
        );
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::STATUS_FAILED));
        assert_eq!(dashboard.snapshot().await.unwrap().orders, rows());
    }

    #[tokio::test]
    async fn test_refetch_keeps_active_filter() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        dashboard
            .apply_filter(OrderFilter::default().customer(Customer::Avon))
            .await
            .unwrap();

        let d = dashboard.clone();
        let refresh = tokio::spawn(async move { d.refresh().await });
        let responder = expect_list(&mut table).await.expect("Expected List");
        let mut fresh = rows();
        fresh.insert(0, Order::new("3", "AVON-003", Customer::Avon, date(), 3, 3));
        responder.send(Ok(fresh)).unwrap();
        assert_eq!(refresh.await.unwrap(), Ok(3));

        let snapshot = dashboard.snapshot().await.unwrap();
        let ids: Vec<&str> = snapshot.visible().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_new_order_is_inserted() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;

        dashboard.open_new_form().await.unwrap();
        dashboard.set_form_field(FormField::Identifier, "NAT-010").await.unwrap();
        dashboard.set_form_field(FormField::ExpectedArrival, "2024-03-08").await.unwrap();
        dashboard.set_form_field(FormField::OrderCount, "4").await.unwrap();
        dashboard.set_form_field(FormField::VolumeCount, "9").await.unwrap();

        let d = dashboard.clone();
        let submit = tokio::spawn(async move { d.submit_form().await });

        let (payload, responder) = expect_create(&mut table).await.expect("Expected Create");
        assert_eq!(payload.identifier, "NAT-010");
        assert_eq!(payload.customer, Customer::Natura);
        assert_eq!(payload.order_count, 4);
        assert_eq!(payload.volume_count, 9);
        responder.send(Ok("10".to_string())).unwrap();

        let responder = expect_list(&mut table).await.expect("Expected refetch");
        responder.send(Ok(rows())).unwrap();

        assert_eq!(submit.await.unwrap(), Ok(()));
        assert_eq!(dashboard.snapshot().await.unwrap().form, None);
    }

    #[tokio::test]
    async fn test_edited_order_is_updated_without_identifier() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;

        dashboard.edit_order("2").await.unwrap();
        dashboard.set_form_field(FormField::VolumeCount, "6").await.unwrap();

        let d = dashboard.clone();
        let submit = tokio::spawn(async move { d.submit_form().await });

        let (id, patch, responder) = expect_update(&mut table).await.expect("Expected Update");
        assert_eq!(id, "2");
        assert_eq!(patch.identifier, None);
        assert_eq!(patch.arrived, None);
        assert_eq!(patch.customer, Some(Customer::Avon));
        assert_eq!(patch.volume_count, Some(6));
        responder.send(Ok(rows()[1].clone())).unwrap();

        let responder = expect_list(&mut table).await.expect("Expected refetch");
        responder.send(Ok(rows())).unwrap();

        assert_eq!(submit.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_order_code_cannot_change_while_editing() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;
        assert_eq!(notices.recv().await.unwrap(), Notice::success(notice::LOGIN_OK));

        dashboard.edit_order("1").await.unwrap();
        assert_eq!(
            dashboard.set_form_field(FormField::Identifier, "NAT-009").await,
            Err(BoardError::Form(FormError::IdentifierLocked))
        );
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::error(FormError::IdentifierLocked.to_string())
        );
        assert_eq!(dashboard.snapshot().await.unwrap().form.unwrap().identifier, "NAT-001");
        assert!(table.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_form_issues_no_backend_call() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;
        assert_eq!(notices.recv().await.unwrap(), Notice::success(notice::LOGIN_OK));

        dashboard.open_new_form().await.unwrap();
        dashboard.set_form_field(FormField::Identifier, "NAT-011").await.unwrap();
        dashboard.set_form_field(FormField::ExpectedArrival, "2024-03-08").await.unwrap();
        dashboard.set_form_field(FormField::OrderCount, "two").await.unwrap();
        dashboard.set_form_field(FormField::VolumeCount, "1").await.unwrap();

        let result = dashboard.submit_form().await;
        assert!(matches!(
            result,
            Err(BoardError::Form(FormError::InvalidNumber { .. }))
        ));
        assert_eq!(notices.recv().await.unwrap().level, crate::board::NoticeLevel::Error);
        assert!(table.try_recv().is_err());

        // Form contents survive for correction
        let form = dashboard.snapshot().await.unwrap().form.unwrap();
        assert_eq!(form.order_count, "two");
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;

        dashboard.request_delete("1").await.unwrap();
        dashboard.cancel_delete().await.unwrap();
        assert_eq!(dashboard.confirm_delete().await, Err(BoardError::NoPendingDelete));
        assert!(table.try_recv().is_err());

        dashboard.request_delete("1").await.unwrap();
        let d = dashboard.clone();
        let confirm = tokio::spawn(async move { d.confirm_delete().await });

        let (id, responder) = expect_delete(&mut table).await.expect("Expected Delete");
        assert_eq!(id, "1");
        responder.send(Ok(())).unwrap();

        let responder = expect_list(&mut table).await.expect("Expected refetch");
        responder.send(Ok(vec![rows()[1].clone()])).unwrap();

        assert_eq!(confirm.await.unwrap(), Ok(()));
        assert_eq!(dashboard.snapshot().await.unwrap().orders.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_actions_need_login() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        assert_eq!(dashboard.open_new_form().await, Err(BoardError::NotAuthorized));
        assert_eq!(dashboard.edit_order("1").await, Err(BoardError::NotAuthorized));
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::EDIT_FAILED));
        assert_eq!(dashboard.request_delete("1").await, Err(BoardError::NotAuthorized));
    }

    #[tokio::test]
    async fn test_wrong_password_stays_on_login_form() {
        let (dashboard, mut table, mut notices) = setup();
        started(&dashboard, &mut table, rows()).await;

        dashboard.show_login().await.unwrap();
        assert!(dashboard.login(EMAIL, "nope").await.is_err());
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::error("Invalid login credentials")
        );
        assert_eq!(dashboard.snapshot().await.unwrap().view, View::LoginForm);
    }

    #[tokio::test]
    async fn test_logout_returns_to_public_list() {
        let (dashboard, mut table, _notices) = setup();
        started(&dashboard, &mut table, rows()).await;
        signed_in(&dashboard).await;

        assert_eq!(dashboard.logout().await, Ok(View::PublicList));
        assert_eq!(dashboard.snapshot().await.unwrap().view, View::PublicList);
    }

    #[tokio::test]
    async fn test_failed_sign_out_still_returns_to_public_list() {
        let (memory, _table) = MemoryBackend::start(8);
        let memory = memory.with_session(Session {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
            user: SessionUser { id: "u1".to_string(), email: Some(EMAIL.to_string()) },
        });
        let (dashboard, mut notices) = dashboard_over(SignOutFails(memory));

        // The stored session opens the admin panel straight away
        assert_eq!(dashboard.start().await, Ok(View::AdminPanel));
        dashboard.open_new_form().await.unwrap();

        assert_eq!(dashboard.logout().await, Ok(View::PublicList));
        assert_eq!(notices.recv().await.unwrap(), Notice::error(notice::LOGOUT_FAILED));

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.view, View::PublicList);
        assert_eq!(snapshot.form, None);
    }
}
