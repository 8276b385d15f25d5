#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use tokio::sync::mpsc;

    use crate::mirror::{
        bootstrap, ActionClient, ChannelDialog, ClientState, ConfirmationGate, DialogRequest,
        DrivePage, MemorySurface, Panel, StatusTag, SyncSession, UnloadOutcome, WatchChange,
        DEFAULT_ACTION_TIMEOUT,
    };
    use crate::tests::support::{bootstrapped_session, FakeTransport, Step};
    use crate::types::MirrorError;

    fn page_with(
        fake: &FakeTransport,
        session: SyncSession,
    ) -> (DrivePage, mpsc::Receiver<DialogRequest>) {
        let (dialog, prompts) = ChannelDialog::new(1);
        let actions = ActionClient::new(Arc::new(fake.clone()), session.clone());
        let page = DrivePage::new(session, actions, ConfirmationGate::new(Arc::new(dialog)));
        (page, prompts)
    }

    #[tokio::test]
    async fn bootstrap_renders_listed_drives() {
        let fake = FakeTransport::new();
        fake.script(
            "/list",
            Step::json(json!([
                {"status": "idle", "formatted": true, "name": "A"},
                {"status": "hardware"}
            ])),
        )
        .script("/status", Step::json(json!({"client": "if1"})));

        let surface = MemorySurface::new();
        let session = SyncSession::new(surface.clone());
        let slots = bootstrap(&fake, &session, DEFAULT_ACTION_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(slots, 2);

        let page = surface.snapshot();
        assert_eq!(page.rows.len(), 2);

        let first = page.row(1).unwrap();
        assert!(first.enabled);
        assert_eq!(first.label, "A");
        assert_eq!(first.icon, StatusTag::Idle.icon());

        let second = page.row(2).unwrap();
        assert!(!second.enabled);
        assert_eq!(second.label, "<h/w drive>");
        assert_eq!(second.icon, StatusTag::Hardware.icon());

        assert_eq!(page.client_icon, Some(StatusTag::Connected.icon()));
        assert_eq!(page.client_label, "if1");

        let requests = fake.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.json && r.method == Method::GET));
        assert_eq!(fake.uris(), vec!["/list", "/status"]);
    }

    #[tokio::test]
    async fn bootstrap_tolerates_missing_status() {
        let fake = FakeTransport::new();
        fake.script("/list", Step::json(json!([{"status": "empty"}])))
            .script("/status", Step::Refuse);

        let surface = MemorySurface::new();
        let session = SyncSession::new(surface.clone());
        assert_eq!(
            bootstrap(&fake, &session, DEFAULT_ACTION_TIMEOUT)
                .await
                .unwrap(),
            1
        );
        assert!(session.is_bootstrapped().await);
        assert_eq!(surface.snapshot().client_icon, None);
        assert_eq!(session.client().await, ClientState::Unchanged);
    }

    #[tokio::test]
    async fn failed_list_leaves_page_empty() {
        let fake = FakeTransport::new();
        fake.script(
            "/list",
            Step::Reply(StatusCode::SERVICE_UNAVAILABLE, String::new()),
        );

        let surface = MemorySurface::new();
        let session = SyncSession::new(surface.clone());
        let err = bootstrap(&fake, &session, DEFAULT_ACTION_TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, MirrorError::Server { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
        assert!(!session.is_bootstrapped().await);
        assert!(surface.snapshot().rows.is_empty());
        assert_eq!(fake.count("/status"), 0);
    }

    #[tokio::test]
    async fn blank_client_and_unchanged_slot_touch_only_first_row() {
        let (surface, session) = bootstrapped_session(json!([
            {"name": "GAMES", "status": "idle", "formatted": true},
            {"name": "WORK", "status": "idle", "formatted": true, "modified": true}
        ]))
        .await;
        session
            .apply_client_state(ClientState::Connected("if1".to_string()))
            .await;
        let before = surface.snapshot();

        let change: WatchChange = serde_json::from_value(json!({
            "client": "",
            "drives": [{"name": "", "status": "busy", "formatted": true}, null]
        }))
        .unwrap();
        let report = session.apply_change(change).await;

        assert!(!report.client_changed);
        let drives = report.drives.unwrap();
        assert_eq!(drives.updated, 1);
        assert_eq!(drives.unchanged, 1);

        let after = surface.snapshot();
        assert_eq!(after.client_label, "if1");
        assert_eq!(after.client_icon, before.client_icon);

        let first = after.row(1).unwrap();
        assert_eq!(first.icon, StatusTag::Busy.icon());
        assert_eq!(first.label, "GAMES");
        assert!(!first.enabled);
        assert_eq!(after.row(2), before.row(2));

        // The stored record follows the server, the rendered label does not.
        assert_eq!(session.drive(1).await.unwrap().name, "");
        assert_eq!(session.drive(2).await.unwrap().name, "WORK");
    }

    #[tokio::test]
    async fn longer_snapshot_is_clipped_to_drive_list() {
        let (surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;

        let change: WatchChange = serde_json::from_value(json!({
            "drives": [{"status": "empty"}, {"name": "X", "status": "idle", "formatted": true}]
        }))
        .unwrap();
        let report = session.apply_change(change).await.drives.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(surface.snapshot().rows.len(), 1);
        assert_eq!(session.slot_count().await, 1);
        assert_eq!(surface.snapshot().row(1).unwrap().icon, StatusTag::Empty.icon());
    }

    #[tokio::test]
    async fn showing_files_selects_the_drive() {
        let (surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1/list", Step::ok("run\nscreen$\n\n"));
        let (page, _prompts) = page_with(&fake, session.clone());

        page.show_files(1).await.unwrap();

        let view = surface.snapshot();
        assert_eq!(view.panel, Panel::Files);
        assert_eq!(view.file_list, "drive 1: run\nscreen$");
        assert_eq!(view.drive_actions, Some(1));
        assert_eq!(session.selected().await, Some(1));
        assert!(!fake.requests()[0].json);
    }

    #[tokio::test]
    async fn unload_without_selection_is_rejected() {
        let (_surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        let (page, _prompts) = page_with(&fake, session);

        assert!(matches!(
            page.request_unload().await,
            Err(MirrorError::NoDriveSelected)
        ));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn declined_unload_sends_nothing() {
        let (surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1/list", Step::ok("run"));
        let (page, mut prompts) = page_with(&fake, session);
        page.show_files(1).await.unwrap();

        let ui = tokio::spawn(async move {
            let prompt = prompts.recv().await.unwrap();
            assert_eq!(prompt.title, "Unload cartridge?");
            assert_eq!(prompt.message, "Unsaved changes will be lost!");
            prompt.decline();
        });

        assert_eq!(page.request_unload().await.unwrap(), UnloadOutcome::Declined);
        ui.await.unwrap();

        assert_eq!(fake.count("/drive/1/unload"), 0);
        assert_eq!(surface.snapshot().panel, Panel::Files);
    }

    #[tokio::test]
    async fn accepted_unload_sends_one_forced_request() {
        let (surface, session) = bootstrapped_session(json!([
            {"name": "A", "status": "idle", "formatted": true},
            {"name": "B", "status": "idle", "formatted": true}
        ]))
        .await;
        let fake = FakeTransport::new();
        fake.script("/drive/2/list", Step::ok("run"))
            .script("/drive/2/unload", Step::ok("unloaded drive 2\n"));
        let (page, mut prompts) = page_with(&fake, session);
        page.show_files(2).await.unwrap();

        let ui = tokio::spawn(async move { prompts.recv().await.unwrap().accept() });

        assert_eq!(
            page.request_unload().await.unwrap(),
            UnloadOutcome::Unloaded {
                slot: 2,
                message: "unloaded drive 2".to_string()
            }
        );
        ui.await.unwrap();

        let unloads: Vec<_> = fake
            .requests()
            .into_iter()
            .filter(|r| r.uri.starts_with("/drive/2/unload"))
            .collect();
        assert_eq!(unloads.len(), 1);
        assert_eq!(unloads[0].method, Method::PUT);
        assert_eq!(unloads[0].uri, "/drive/2/unload?force=true");
        assert_eq!(surface.snapshot().panel, Panel::Drives);
    }

    #[tokio::test]
    async fn failed_unload_still_returns_to_drive_list() {
        let (surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1/list", Step::ok("run")).script(
            "/drive/1/unload",
            Step::Reply(StatusCode::INTERNAL_SERVER_ERROR, "drive busy".to_string()),
        );
        let (page, mut prompts) = page_with(&fake, session);
        page.show_files(1).await.unwrap();
        assert_eq!(surface.snapshot().panel, Panel::Files);

        let ui = tokio::spawn(async move { prompts.recv().await.unwrap().accept() });

        let err = page.request_unload().await.unwrap_err();
        ui.await.unwrap();

        assert!(matches!(err, MirrorError::Server { ref message, .. } if message == "drive busy"));
        assert_eq!(fake.count("/drive/1/unload"), 1);
        assert_eq!(surface.snapshot().panel, Panel::Drives);
    }

    #[tokio::test]
    async fn save_is_a_local_notice() {
        let (_surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "idle", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1/list", Step::ok("run"));
        let (page, _prompts) = page_with(&fake, session);
        page.show_files(1).await.unwrap();

        let notice = page.request_save().await.unwrap();
        assert_eq!(notice.slot, 1);
        assert_eq!(notice.message, "SAVE coming soon");
        assert_eq!(fake.uris(), vec!["/drive/1/list"]);
    }

    #[tokio::test]
    async fn disabled_slots_refuse_cartridges() {
        let (surface, session) = bootstrapped_session(json!([
            {"name": "A", "status": "idle", "formatted": true},
            {"status": "hardware"},
            {"name": "B", "status": "busy", "formatted": true}
        ]))
        .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1", Step::ok("loaded data into drive 1"));
        let (page, _prompts) = page_with(&fake, session);

        for slot in [2, 3] {
            assert!(!surface.snapshot().row(slot).unwrap().enabled);
            assert!(matches!(
                page.choose_file(slot, "x.mdr", vec![1]).await,
                Err(MirrorError::DriveUnavailable { slot: refused }) if refused == slot
            ));
        }
        assert!(fake.requests().is_empty());

        page.choose_file(1, "x.mdr", vec![1]).await.unwrap();
        assert_eq!(fake.uris(), vec!["/drive/1?type=mdr&repair=true"]);
    }

    #[tokio::test]
    async fn slot_accepts_cartridge_again_once_idle() {
        let (_surface, session) =
            bootstrapped_session(json!([{"name": "A", "status": "busy", "formatted": true}]))
                .await;
        let fake = FakeTransport::new();
        fake.script("/drive/1", Step::ok("loaded"));
        let (page, _prompts) = page_with(&fake, session.clone());

        assert!(page.choose_file(1, "x.mdv", vec![1]).await.is_err());

        let change: WatchChange = serde_json::from_value(json!({
            "drives": [{"name": "A", "status": "idle", "formatted": true}]
        }))
        .unwrap();
        session.apply_change(change).await;

        page.choose_file(1, "x.mdv", vec![1]).await.unwrap();
        assert_eq!(fake.count("/drive/1"), 1);
    }
}
