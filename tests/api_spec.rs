use axum::http::StatusCode;
use axum_test::TestServer;
use japamala::api::{create_router, middleware::AdminGate, AppState};
use japamala::models::{
    AudioSource, Donor, HistoryEntry, LifecycleState, Mantra, PlaybackState, SessionSnapshot,
    StartSessionInput,
};
use serde_json::json;

fn setup() -> TestServer {
    setup_with_gate(AdminGate::open())
}

fn setup_with_gate(gate: AdminGate) -> TestServer {
    let app = create_router(AppState::new(), gate);
    TestServer::new(app).expect("Failed to create test server")
}

async fn start_session(server: &TestServer, mantra_id: &str) -> SessionSnapshot {
    server
        .post("/api/v1/session")
        .json(&StartSessionInput {
            mantra_id: mantra_id.to_string(),
            custom_audio: None,
        })
        .await
        .json::<SessionSnapshot>()
}

async fn complete_session(server: &TestServer, mantra_id: &str) {
    let snapshot = start_session(server, mantra_id).await;
    for _ in 0..snapshot.target_count {
        server.post("/api/v1/session/count").await;
    }
}

fn donor() -> Donor {
    Donor {
        name: "Ram".to_string(),
        gotra: "Kashyap".to_string(),
        city: "Delhi".to_string(),
        phone: "9999999999".to_string(),
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn lists_all_seven_mantras_by_default() {
        let server = setup();

        let response = server.get("/api/v1/mantras").await;

        response.assert_status_ok();
        let mantras: Vec<Mantra> = response.json();
        assert_eq!(mantras.len(), 7);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let server = setup();

        let response = server
            .get("/api/v1/mantras")
            .add_query_param("category", "shiva")
            .await;

        response.assert_status_ok();
        let mantras: Vec<Mantra> = response.json();
        assert_eq!(mantras.len(), 2);
    }

    #[tokio::test]
    async fn search_composes_with_the_category_filter() {
        let server = setup();

        let response = server
            .get("/api/v1/mantras")
            .add_query_param("category", "all")
            .add_query_param("q", "krishna")
            .await;

        response.assert_status_ok();
        let mantras: Vec<Mantra> = response.json();
        assert_eq!(mantras.len(), 1);
        assert_eq!(mantras[0].name, "Krishna Mantra");
    }

    #[tokio::test]
    async fn rejects_an_unknown_category() {
        let server = setup();

        let response = server
            .get("/api/v1/mantras")
            .add_query_param("category", "bogus")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn gets_a_mantra_by_slug() {
        let server = setup();

        let response = server.get("/api/v1/mantras/gayatri-mantra").await;

        response.assert_status_ok();
        let mantra: Mantra = response.json();
        assert_eq!(mantra.name, "Gayatri Mantra");
        assert_eq!(mantra.target_count, 108);
    }

    #[tokio::test]
    async fn returns_404_for_an_unknown_slug() {
        let server = setup();
        let response = server.get("/api/v1/mantras/missing").await;
        response.assert_status_not_found();
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn start_creates_a_fresh_session() {
        let server = setup();

        let response = server
            .post("/api/v1/session")
            .json(&StartSessionInput {
                mantra_id: "krishna-mantra".to_string(),
                custom_audio: None,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let snapshot: SessionSnapshot = response.json();
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.playback, PlaybackState::Stopped);
        assert_eq!(snapshot.lifecycle, LifecycleState::InProgress);
    }

    #[tokio::test]
    async fn start_rejects_an_unknown_mantra() {
        let server = setup();

        let response = server
            .post("/api/v1/session")
            .json(&StartSessionInput {
                mantra_id: "missing".to_string(),
                custom_audio: None,
            })
            .await;

        response.assert_status_not_found();
        server.get("/api/v1/session").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn start_rejects_unsupported_audio_before_touching_the_engine() {
        let server = setup();

        let response = server
            .post("/api/v1/session")
            .json(&StartSessionInput {
                mantra_id: "krishna-mantra".to_string(),
                custom_audio: Some(AudioSource::Upload {
                    file_name: "bhajan.flac".to_string(),
                    mime_type: "audio/flac".to_string(),
                }),
            })
            .await;

        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        // No session was started.
        server.get("/api/v1/session").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn start_accepts_a_supported_upload() {
        let server = setup();

        let response = server
            .post("/api/v1/session")
            .json(&StartSessionInput {
                mantra_id: "krishna-mantra".to_string(),
                custom_audio: Some(AudioSource::Upload {
                    file_name: "bhajan.mp3".to_string(),
                    mime_type: "audio/mpeg".to_string(),
                }),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let snapshot: SessionSnapshot = response.json();
        assert!(snapshot.custom_audio.is_some());
    }

    #[tokio::test]
    async fn get_returns_404_when_idle() {
        let server = setup();
        server.get("/api/v1/session").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn count_increments_toward_the_target() {
        let server = setup();
        start_session(&server, "krishna-mantra").await;

        let response = server.post("/api/v1/session/count").await;

        response.assert_status_ok();
        let snapshot: SessionSnapshot = response.json();
        assert_eq!(snapshot.count, 1);
    }

    #[tokio::test]
    async fn count_without_a_session_is_404() {
        let server = setup();
        server
            .post("/api/v1/session/count")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn playback_commands_transition_the_state() {
        let server = setup();
        start_session(&server, "krishna-mantra").await;

        let response = server
            .post("/api/v1/session/playback")
            .json(&json!({ "command": "play" }))
            .await;
        response.assert_status_ok();
        let snapshot: SessionSnapshot = response.json();
        assert_eq!(snapshot.playback, PlaybackState::Playing);

        let response = server
            .post("/api/v1/session/playback")
            .json(&json!({ "command": "pause" }))
            .await;
        response.assert_status_ok();
        let snapshot: SessionSnapshot = response.json();
        assert_eq!(snapshot.playback, PlaybackState::Paused);
    }

    #[tokio::test]
    async fn ended_signal_stops_playback() {
        let server = setup();
        start_session(&server, "krishna-mantra").await;
        server
            .post("/api/v1/session/playback")
            .json(&json!({ "command": "play" }))
            .await;

        server
            .post("/api/v1/session/ended")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let snapshot: SessionSnapshot = server.get("/api/v1/session").await.json();
        assert_eq!(snapshot.playback, PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn cancel_discards_the_session() {
        let server = setup();
        start_session(&server, "krishna-mantra").await;
        server.post("/api/v1/session/count").await;

        server
            .delete("/api/v1/session")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server.get("/api/v1/session").await.assert_status_not_found();
        let history: Vec<HistoryEntry> = server.get("/api/v1/history").await.json();
        assert!(history.is_empty());
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn records_a_completed_session_in_history() {
        let server = setup();
        complete_session(&server, "hanuman-mantra").await;

        let response = server.post("/api/v1/session/submit").json(&donor()).await;

        response.assert_status(StatusCode::CREATED);
        let entry: HistoryEntry = response.json();
        assert_eq!(entry.mantra_name, "Hanuman Mantra");
        assert_eq!(entry.total_count, 11);
        assert_eq!(entry.donor.city, "Delhi");

        // Engine is idle again and the entry heads the history list.
        server.get("/api/v1/session").await.assert_status_not_found();
        let history: Vec<HistoryEntry> = server.get("/api/v1/history").await.json();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, entry.id);
    }

    #[tokio::test]
    async fn rejects_an_incomplete_session() {
        let server = setup();
        start_session(&server, "krishna-mantra").await;

        let response = server.post("/api/v1/session/submit").json(&donor()).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let history: Vec<HistoryEntry> = server.get("/api/v1/history").await.json();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_donor_fields_and_allows_retry() {
        let server = setup();
        complete_session(&server, "hanuman-mantra").await;

        let response = server
            .post("/api/v1/session/submit")
            .json(&Donor::default())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Session survives for a corrected resubmit.
        let snapshot: SessionSnapshot = server.get("/api/v1/session").await.json();
        assert_eq!(snapshot.lifecycle, LifecycleState::Completed);

        let response = server.post("/api/v1/session/submit").json(&donor()).await;
        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn newest_submission_heads_the_history() {
        let server = setup();

        for name in ["first", "second"] {
            complete_session(&server, "hanuman-mantra").await;
            server
                .post("/api/v1/session/submit")
                .json(&Donor {
                    name: name.to_string(),
                    ..donor()
                })
                .await;
        }

        let history: Vec<HistoryEntry> = server.get("/api/v1/history").await.json();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].donor.name, "second");
        assert_eq!(history[1].donor.name, "first");
    }
}

mod history_gate {
    use super::*;

    #[tokio::test]
    async fn clear_is_open_without_a_configured_token() {
        let server = setup();
        complete_session(&server, "hanuman-mantra").await;
        server.post("/api/v1/session/submit").json(&donor()).await;

        server
            .delete("/api/v1/history")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let history: Vec<HistoryEntry> = server.get("/api/v1/history").await.json();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn clear_requires_the_configured_token() {
        let server = setup_with_gate(AdminGate::with_token("secret"));

        server
            .delete("/api/v1/history")
            .await
            .assert_status_unauthorized();

        server
            .delete("/api/v1/history")
            .authorization_bearer("wrong")
            .await
            .assert_status_unauthorized();

        server
            .delete("/api/v1/history")
            .authorization_bearer("secret")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn reading_history_is_never_gated() {
        let server = setup_with_gate(AdminGate::with_token("secret"));
        server.get("/api/v1/history").await.assert_status_ok();
    }
}
