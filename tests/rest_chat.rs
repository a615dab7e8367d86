#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web, App};
    use async_trait::async_trait;
    use kiosk::api::routes::configure;
    use kiosk::chat::TurnController;
    use kiosk::config::{
        AppConfig, GeminiConfig, KnowledgeConfig, PersonaConfig, QuotaConfig, ServerConfig,
    };
    use kiosk::knowledge::KnowledgeBase;
    use kiosk::llm::{ChannelError, ChannelProvider, ChatChannel};
    use kiosk::prompt::PromptComposer;
    use kiosk::session::SessionStore;
    use serde_json::Value;

    struct StubProvider {
        fail: bool,
    }

    impl ChannelProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn open_channel(&self) -> Box<dyn ChatChannel> {
            Box::new(StubChannel { fail: self.fail })
        }
    }

    struct StubChannel {
        fail: bool,
    }

    #[async_trait]
    impl ChatChannel for StubChannel {
        async fn send(&mut self, _text: &str) -> Result<String, ChannelError> {
            if self.fail {
                Err(ChannelError::Network("connection reset".to_string()))
            } else {
                Ok("Stubbed answer".to_string())
            }
        }
    }

    fn test_config(max_questions: u32) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            knowledge: KnowledgeConfig {
                dir: ".".to_string(),
            },
            quota: QuotaConfig { max_questions },
            gemini: GeminiConfig {
                api_base: "http://localhost".to_string(),
                api_key: "test".to_string(),
                model: "test-model".to_string(),
                timeout_secs: 5,
            },
            persona: PersonaConfig {
                assistant_name: "Helper".to_string(),
                institution: "the CCU Business School".to_string(),
                programs: vec!["MBA program".to_string()],
                description: "You answer admissions questions.".to_string(),
                greeting: "Welcome!".to_string(),
                priming: false,
            },
            analytics: None,
        }
    }

    fn build_state(config: &AppConfig, fail: bool) -> (Arc<SessionStore>, Arc<TurnController>) {
        let knowledge = Arc::new(KnowledgeBase::from_text("Deadline is December 15."));
        let composer = PromptComposer::new(config.persona.clone(), knowledge);
        let provider = Arc::new(StubProvider { fail });
        let controller = Arc::new(TurnController::new(composer, provider, None, false));
        let store = Arc::new(SessionStore::new(config.quota.max_questions));
        (store, controller)
    }

    macro_rules! init_app {
        ($config:expr, $store:expr, $controller:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($config.clone()))
                    .app_data(web::Data::new($store.clone()))
                    .app_data(web::Data::new($controller.clone()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_session_seeds_the_greeting() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["transcript"][0]["role"], "assistant");
        assert_eq!(body["transcript"][0]["content"], "Welcome!");
        assert_eq!(body["remaining"], 5);
        assert_eq!(body["gate"], "open");
    }

    #[actix_web::test]
    async fn ask_and_fetch_transcript() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "When is the deadline?"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["reply"], "Stubbed answer");
        assert_eq!(body["remaining"], 4);

        let req = test::TestRequest::get()
            .uri(&format!("/sessions/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1]["role"], "user");
        assert_eq!(transcript[2]["role"], "assistant");
        assert_eq!(body["daily_count"], 1);
    }

    #[actix_web::test]
    async fn quota_exhaustion_maps_to_429() {
        let config = test_config(1);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "First"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "Second"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);
    }

    #[actix_web::test]
    async fn channel_failure_maps_to_502_and_keeps_the_user_turn() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, true);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "Hello?"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 502);

        let req = test::TestRequest::get()
            .uri(&format!("/sessions/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1]["role"], "user");
        assert_eq!(body["daily_count"], 0);
    }

    #[actix_web::test]
    async fn blank_input_is_a_no_op() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);
    }

    #[actix_web::test]
    async fn clear_resets_transcript_but_not_quota() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::post().uri("/sessions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/messages", id))
            .set_json(serde_json::json!({"content": "A question"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/sessions/{}/clear", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0]["content"], "Welcome!");
        assert_eq!(body["daily_count"], 1);
    }

    #[actix_web::test]
    async fn unknown_session_is_404() {
        let config = test_config(5);
        let (store, controller) = build_state(&config, false);
        let app = init_app!(config, store, controller);

        let req = test::TestRequest::get()
            .uri(&format!("/sessions/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
