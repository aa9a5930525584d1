use swarmcast_axum_health_check_api_server::environment::Started;
use swarmcast_axum_health_check_api_server::resources::{Report, Status};
use swarmcast_server_lib::registar::Registar;
use swarmcast_test_helpers::{configuration, logging};

use crate::server::client::get;

#[tokio::test]
async fn health_check_endpoint_should_return_status_ok_when_there_is_no_services_registered() {
    logging::setup();

    let configuration = configuration::ephemeral_with_no_services();

    let env = Started::new(&configuration.health_check_api.into(), Registar::default()).await;

    let response = get(&format!("http://{}/health_check", env.state.binding)).await; // DevSkim: ignore DS137138

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

    let report = response
        .json::<Report>()
        .await
        .expect("it should be able to get the report as json");

    assert_eq!(report.status, Status::None);

    env.stop().await.expect("it should stop the service");
}

mod peer_session {
    use std::sync::Arc;

    use swarmcast_axum_health_check_api_server::environment::Started;
    use swarmcast_axum_health_check_api_server::resources::{Report, Status};
    use swarmcast_axum_peer_session_server::environment::Config as PeerSessionConfig;
    use swarmcast_primitives::Batch;
    use swarmcast_server_lib::registar::Registar;
    use swarmcast_swarm_core::{ReplanTrigger, Swarm};
    use swarmcast_test_helpers::{configuration, logging};
    use tokio::sync::Mutex;

    use crate::server::client::get;

    async fn start_peer_session(
        configuration: &swarmcast_configuration::Configuration,
        registar: Registar,
    ) -> swarmcast_axum_peer_session_server::environment::Started {
        let config = PeerSessionConfig::new(&configuration.peer_session, &configuration.core);

        swarmcast_axum_peer_session_server::environment::Started::new(
            &config,
            Arc::new(Mutex::new(Swarm::default())),
            Arc::new(Mutex::new(Batch::default())),
            Arc::new(ReplanTrigger::default()),
            registar,
        )
        .await
    }

    #[tokio::test]
    async fn it_should_return_good_health_for_the_peer_session_service() {
        logging::setup();

        let configuration = configuration::ephemeral();
        let registar = Registar::default();

        let peer_session = start_peer_session(&configuration, registar.clone()).await;

        let config = configuration.health_check_api.clone();
        let env = Started::new(&config.into(), registar).await;

        let response = get(&format!("http://{}/health_check", env.state.binding)).await; // DevSkim: ignore DS137138

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

        let report: Report = response
            .json()
            .await
            .expect("it should be able to get the report from the json");

        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.message, String::new());

        let details = report.details.first().expect("it should have some details");

        assert_eq!(details.binding, peer_session.state.binding);
        assert_eq!(details.result, Ok("200 OK".to_string()));

        env.stop().await.expect("it should stop the service");
    }

    #[tokio::test]
    async fn it_should_return_error_when_the_peer_session_service_was_stopped_after_registration() {
        logging::setup();

        let configuration = configuration::ephemeral();
        let registar = Registar::default();

        let peer_session = start_peer_session(&configuration, registar.clone()).await;
        let binding = peer_session.state.binding;

        peer_session.stop().await.expect("it should stop the peer-session server");

        let config = configuration.health_check_api.clone();
        let env = Started::new(&config.into(), registar).await;

        let response = get(&format!("http://{}/health_check", env.state.binding)).await; // DevSkim: ignore DS137138

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

        let report: Report = response
            .json()
            .await
            .expect("it should be able to get the report from the json");

        assert_eq!(report.status, Status::Error);
        assert_eq!(report.message, "health check failed".to_string());

        let details = report.details.first().expect("it should have some details");

        assert_eq!(details.binding, binding);
        assert!(
            details.result.as_ref().is_err_and(|e| e.contains("error sending request")),
            "Expected to contain, \"error sending request\", but have message \"{:?}\".",
            details.result
        );

        env.stop().await.expect("it should stop the service");
    }
}
