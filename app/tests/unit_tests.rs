#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
    use concordium_client::{ConnectorType, HttpWalletBridgeFactory, NetworkConfig, TESTNET};
    use donation_app::{Action, AlertVariant, ConnectionPhase, DonationApp};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    const ACCOUNT: &str = "3kBx2h5Y2veb4hZgAJWPrr8RyQESKm5TjzF3ti1QQ4VSYLwK1G";

    async fn serve(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    async fn node(Json(request): Json<Value>) -> Json<Value> {
        let id = request["id"].clone();
        let result = match request["method"].as_str().unwrap_or_default() {
            "getConsensusStatus" => json!({ "genesisBlock": TESTNET.genesis_hash }),
            "getInstanceInfo" => json!({
                "name": "init_donation",
                "owner": ACCOUNT,
                "amount": "2500",
                "methods": ["donation.give", "donation.closed", "donation.view"]
            }),
            "invokeContract" => json!({
                "tag": "success",
                "returnValue": "00c409000000000000",
                "usedEnergy": 410
            }),
            _ => Value::Null,
        };
        Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
    }

    /// Node and wallet bridge on one listener.
    fn backend(wallet_genesis: &'static str) -> Router {
        Router::new()
            .route("/", post(node))
            .route(
                "/status",
                get(|| async { Json(json!({ "connectors": ["BrowserWallet"] })) }),
            )
            .route(
                "/account",
                get(move || async move {
                    Json(json!({ "account": ACCOUNT, "genesisHash": wallet_genesis }))
                }),
            )
            .route(
                "/transactions",
                post(|| async { (StatusCode::OK, Json(json!({ "transactionHash": "beef" }))) }),
            )
            .route("/disconnect", post(|| async { StatusCode::OK }))
    }

    async fn app_for(wallet_genesis: &'static str) -> DonationApp {
        let url = serve(backend(wallet_genesis)).await;
        let network = NetworkConfig {
            json_rpc_url: url.clone(),
            ..TESTNET.clone()
        };
        let factory = HttpWalletBridgeFactory::new(url, Duration::from_secs(5)).unwrap();
        DonationApp::new(Arc::new(factory), network, "3025")
    }

    #[tokio::test]
    async fn test_connect_through_bridge() {
        let mut app = app_for(TESTNET.genesis_hash.as_str()).await;

        app.activate_connector(ConnectorType::BrowserWallet).await;
        assert_eq!(app.phase(), ConnectionPhase::ConnectedNoAccount);

        app.connect().await;
        app.settle().await;

        let page = app.render();
        assert!(matches!(app.phase(), ConnectionPhase::Ready(_)));
        assert_eq!(page.detail("Index:"), Some("3025"));
        assert_eq!(page.detail("Total donation:"), Some("2500 μCCD"));
        assert!(page.alerts(AlertVariant::Danger).is_empty());
        assert!(page.alerts(AlertVariant::Warning).is_empty());
        assert!(page.button(Action::Connect).is_none());
    }

    #[tokio::test]
    async fn test_wallet_genesis_mismatch_over_bridge() {
        let mut app = app_for("0000000000000000000000000000000000000000000000000000000000000000").await;
        app.activate_connector(ConnectorType::BrowserWallet).await;
        app.connect().await;
        app.settle().await;

        assert_eq!(
            app.render().alerts(AlertVariant::Danger),
            vec!["Inconsistent network parameters detected!"]
        );
    }

    #[tokio::test]
    async fn test_donate_and_view_over_bridge() {
        let mut app = app_for(TESTNET.genesis_hash.as_str()).await;
        app.activate_connector(ConnectorType::BrowserWallet).await;
        app.connect().await;
        app.settle().await;

        assert!(app.refresh_view());
        app.settle().await;
        let page = app.render();
        assert_eq!(page.detail("Donation state:"), Some("Active"));
        assert_eq!(page.detail("Contract balance:"), Some("2500 μCCD"));

        assert!(app.donate("100"));
        app.settle().await;
        let page = app.render();
        assert_eq!(page.alerts(AlertVariant::Success), vec!["Transaction submitted: beef"]);
        assert!(page.to_string().contains("dhash=beef"));
    }

    #[tokio::test]
    async fn test_unsupported_connector_over_bridge() {
        let mut app = app_for(TESTNET.genesis_hash.as_str()).await;
        app.activate_connector(ConnectorType::WalletConnect).await;

        assert!(matches!(app.phase(), ConnectionPhase::ConnectorFailed(_)));
        assert!(app.render().button(Action::Connect).is_none());
    }
}
