use eventCounter::clients::connpass_client::{ConnpassClient, EventQuery, EventSource};
use eventCounter::error::CollectorError;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one canned response and hands back the raw request head.
async fn serve_once(status_line: &str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    let status_line = status_line.to_string();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });
    (host, handle)
}

#[tokio::test]
async fn sends_filters_and_curl_user_agent() {
    let body = json!({"results_returned": 0, "events": []});
    let (host, server) = serve_once("200 OK", body.to_string()).await;
    let client = ConnpassClient::new(host).unwrap();

    let result = client
        .fetch_events(&EventQuery::latest_updates())
        .await
        .expect("fetch should succeed");
    assert_eq!(result, body);

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert_eq!(request_line, "GET /api/v1/event/?order=1&count=100 HTTP/1.1");
    assert!(request.to_lowercase().contains("user-agent: curl/7.81.0"));
}

#[tokio::test]
async fn event_id_goes_into_path_and_query() {
    let (host, server) = serve_once("200 OK", json!({"events": []}).to_string()).await;
    let client = ConnpassClient::new(host).unwrap();
    let query = EventQuery {
        event_id: Some("364".to_string()),
        ..EventQuery::default()
    };

    client.fetch_events(&query).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/event/364/?event_id=364 HTTP/1.1"));
}

#[tokio::test]
async fn forbidden_response_surfaces_status_and_body() {
    let (host, server) = serve_once("403 Forbidden", "{\"detail\":\"blocked\"}".to_string()).await;
    let client = ConnpassClient::new(host).unwrap();

    let err = client
        .fetch_events(&EventQuery::latest_updates())
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        CollectorError::Upstream { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "{\"detail\":\"blocked\"}");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ConnpassClient::new(host).unwrap();
    let err = client
        .fetch_events(&EventQuery::latest_updates())
        .await
        .unwrap_err();
    assert!(matches!(err, CollectorError::Transport(_)));
}
