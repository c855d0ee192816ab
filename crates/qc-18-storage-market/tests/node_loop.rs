//! # Node Loop Tests
//!
//! Drives `MarketNode::run` over in-memory input and output, the way
//! `storage-market-node` drives it over stdin and stdout.

use qc_18_storage_market::prelude::*;

fn hex(principal: Principal) -> String {
    String::from(principal)
}

fn envelope(caller: Principal, call: &str) -> String {
    format!(r#"{{"caller":"{}","call":{call}}}"#, hex(caller))
}

async fn run(node: &MarketNode, lines: &[String]) -> Vec<CallReceipt> {
    let input = lines.join("\n");
    let mut output = Vec::new();
    node.run(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

const PROVIDER: Principal = Principal::new([0x01; 20]);
const CLIENT: Principal = Principal::new([0x02; 20]);

#[tokio::test]
async fn one_receipt_per_call_and_malformed_lines_are_skipped() {
    let node = MarketNode::new(MarketConfig::default());
    let lines = vec![
        envelope(
            PROVIDER,
            r#"{"op":"register-provider","price_per_gb":200,"available_space":1000}"#,
        ),
        "this is not json".to_string(),
        String::new(),
        envelope(
            CLIENT,
            &format!(
                r#"{{"op":"request-storage","provider":"{}","size_gb":100}}"#,
                hex(PROVIDER)
            ),
        ),
        envelope(CLIENT, r#"{"op":"mint","amount":5}"#),
        envelope(PROVIDER, r#"{"op":"accept-request","request_id":0}"#),
        envelope(CLIENT, r#"{"op":"accept-request","request_id":999}"#),
    ];

    let receipts = run(&node, &lines).await;
    let ops: Vec<_> = receipts.iter().map(|r| r.op.as_str()).collect();
    assert_eq!(
        ops,
        vec![
            "register-provider",
            "request-storage",
            "accept-request",
            "accept-request"
        ]
    );
    assert_eq!(receipts[0].result.ok(), Some(&serde_json::json!(true)));
    assert_eq!(receipts[1].result.ok(), Some(&serde_json::json!(0)));
    assert_eq!(receipts[2].caller, PROVIDER);
    assert_eq!(receipts[3].result.err_code(), Some(codes::REQUEST_NOT_FOUND));

    // Four well-formed calls, four blocks.
    assert_eq!(node.height(), 4);
    let request = node.service().get_request(RequestId(0)).await.unwrap();
    assert_eq!(request.created_at, 2);
    assert_eq!(request.updated_at, 3);
    assert_eq!(
        node.service()
            .get_provider_details(PROVIDER)
            .await
            .unwrap()
            .available_space,
        900
    );
}

#[tokio::test]
async fn pending_requests_survive_long_idle_runs_by_default() {
    let node = MarketNode::new(MarketConfig::default());
    let mut lines = vec![
        envelope(
            PROVIDER,
            r#"{"op":"register-provider","price_per_gb":1,"available_space":10}"#,
        ),
        envelope(
            CLIENT,
            &format!(
                r#"{{"op":"request-storage","provider":"{}","size_gb":5}}"#,
                hex(PROVIDER)
            ),
        ),
    ];
    lines.extend((0..1500).map(|_| envelope(CLIENT, r#"{"op":"get-request","request_id":0}"#)));
    lines.push(envelope(PROVIDER, r#"{"op":"accept-request","request_id":0}"#));

    let receipts = run(&node, &lines).await;
    assert_eq!(
        receipts.last().unwrap().result.ok(),
        Some(&serde_json::json!(true))
    );
    assert_eq!(node.height(), 1503);
}

#[tokio::test]
async fn configured_ttl_expires_between_blocks() {
    let node = MarketNode::new(MarketConfig {
        pending_request_ttl_blocks: Some(3),
        ..MarketConfig::default()
    });
    let lines = vec![
        envelope(
            PROVIDER,
            r#"{"op":"register-provider","price_per_gb":1,"available_space":10}"#,
        ),
        envelope(
            CLIENT,
            &format!(
                r#"{{"op":"request-storage","provider":"{}","size_gb":5}}"#,
                hex(PROVIDER)
            ),
        ),
        envelope(CLIENT, r#"{"op":"get-request","request_id":0}"#),
        envelope(CLIENT, r#"{"op":"get-request","request_id":0}"#),
        envelope(PROVIDER, r#"{"op":"accept-request","request_id":0}"#),
    ];

    let receipts = run(&node, &lines).await;
    assert_eq!(receipts.len(), 5);
    assert_eq!(receipts[4].result.err_code(), Some(codes::INVALID_STATE));
    assert_eq!(node.service().stats().await.requests_expired, 1);
    assert!(node
        .events()
        .events()
        .iter()
        .any(|e| e.name() == "request_expired"));
}
