//! 纯函数组件的端到端性质测试

use chrono::{TimeZone, Utc};
use serde_json::json;

use proxy_admin_console::auth::oauth::parse_oauth_callback_url;
use proxy_admin_console::business::domain::{clean_support_models, normalize_group_ids};
use proxy_admin_console::business::normalize_quota_payload;
use proxy_admin_console::business::services::round_robin_assign;

#[test]
fn group_id_normalization_is_idempotent_and_order_insensitive() {
    let once = normalize_group_ids(&[3, 1, 1, 2]);
    let twice = normalize_group_ids(&once);
    assert_eq!(once, twice);

    assert_eq!(
        normalize_group_ids(&[3, 1, 1, 2]),
        normalize_group_ids(&[1, 2, 3, 3])
    );

    // 非正数ID直接丢弃
    assert_eq!(normalize_group_ids(&[0, -1, 5]), vec![5]);
}

#[test]
fn callback_parser_extracts_bare_query() {
    let params = parse_oauth_callback_url("?code=abc&state=xyz").unwrap();
    assert_eq!(params.code, "abc");
    assert_eq!(params.state, "xyz");
    assert_eq!(params.error, "");
}

#[test]
fn callback_parser_rejects_unusable_input() {
    assert!(parse_oauth_callback_url("").is_none());
    assert!(parse_oauth_callback_url("not a url, no equals").is_none());
}

#[test]
fn quota_normalizer_handles_gemini_buckets() {
    let fallback = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let payload = json!({
        "buckets": [{
            "modelId": "gemini-pro",
            "remainingFraction": 0.42,
            "resetTime": "2024-01-01T00:00:00Z"
        }]
    });

    let items = normalize_quota_payload(&payload, fallback);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "gemini-pro");
    assert!((items[0].percent.unwrap() - 42.0).abs() < 1e-6);
    assert_eq!(
        items[0].updated_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn quota_normalizer_handles_codex_windows() {
    let fallback = Utc::now();
    let payload = json!({
        "rate_limit": {
            "primary_window": {
                "used_percent": 80,
                "limit_window_seconds": 18000
            }
        }
    });

    let items = normalize_quota_payload(&payload, fallback);
    assert_eq!(items.len(), 1);
    assert!((items[0].percent.unwrap() - 20.0).abs() < 1e-6);
    assert!(items[0].name.contains("5h"));
}

#[test]
fn quota_normalizer_yields_empty_for_unrecognized_payload() {
    let items = normalize_quota_payload(
        &json!({"foo": "bar", "version": 3}),
        Utc::now(),
    );
    assert!(items.is_empty());
}

#[test]
fn support_models_deduplicate_by_provider_and_name() {
    let a = json!([
        {"provider": "gemini", "name": "gemini-pro"},
        {"provider": "codex", "name": "gpt-5"},
        {"provider": "gemini", "name": "gemini-pro"}
    ]);
    let b = json!([
        {"provider": "codex", "name": "gpt-5"},
        {"provider": "gemini", "name": "gemini-pro"},
        {"provider": "codex", "name": "gpt-5"},
        {"provider": "codex", "name": "gpt-5"}
    ]);

    let cleaned_a = clean_support_models(&a);
    let cleaned_b = clean_support_models(&b);
    assert_eq!(cleaned_a.len(), 2);
    assert_eq!(cleaned_b.len(), 2);

    let mut sorted_a = cleaned_a.clone();
    let mut sorted_b = cleaned_b.clone();
    sorted_a.sort_by(|x, y| (&x.provider, &x.name).cmp(&(&y.provider, &y.name)));
    sorted_b.sort_by(|x, y| (&x.provider, &x.name).cmp(&(&y.provider, &y.name)));
    assert_eq!(sorted_a, sorted_b);
}

#[test]
fn proxy_binding_is_round_robin() {
    let auth_ids = vec![101, 102, 103, 104, 105];
    let pool = vec!["p0".to_string(), "p1".to_string()];

    let assignments = round_robin_assign(&auth_ids, &pool);
    assert_eq!(assignments.len(), 5);
    for (index, (auth_id, proxy)) in assignments.iter().enumerate() {
        assert_eq!(*auth_id, auth_ids[index]);
        assert_eq!(*proxy, pool[index % pool.len()]);
    }
}
