//! OAuth回调URL解析
//!
//! 操作者把浏览器里的跳转结果整段粘贴过来，形态五花八门：
//! 完整URL、裸query串、fragment、甚至只有一对 `code=...`。
//! 这里先补一个假的scheme/host让它能过URL解析，再从query和
//! fragment里取 `code` / `state` / `error`。

use serde::Serialize;
use url::Url;

/// 解析出的回调参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuthCallbackParams {
    pub code: String,
    pub state: String,
    pub error: String,
}

/// 解析粘贴的OAuth回调字符串
///
/// 输入为空或无法解析时返回 `None`。query里的参数优先于
/// fragment；`error` 缺失时用 `error_description` 兜底；
/// 兼容旧客户端把 `code#state` 塞进同一个参数的编码。
pub fn parse_oauth_callback_url(input: &str) -> Option<OAuthCallbackParams> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else if input.starts_with('?') {
        format!("http://localhost{}", input)
    } else if input.contains('/') || input.contains('?') || input.contains('#') || input.contains(':') {
        format!("http://{}", input)
    } else if input.contains('=') {
        // 裸query串
        format!("http://localhost/?{}", input)
    } else {
        return None;
    };

    let url = Url::parse(&candidate).ok()?;

    let mut code = String::new();
    let mut state = String::new();
    let mut error = String::new();
    let mut error_description = String::new();

    // fragment先取，query后取覆盖，保证query优先
    if let Some(fragment) = url.fragment() {
        collect_params(
            url::form_urlencoded::parse(fragment.as_bytes()),
            &mut code,
            &mut state,
            &mut error,
            &mut error_description,
        );
    }
    collect_params(
        url.query_pairs(),
        &mut code,
        &mut state,
        &mut error,
        &mut error_description,
    );

    // 旧编码：code参数里用 `#` 连接了code和state
    if state.is_empty() && code.contains('#') {
        let combined = std::mem::take(&mut code);
        match combined.split_once('#') {
            Some((left, right)) if !right.is_empty() => {
                code = left.to_string();
                state = right.to_string();
            }
            _ => code = combined,
        }
    }

    if error.is_empty() && !error_description.is_empty() {
        error = error_description;
    }

    Some(OAuthCallbackParams { code, state, error })
}

fn collect_params<'a>(
    pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    code: &mut String,
    state: &mut String,
    error: &mut String,
    error_description: &mut String,
) {
    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "code" => *code = value.into_owned(),
            "state" => *state = value.into_owned(),
            "error" => *error = value.into_owned(),
            "error_description" => *error_description = value.into_owned(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_query_string() {
        let parsed = parse_oauth_callback_url("?code=abc&state=xyz").unwrap();
        assert_eq!(parsed.code, "abc");
        assert_eq!(parsed.state, "xyz");
        assert_eq!(parsed.error, "");
    }

    #[test]
    fn test_full_url() {
        let parsed =
            parse_oauth_callback_url("https://example.com/cb?code=abc&state=xyz").unwrap();
        assert_eq!(parsed.code, "abc");
        assert_eq!(parsed.state, "xyz");
    }

    #[test]
    fn test_url_without_scheme() {
        let parsed = parse_oauth_callback_url("localhost:1455/auth/callback?code=abc").unwrap();
        assert_eq!(parsed.code, "abc");
    }

    #[test]
    fn test_raw_params_without_separator() {
        let parsed = parse_oauth_callback_url("code=abc&state=xyz").unwrap();
        assert_eq!(parsed.code, "abc");
        assert_eq!(parsed.state, "xyz");
    }

    #[test]
    fn test_fragment_params() {
        let parsed = parse_oauth_callback_url("https://example.com/cb#code=abc&state=xyz").unwrap();
        assert_eq!(parsed.code, "abc");
        assert_eq!(parsed.state, "xyz");
    }

    #[test]
    fn test_query_takes_precedence_over_fragment() {
        let parsed =
            parse_oauth_callback_url("https://example.com/cb?code=from-query#code=from-fragment")
                .unwrap();
        assert_eq!(parsed.code, "from-query");
    }

    #[test]
    fn test_legacy_code_hash_state() {
        // 旧编码把 code#state 塞进code参数（#已被转义）
        let parsed = parse_oauth_callback_url("?code=abc%23xyz").unwrap();
        assert_eq!(parsed.code, "abc");
        assert_eq!(parsed.state, "xyz");
    }

    #[test]
    fn test_error_description_fallback() {
        let parsed =
            parse_oauth_callback_url("?error_description=access_denied_by_user").unwrap();
        assert_eq!(parsed.error, "access_denied_by_user");

        let parsed =
            parse_oauth_callback_url("?error=server_error&error_description=boom").unwrap();
        assert_eq!(parsed.error, "server_error");
    }

    #[test]
    fn test_unparseable_inputs() {
        assert_eq!(parse_oauth_callback_url(""), None);
        assert_eq!(parse_oauth_callback_url("   "), None);
        assert_eq!(parse_oauth_callback_url("not a url, no equals"), None);
    }
}
