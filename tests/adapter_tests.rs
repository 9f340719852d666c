use hello_layer::api::adapt;
use hello_layer::api::event::{EventFormat, parse_event};
use hello_layer::app::{Application, GREETING, application};
use hello_layer::core::config::AppConfig;
use hello_layer::core::models::{Request, Response};
use hello_layer::errors::{AdapterError, HandlerError};
use lambda_runtime::Context;
use serde_json::{Value, json};

fn run(event: &Value) -> Result<Value, AdapterError> {
    adapt(application(), &AppConfig::default(), event, &Context::default())
}

fn rest_event(method: &str, path: &str) -> Value {
    json!({
        "httpMethod": method,
        "path": path,
        "headers": {},
        "body": null
    })
}

#[test]
fn test_get_root_returns_greeting() {
    let reply = run(&rest_event("GET", "/")).unwrap();

    assert_eq!(reply["statusCode"], 200);
    assert_eq!(reply["body"], GREETING);
    assert_eq!(reply["isBase64Encoded"], false);
    assert_eq!(reply["headers"]["Content-Type"], "text/html; charset=utf-8");
    assert_eq!(
        reply["body"],
        "Hello from Flask + serverless-wsgi in a Lambda layer!"
    );
}

#[test]
fn test_get_root_ignores_headers_and_body() {
    let event = json!({
        "httpMethod": "GET",
        "path": "/",
        "headers": {"Accept": "application/json", "X-Custom": "1"},
        "queryStringParameters": {"q": "ignored"},
        "body": "{\"some\": \"payload\"}"
    });
    let reply = run(&event).unwrap();

    assert_eq!(reply["statusCode"], 200);
    assert_eq!(reply["body"], GREETING);
}

#[test]
fn test_post_root_is_not_found() {
    let reply = run(&rest_event("POST", "/")).unwrap();
    assert_eq!(reply["statusCode"], 404);
}

#[test]
fn test_other_paths_are_not_found() {
    for path in ["/index.html", "/hello", "//", "/?"] {
        let reply = run(&rest_event("GET", path)).unwrap();
        assert_eq!(reply["statusCode"], 404, "path {path}");
    }
    for method in ["PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"] {
        let reply = run(&rest_event(method, "/")).unwrap();
        assert_eq!(reply["statusCode"], 404, "method {method}");
    }
}

#[test]
fn test_missing_method_is_malformed() {
    let event = json!({"path": "/", "headers": {}, "body": null});
    match run(&event) {
        Err(AdapterError::MalformedEvent(msg)) => assert!(msg.contains("httpMethod")),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_path_is_malformed() {
    let event = json!({"httpMethod": "GET", "headers": {}});
    assert!(matches!(run(&event), Err(AdapterError::MalformedEvent(_))));
}

#[test]
fn test_adapt_is_idempotent() {
    let event = json!({
        "httpMethod": "GET",
        "path": "/",
        "headers": {"User-Agent": "curl/8.0"},
        "body": null
    });
    let first = run(&event).unwrap();
    let second = run(&event).unwrap();
    assert_eq!(first, second);

    let missing = rest_event("GET", "/nope");
    assert_eq!(run(&missing).unwrap(), run(&missing).unwrap());
}

#[test]
fn test_request_mirrors_event_fields() {
    let event = json!({
        "httpMethod": "PUT",
        "path": "/items/7",
        "headers": {"Content-Type": "application/json", "X-Trace": "abc"},
        "queryStringParameters": {"verbose": "true"},
        "body": "{\"name\":\"x\"}",
        "isBase64Encoded": false
    });
    let parsed = parse_event(&event, &AppConfig::default()).unwrap();
    let request = parsed.request;

    assert_eq!(parsed.format, EventFormat::Rest);
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/items/7");
    assert_eq!(request.headers.get("content-type"), Some("application/json"));
    assert_eq!(request.headers.get("X-Trace"), Some("abc"));
    assert_eq!(request.headers.len(), 2);
    assert_eq!(
        request.query,
        vec![("verbose".to_string(), "true".to_string())]
    );
    assert_eq!(request.body, b"{\"name\":\"x\"}".to_vec());
}

#[test]
fn test_missing_optional_fields_default_to_empty() {
    let event = json!({"httpMethod": "GET", "path": "/"});
    let request = parse_event(&event, &AppConfig::default()).unwrap().request;

    assert!(request.headers.is_empty());
    assert!(request.query.is_empty());
    assert!(request.body.is_empty());
}

#[test]
fn test_base64_body_is_decoded() {
    let event = json!({
        "httpMethod": "POST",
        "path": "/upload",
        "headers": {},
        "body": "AAEC/w==",
        "isBase64Encoded": true
    });
    let request = parse_event(&event, &AppConfig::default()).unwrap().request;
    assert_eq!(request.body, vec![0x00, 0x01, 0x02, 0xff]);
}

#[test]
fn test_http_api_v2_event() {
    let event = json!({
        "version": "2.0",
        "routeKey": "$default",
        "rawPath": "/",
        "rawQueryString": "a=1&a=2",
        "cookies": ["session=abc", "theme=dark"],
        "headers": {"accept": "text/html"},
        "requestContext": {"http": {"method": "GET", "path": "/"}},
        "isBase64Encoded": false
    });

    let parsed = parse_event(&event, &AppConfig::default()).unwrap();
    assert_eq!(parsed.format, EventFormat::Http);
    assert_eq!(parsed.request.headers.get("Cookie"), Some("session=abc; theme=dark"));
    assert_eq!(
        parsed.request.query,
        vec![
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string())
        ]
    );

    let reply = run(&event).unwrap();
    assert_eq!(reply["statusCode"], 200);
    assert_eq!(reply["body"], GREETING);
    assert!(reply.get("multiValueHeaders").is_none());
}

#[test]
fn test_v2_event_missing_method_is_malformed() {
    let event = json!({"version": "2.0", "rawPath": "/", "requestContext": {}});
    match run(&event) {
        Err(AdapterError::MalformedEvent(msg)) => {
            assert!(msg.contains("requestContext.http.method"));
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_alb_multi_value_event() {
    let event = json!({
        "requestContext": {"elb": {"targetGroupArn": "arn:aws:elasticloadbalancing:..."}},
        "httpMethod": "GET",
        "path": "/",
        "multiValueQueryStringParameters": {"tag": ["a%2Cb", "c"]},
        "multiValueHeaders": {"accept": ["text/html", "application/xhtml+xml"]},
        "body": "",
        "isBase64Encoded": false
    });

    let parsed = parse_event(&event, &AppConfig::default()).unwrap();
    assert_eq!(parsed.format, EventFormat::RestMultiValue);
    assert_eq!(
        parsed.request.headers.get_all("Accept").collect::<Vec<_>>(),
        vec!["text/html", "application/xhtml+xml"]
    );
    assert_eq!(
        parsed.request.query,
        vec![
            ("tag".to_string(), "a,b".to_string()),
            ("tag".to_string(), "c".to_string())
        ]
    );

    let reply = run(&event).unwrap();
    assert_eq!(reply["statusCode"], 200);
    assert_eq!(
        reply["multiValueHeaders"]["Content-Type"],
        json!(["text/html; charset=utf-8"])
    );
    assert!(reply.get("headers").is_none());
}

#[test]
fn test_warmup_event_skips_dispatch() {
    let event = json!({"source": "serverless-plugin-warmup"});
    assert_eq!(run(&event).unwrap(), json!({}));
}

#[test]
fn test_base_path_is_stripped_when_configured() {
    let config = AppConfig::from_vars(Some("/prod".to_string()), None).unwrap();
    let event = rest_event("GET", "/prod");

    let reply = adapt(application(), &config, &event, &Context::default()).unwrap();
    assert_eq!(reply["statusCode"], 200);

    // Without the setting the prefixed path is not routed
    assert_eq!(run(&event).unwrap()["statusCode"], 404);
}

fn login(_request: &Request) -> Result<Response, HandlerError> {
    let mut response = Response::html(200, "signed in");
    response.headers.append("Set-Cookie", "a=1; Path=/");
    response.headers.append("Set-Cookie", "b=2; Path=/");
    response.headers.append("Set-Cookie", "c=3; Path=/; HttpOnly");
    Ok(response)
}

#[test]
fn test_repeated_set_cookie_survives_single_value_reply() {
    let app = Application::builder().register("GET", "/", login).build();
    let event = rest_event("GET", "/");

    let reply = adapt(&app, &AppConfig::default(), &event, &Context::default()).unwrap();
    let headers = reply["headers"].as_object().unwrap();

    let mut cookies: Vec<&str> = headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
        .filter_map(|(_, value)| value.as_str())
        .collect();
    cookies.sort_unstable();

    assert_eq!(cookies, vec!["a=1; Path=/", "b=2; Path=/", "c=3; Path=/; HttpOnly"]);
    assert!(headers.values().all(|v| !v.as_str().unwrap_or("").contains(", ")));
}

#[test]
fn test_repeated_set_cookie_in_multi_value_and_v2_replies() {
    let app = Application::builder().register("GET", "/", login).build();
    let expected = json!(["a=1; Path=/", "b=2; Path=/", "c=3; Path=/; HttpOnly"]);

    let multi = json!({
        "httpMethod": "GET",
        "path": "/",
        "multiValueHeaders": {},
        "body": null
    });
    let reply = adapt(&app, &AppConfig::default(), &multi, &Context::default()).unwrap();
    assert_eq!(reply["multiValueHeaders"]["Set-Cookie"], expected);

    let v2 = json!({
        "version": "2.0",
        "rawPath": "/",
        "requestContext": {"http": {"method": "GET"}}
    });
    let reply = adapt(&app, &AppConfig::default(), &v2, &Context::default()).unwrap();
    assert_eq!(reply["cookies"], expected);
}
