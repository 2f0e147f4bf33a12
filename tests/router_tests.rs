use corridor::middleware::Flow;
use corridor::router::{HandlerRef, ParamValue, Router};
use corridor::RouterError;
use http::Method;

fn noop_handler() -> HandlerRef {
    HandlerRef::inline(vec![], |_inv| Flow::Continue)
}

fn assert_not_found(router: &Router, method: Method, path: &str) {
    match router.match_route(&method, path) {
        Err(RouterError::RouteNotFound { path: p }) => assert_eq!(p, path),
        other => panic!("expected RouteNotFound for {method} {path}, got {other:?}"),
    }
}

#[test]
fn test_exact_match_has_no_params() {
    let mut router = Router::new();
    router.get("/users", noop_handler()).save();

    let m = router.match_route(&Method::GET, "/users").expect("match");
    assert!(m.params.is_empty());
    assert!(m.entry.pattern.is_none());
}

#[test]
fn test_method_scoping() {
    let mut router = Router::new();
    router
        .get("/users", noop_handler())
        .post("/users", noop_handler())
        .save();

    assert!(router.match_route(&Method::GET, "/users").is_ok());
    assert!(router.match_route(&Method::POST, "/users").is_ok());
    assert_not_found(&router, Method::DELETE, "/users");
}

#[test]
fn test_missing_method_bucket_is_route_not_found() {
    let mut router = Router::new();
    router.get("/users", noop_handler()).save();
    assert_not_found(&router, Method::PATCH, "/users");
}

#[test]
fn test_dynamic_match_extracts_typed_params() {
    let mut router = Router::new();
    router
        .get("/users/{int:id}/posts/{slug}", noop_handler())
        .save();

    let m = router
        .match_route(&Method::GET, "/users/42/posts/intro")
        .expect("match");
    assert_eq!(m.params.len(), 2);
    assert_eq!(m.params[0], ("id".to_string(), ParamValue::Int(42)));
    assert_eq!(
        m.params[1],
        ("slug".to_string(), ParamValue::Str("intro".to_string()))
    );
}

#[test]
fn test_int_coercion_is_best_effort_not_validating() {
    let mut router = Router::new();
    router.get("/users/{int:id}", noop_handler()).save();

    // A non-numeric segment still matches; the value coerces to 0.
    let m = router
        .match_route(&Method::GET, "/users/abc")
        .expect("match");
    assert_eq!(m.params[0], ("id".to_string(), ParamValue::Int(0)));
}

#[test]
fn test_segment_count_prefilter() {
    let mut router = Router::new();
    router.get("/files/{name}", noop_handler()).save();

    // The permissive capture would match a substring, but the arity differs.
    assert_not_found(&router, Method::GET, "/files/a/b");
    assert_not_found(&router, Method::GET, "/files");
}

#[test]
fn test_dynamic_routes_disambiguate_by_arity() {
    let mut router = Router::new();
    router
        .get("/users/{id}", noop_handler())
        .get("/users/{id}/posts/{post}", noop_handler())
        .save();

    let short = router.match_route(&Method::GET, "/users/7").expect("match");
    assert_eq!(short.params.len(), 1);

    let long = router
        .match_route(&Method::GET, "/users/7/posts/9")
        .expect("match");
    assert_eq!(long.params.len(), 2);
}

#[test]
fn test_exact_match_wins_over_dynamic() {
    let mut router = Router::new();
    router
        .get("/users/{id}", noop_handler())
        .get("/users/me", noop_handler())
        .save();

    let m = router.match_route(&Method::GET, "/users/me").expect("match");
    assert!(m.params.is_empty(), "exact lookup must not extract params");
}

#[test]
fn test_dynamic_candidates_scan_in_registration_order() {
    let mut router = Router::new();
    router
        .get("/a/{first}", noop_handler())
        .get("/{second}/b", noop_handler())
        .save();

    // Both patterns match "/a/b"; the first registered wins.
    let m = router.match_route(&Method::GET, "/a/b").expect("match");
    assert_eq!(m.params[0].0, "first");
}

#[test]
fn test_trailing_slash_normalization_at_registration() {
    let mut router = Router::new();
    router.get("/about/", noop_handler()).save();
    assert!(router.match_route(&Method::GET, "/about").is_ok());
}

#[test]
fn test_root_path_survives_normalization() {
    let mut router = Router::new();
    router.get("/", noop_handler()).save();
    assert!(router.match_route(&Method::GET, "/").is_ok());
}

#[test]
fn test_last_write_wins_on_duplicate_registration() {
    let mut router = Router::new();
    router
        .get("/dup", HandlerRef::method("first", "handler"))
        .save();
    router
        .get("/dup", HandlerRef::method("second", "handler"))
        .save();

    assert_eq!(router.routes().len(), 1);
    let m = router.match_route(&Method::GET, "/dup").expect("match");
    match &m.entry.handler {
        HandlerRef::Method { controller, .. } => assert_eq!(controller, "second"),
        other => panic!("unexpected handler {other:?}"),
    }
}

#[test]
fn test_append_prefers_existing_entries() {
    let mut main = Router::new();
    main.get("/shared", HandlerRef::method("main", "shared"))
        .save();

    let mut other = Router::new();
    other
        .get("/shared", HandlerRef::method("other", "shared"))
        .get("/extra", HandlerRef::method("other", "extra"))
        .save();

    main.append(other.into_routes());

    assert_eq!(main.routes().len(), 2);
    let m = main.match_route(&Method::GET, "/shared").expect("match");
    match &m.entry.handler {
        HandlerRef::Method { controller, .. } => assert_eq!(controller, "main"),
        other => panic!("unexpected handler {other:?}"),
    }
    assert!(main.match_route(&Method::GET, "/extra").is_ok());
}

#[test]
fn test_overwrite_keeps_scan_position() {
    let mut router = Router::new();
    router
        .get("/{a}/x", HandlerRef::method("old", "first"))
        .get("/{b}/x", HandlerRef::method("other", "second"))
        .save();
    // Overwriting the first pattern must not push it behind the second in
    // the dynamic scan order.
    router
        .get("/{a}/x", HandlerRef::method("new", "first"))
        .save();

    let m = router.match_route(&Method::GET, "/hit/x").expect("match");
    assert_eq!(m.params[0].0, "a");
    match &m.entry.handler {
        HandlerRef::Method { controller, .. } => assert_eq!(controller, "new"),
        other => panic!("unexpected handler {other:?}"),
    }
}

#[test]
fn test_route_registers_multiple_methods() {
    let mut router = Router::new();
    router
        .route(
            "/things",
            noop_handler(),
            &[Method::GET, Method::PUT, Method::OPTIONS],
        )
        .save();

    assert!(router.match_route(&Method::GET, "/things").is_ok());
    assert!(router.match_route(&Method::PUT, "/things").is_ok());
    assert!(router.match_route(&Method::OPTIONS, "/things").is_ok());
    assert_not_found(&router, Method::POST, "/things");
}

#[test]
fn test_routes_are_queryable_before_save() {
    let mut router = Router::new();
    router.get("/early", noop_handler());
    assert!(router.match_route(&Method::GET, "/early").is_ok());
    router.save();
}
