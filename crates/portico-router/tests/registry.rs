//! Tests for sharing and swapping the active route table.

mod common;
use common::*;

use std::sync::Arc;

use portico_router::{ClassDeclaration, MatcherConfig, Method, RouteDeclaration, RouteRegistry};

#[test]
fn concurrent_matching_during_recompile() {
    let registry = Arc::new(
        RouteRegistry::compile(
            vec![get_route("UserPort", "show", "/users/{id}")],
            MatcherConfig::with_suffixes(["json"]),
        )
        .unwrap(),
    );

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for i in 0..200 {
                    let path = format!("/users/{worker}-{i}");
                    let id = registry.with_route(&path, &Method::Get, |matched| {
                        matched.and_then(|m| m.params.get("id").map(str::to_string))
                    });
                    assert_eq!(id.as_deref(), Some(&path["/users/".len()..]));
                }
            });
        }

        for _ in 0..20 {
            registry
                .recompile(vec![ClassDeclaration::new("UserPort")
                    .verbs(["GET"])
                    .route(RouteDeclaration::new("show", "/users/{id}"))
                    .route(RouteDeclaration::new("me", "/users/me"))])
                .unwrap();
        }
    });

    assert_eq!(registry.current().len(), 2);
}

#[test]
fn table_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<portico_router::RouteTable>();
    assert_send_sync::<RouteRegistry>();
}
