#![allow(dead_code)]

use portico_router::{ClassDeclaration, RouteDeclaration, RouteTable, RouterError};

/// A single-route GET class.
pub fn get_route(class: &str, method: &str, template: &str) -> ClassDeclaration {
    ClassDeclaration::new(class)
        .verbs(["GET"])
        .route(RouteDeclaration::new(method, template))
}

pub fn compile(classes: Vec<ClassDeclaration>) -> RouteTable {
    RouteTable::compile(classes).unwrap_or_else(|e| panic!("Failed to compile routes: {e}"))
}

pub fn compile_err(classes: Vec<ClassDeclaration>) -> RouterError {
    match RouteTable::compile(classes) {
        Ok(table) => panic!("Expected compile error, got {} routes", table.len()),
        Err(e) => e,
    }
}

pub fn suffixes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// The users table used across the matching tests.
pub fn users_table() -> RouteTable {
    compile(vec![ClassDeclaration::new("UserPort")
        .prefix("users")
        .verbs(["GET"])
        .suffixes(["json"])
        .route(RouteDeclaration::new("index", ""))
        .route(RouteDeclaration::new("show", "{id}").alias("user.show"))
        .route(RouteDeclaration::new("me", "me").suffixes(Vec::<String>::new()))])
}
