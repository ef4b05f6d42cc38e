//! Using the mdsf! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_mdsf::{mdsf, stringify, stringify_pretty, Value};

fn main() {
    let null_val = mdsf!(null);
    let undefined_val = mdsf!(undefined);
    let bool_val = mdsf!(true);
    let number = mdsf!(42);
    let text = mdsf!("Hello, MDSF!");

    println!("Primitives:");
    println!("  null:      {}", stringify(&null_val));
    println!("  undefined: {}", stringify(&undefined_val));
    println!("  bool:      {}", stringify(&bool_val));
    println!("  number:    {}", stringify(&number));
    println!("  text:      {}\n", stringify(&text));

    let numbers = mdsf!([1, 2, 3, 4, 5]);
    let mixed = mdsf!([1, "two", true, null, undefined]);

    println!("Arrays:");
    println!("  Numbers: {}", stringify(&numbers));
    println!("  Mixed:   {}\n", stringify(&mixed));

    let config = mdsf!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "password": undefined
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", stringify_pretty(&config));

    let items = vec![
        mdsf!({"id": 1, "status": "active"}),
        mdsf!({"id": 2, "status": "pending"}),
        mdsf!({"id": 3, "status": "completed"}),
    ];

    let summary = mdsf!({
        "total": (items.len()),
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", stringify(&summary));

    if let Some(name) = config.get("app").and_then(|app| app.get("name")).and_then(Value::as_str) {
        println!("Accessing values:");
        println!("  App name: {}", name);
    }
    if let Some(features) = config.get("features").and_then(Value::as_array) {
        println!("  Features: {}", features.len());
    }
}
