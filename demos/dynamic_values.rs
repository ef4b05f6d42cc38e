//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_mdsf::{parse, stringify, stringify_pretty, to_value, Slot, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = parse(
        "{
            // where to listen
            host: 'localhost',
            port: 0x1F90,
            features: ['auth', , 'metrics'],
            timeout: Infinity,
        }",
    )?;

    println!("Config as MDSF:\n{}\n", stringify_pretty(&config));

    if let Some(host) = config.get("host").and_then(Value::as_str) {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(port) = config.get("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}", port);
    }
    if let Some(features) = config.get("features").and_then(Value::as_array) {
        let holes = features.iter().filter(|slot| slot.is_hole()).count();
        println!("Accessing field 'features': {} slots, {} holes\n", features.len(), holes);
    }

    // Richer scalars render as strings and are reinterpreted on demand
    let mut record = to_value(&User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    })?;
    if let Some(fields) = record.as_object_mut() {
        fields.insert("seen".to_string(), Value::Timestamp(Utc::now()));
        fields.insert("avatar".to_string(), Value::Binary(vec![0x89, b'P', b'N', b'G']));
    }
    if let Some(roles) = record
        .as_object_mut()
        .and_then(|fields| fields.get_mut("roles"))
        .and_then(Value::as_array_mut)
    {
        roles.push(Slot::Present(Value::from("reviewer")));
    }

    let text = stringify(&record);
    println!("Record as MDSF:\n{}\n", text);

    let back = parse(&text)?;
    println!("Type checks after a round trip:");
    println!("  seen is_string:    {}", back.get("seen").map_or(false, Value::is_string));
    println!("  seen as_timestamp: {:?}", back.get("seen").and_then(Value::as_timestamp));
    println!("  avatar as_binary:  {:?}", back.get("avatar").and_then(Value::as_binary));

    Ok(())
}
