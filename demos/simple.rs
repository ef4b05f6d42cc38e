//! Basic MDSF serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_mdsf::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
    nickname: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            nickname: Some("ali".to_string()),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            nickname: None,
        },
    ];

    // Serialize to MDSF; `None` fields are left out
    let mdsf = to_string(&users)?;
    println!("MDSF output:\n{}\n", mdsf);

    // Deserialize back to struct
    let users_back: Vec<User> = from_str(&mdsf)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    // Hand-written input may use comments, any quotes and hex numbers
    let typed = "[{ id: 0x2C, name: \"Carol\", email: 'carol@example.com' /* no nickname */ }]";
    let carol: Vec<User> = from_str(typed)?;
    println!("Parsed hand-written input: {:?}", carol);

    Ok(())
}
