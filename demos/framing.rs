//! Reassembling records from a chunked stream.
//!
//! Run with: cargo run --example framing

use serde::{Deserialize, Serialize};
use serde_mdsf::{frame, from_value, reassemble, to_value, RecordBuffer};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Event {
    seq: u32,
    name: String,
    payload: Vec<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let events: Vec<Event> = (1..=3)
        .map(|seq| Event {
            seq,
            name: format!("tick-{}", seq),
            payload: vec![seq as i32; seq as usize],
        })
        .collect();

    // Sender side: one delimited record per event
    let mut wire = String::new();
    for event in &events {
        wire.push_str(&frame(&to_value(event)?));
    }
    println!("On the wire: {:?}\n", wire);

    // Receiver side, stateless: the caller carries the remainder
    let mut records = Vec::new();
    let mut remainder = String::new();
    for chunk in wire.as_bytes().chunks(11) {
        remainder.push_str(std::str::from_utf8(chunk)?);
        let rest = reassemble(&remainder, &mut records)?.to_string();
        remainder = rest;
    }
    println!("reassemble(): {} records, {:?} left over", records.len(), remainder);

    // Receiver side, stateful, with a corrupted record in the middle
    let mut buffer = RecordBuffer::new();
    let corrupted = wire.replacen("tick-2", "tick-2'", 1);
    let mut received = Vec::new();
    for chunk in corrupted.as_bytes().chunks(16) {
        match buffer.push(std::str::from_utf8(chunk)?) {
            Ok(records) => received.extend(records),
            Err(err) => println!("RecordBuffer: skipped a bad record ({})", err),
        }
    }

    let received: Vec<Event> = received
        .into_iter()
        .map(from_value)
        .collect::<Result<_, _>>()?;
    println!("RecordBuffer: received {:?}", received);

    Ok(())
}
