//! Customizing MDSF output with StringifyOptions and conversion hooks.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_mdsf::{
    mdsf, stringify, stringify_with_options, to_value, Boxed, HostValue, Indent, Replacer,
    StringifyOptions, ToJson, ToMdsf, Value,
};
use std::error::Error;

#[derive(Debug, Serialize)]
struct Config {
    name: String,
    version: String,
    debug: bool,
    secret: String,
}

/// A money amount that renders itself as a string with its currency.
#[derive(Debug)]
struct Price {
    cents: u64,
    currency: &'static str,
}

impl ToMdsf for Price {
    fn to_mdsf(&self, _key: &str) -> Value {
        Value::from(format!("{}.{:02} {}", self.cents / 100, self.cents % 100, self.currency))
    }
}

impl ToJson for Price {
    fn to_json(&self, _key: &str) -> Value {
        Value::from(self.cents)
    }
}

impl HostValue for Price {
    fn mdsf_hook(&self) -> Option<&dyn ToMdsf> {
        Some(self)
    }

    fn json_hook(&self) -> Option<&dyn ToJson> {
        Some(self)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = to_value(&Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
        secret: "hunter2".to_string(),
    })?;

    println!("Default (compact):");
    println!("{}\n", stringify(&config));

    println!("Four-space indentation:");
    let options = StringifyOptions::new().with_indent(Indent::Spaces(4));
    println!("{}\n", stringify_with_options(&config, &options));

    println!("Tab indentation, only `name` and `version`:");
    let options = StringifyOptions::new()
        .with_indent("\t")
        .with_replacer(Replacer::keys(["name", "version"]));
    println!("{}\n", stringify_with_options(&config, &options));

    println!("Replacer function masking secrets:");
    let options = StringifyOptions::new().with_replacer(Replacer::function(|key, value, _| {
        if key == "secret" {
            Value::from("***")
        } else {
            value.clone()
        }
    }));
    println!("{}\n", stringify_with_options(&config, &options));

    println!("Host values:");
    let mut order = mdsf!({ "item": "coffee" });
    if let Some(fields) = order.as_object_mut() {
        fields.insert("price".into(), Value::host(Price { cents: 450, currency: "EUR" }));
        fields.insert("quantity".into(), Boxed::value(2));
    }
    println!("{}", stringify(&order));

    Ok(())
}
