//! Create, shape and delete resources against the in-memory store.
//!
//! Run with `cargo run -p restful --example memory_store`.

use std::sync::Arc;

use restful::prelude::*;
use restful::{init_logging, transform_model};

#[derive(Debug)]
struct Customer {
    attributes: Attributes,
}

impl RestfulModel for Customer {
    fn table_name() -> &'static str {
        "customers"
    }

    fn primary_key_name() -> &'static str {
        "customer_id"
    }

    fn uuid_key_name() -> Option<&'static str> {
        Some("customer_uuid")
    }

    fn from_attributes(attributes: Attributes) -> Self {
        Self { attributes }
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn validation_rules(&self) -> RuleSet {
        RuleSet::new()
            .field("name", "required|string|max:100")
            .field("email", "required|email")
    }
}

fn payload(value: Value) -> anyhow::Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected an object, got {}", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RestfulConfig::from_env()?;
    init_logging(config.logging_config()).map_err(|e| anyhow::anyhow!(e))?;

    let repo: Repository<Customer> = Repository::new(Arc::new(MemoryStore::new()));
    let options = config.transform_options();

    let customer = repo
        .create_from(payload(json!({"name": "Ada", "email": "ada@example.com"}))?)
        .await?;
    println!("{}", transform_model(&customer, &options));

    if let Err(err) = repo.create_from(payload(json!({"name": "Bob", "email": "bob"}))?).await {
        if let Some(errors) = err.validation_errors() {
            println!("{}", errors.to_json());
        }
    }

    let uuid = customer.uuid_key().map(|u| u.to_string()).unwrap_or_default();
    let deleted = repo.destroy_str(&uuid).await?;
    println!("deleted {} customer(s)", deleted);

    Ok(())
}
