//! Driving an LLM call through the schema-and-adapter layer: render a
//! signature into a prompt, then parse a (simulated) completion back into
//! typed output fields.
//!
//! Run with: cargo run --example adapter_prompt

use std::error::Error;
use toon_codec::{Adapter, FieldSchema, FieldType, ToonMap, ToonValue};

fn main() -> Result<(), Box<dyn Error>> {
    let signature = toon_codec::Signature::new("ClassifySupportTicket")
        .with_doc("Read the support ticket and classify it for triage.")
        .with_input(FieldSchema::new("ticket_text", FieldType::String).with_description(
            "Raw text of the customer's support ticket",
        ))
        .with_output(
            FieldSchema::new(
                "category",
                FieldType::Enum(vec![
                    "billing".to_string(),
                    "bug".to_string(),
                    "feature_request".to_string(),
                ]),
            )
            .with_description("Which queue this ticket should be routed to"),
        )
        .with_output(FieldSchema::new("urgent", FieldType::Boolean))
        .with_output(FieldSchema::new(
            "tags",
            FieldType::Array(Box::new(FieldType::String)),
        ));

    println!("Task description:\n{}\n", Adapter::format_task_description(&signature));

    println!("Field structure:\n{}\n", Adapter::format_field_structure(&signature));

    let mut inputs = ToonMap::new();
    inputs.insert(
        "ticket_text".to_string(),
        ToonValue::String("My invoice charged me twice this month, please refund.".to_string()),
    );
    let user_message = Adapter::format_user_message_content(&signature, &inputs, "");
    println!("User message:\n{}\n", user_message);

    // Pretend this text came back from the model.
    let completion = "category: billing\nurgent: true\ntags[2]: refund,duplicate-charge";

    let adapter = Adapter::new();
    let parsed = adapter.parse(&signature, completion)?;

    println!("Parsed outputs:");
    println!("  category: {:?}", parsed.get("category").and_then(ToonValue::as_str));
    println!("  urgent:   {:?}", parsed.get("urgent").and_then(ToonValue::as_bool));
    if let Some(ToonValue::Array(tags)) = parsed.get("tags") {
        let rendered: Vec<&str> = tags.iter().filter_map(ToonValue::as_str).collect();
        println!("  tags:     {:?}", rendered);
    }

    Ok(())
}
