//! Print the request a composition would produce, without sending it.

use shorts_common::config::AppConfig;
use shorts_submission::{build_request, FieldValue};

use super::InputArgs;

pub fn run(input: InputArgs, config: &AppConfig) -> anyhow::Result<()> {
    let (composition, settings) = input.load(config)?;
    let payload = build_request(&composition, &settings);

    println!("Request for {}", config.service.endpoint);
    println!(
        "  {} image(s), {} field(s), {} bytes of files",
        composition.len(),
        payload.len(),
        payload.file_bytes()
    );
    println!();

    for field in payload.fields() {
        match &field.value {
            FieldValue::Text(text) => println!("  {:<16} {text:?}", field.name),
            FieldValue::File(file) => println!(
                "  {:<16} <{}, {}, {} bytes>",
                field.name,
                file.file_name(),
                file.mime_type(),
                file.len()
            ),
        }
    }

    Ok(())
}
