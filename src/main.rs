mod callback_client;
mod custom_resource;
mod ec2_image_client;
mod error;
mod handler;
mod image;
mod lookup_table;
mod selector;
mod settings;

use lambda_runtime::{handler_fn, Context, Error};
use log::info;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::callback_client::CallbackClient;
use crate::custom_resource::CustomResourceEvent;
use crate::ec2_image_client::Ec2ImageClient;
use crate::handler::{handle_request, reject_malformed_event};
use crate::selector::ImageSelector;
use crate::settings::Settings;

static SELECTOR: Lazy<ImageSelector> = Lazy::new(ImageSelector::default);

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::from_env();
    simple_logger::init_with_level(settings.log_level)?;
    lambda_runtime::run(handler_fn(ami_lookup_handler)).await?;
    Ok(())
}

async fn ami_lookup_handler(event: Value, context: Context) -> Result<Value, Error> {
    info!("Request received ({}): {}", context.request_id, event);
    let settings = Settings::from_env();
    let reporter = CallbackClient::new();
    let event: CustomResourceEvent = match serde_json::from_value(event.clone()) {
        Ok(parsed) => parsed,
        Err(error) => {
            reject_malformed_event(&event, &settings, &error.to_string(), &reporter).await;
            return Err(error.into());
        }
    };
    info!(
        "{:?} {} ({})",
        event.request_type, event.logical_resource_id, event.resource_type
    );

    let report = handle_request(
        &event,
        &SELECTOR,
        &settings,
        Ec2ImageClient::new,
        &reporter,
    )
    .await;
    Ok(serde_json::to_value(&report)?)
}
