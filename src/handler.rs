use log::{error, info, warn};
use rusoto_core::Region;
use serde_json::Value;
use std::str::FromStr;

use crate::callback_client::SendReport;
use crate::custom_resource::{CustomResourceEvent, OutcomeReport, RequestType, ResponseData};
use crate::ec2_image_client::DescribeImages;
use crate::error::AmiLookupError;
use crate::image::ImageRecord;
use crate::selector::{select_latest, ImageSelector, SelectionResult};
use crate::settings::Settings;

/// Answers one custom resource event and reports the outcome to its
/// `ResponseURL`. `connect` builds the catalog client for the requested region
/// and is not called for Delete events.
pub async fn handle_request<C, F, R>(
    event: &CustomResourceEvent,
    selector: &ImageSelector,
    settings: &Settings,
    connect: F,
    reporter: &R,
) -> OutcomeReport
where
    C: DescribeImages,
    F: FnOnce(Region) -> C,
    R: SendReport,
{
    let report = match event.request_type {
        RequestType::Delete => {
            OutcomeReport::success(event, &settings.log_stream_name, ResponseData::default())
        }
        RequestType::Create | RequestType::Update => {
            lookup_image(event, selector, settings, connect).await
        }
    };

    if let Err(error) = reporter.send_report(&event.response_url, &report).await {
        error!("Failed to deliver response: {:#}", error);
    }
    report
}

/// Reports FAILED for an event that did not deserialize. Returns `None` when the
/// event carries no `ResponseURL` to report to.
pub async fn reject_malformed_event<R>(
    event: &Value,
    settings: &Settings,
    message: &str,
    reporter: &R,
) -> Option<OutcomeReport>
where
    R: SendReport,
{
    let response_url = event.get("ResponseURL").and_then(Value::as_str)?;
    let report = OutcomeReport::malformed(event, &settings.log_stream_name, message);
    if let Err(error) = reporter.send_report(response_url, &report).await {
        error!("Failed to deliver response: {:#}", error);
    }
    Some(report)
}

async fn lookup_image<C, F>(
    event: &CustomResourceEvent,
    selector: &ImageSelector,
    settings: &Settings,
    connect: F,
) -> OutcomeReport
where
    C: DescribeImages,
    F: FnOnce(Region) -> C,
{
    let log_stream_name = &settings.log_stream_name;
    match find_latest_image(event, selector, settings, connect).await {
        Ok(image) => {
            info!("Latest AMI: {} ({})", image.id, image.name);
            OutcomeReport::success(event, log_stream_name, ResponseData::image(&image.id))
        }
        Err(AmiLookupError::NoMatchingImage) => {
            warn!("{}", AmiLookupError::NoMatchingImage);
            OutcomeReport::failed(
                event,
                log_stream_name,
                &AmiLookupError::NoMatchingImage.to_string(),
                ResponseData::default(),
            )
        }
        Err(error) => {
            error!("{}: {:?}", error, error);
            let message = error.to_string();
            OutcomeReport::failed(event, log_stream_name, &message, ResponseData::error(&message))
        }
    }
}

async fn find_latest_image<C, F>(
    event: &CustomResourceEvent,
    selector: &ImageSelector,
    settings: &Settings,
    connect: F,
) -> Result<ImageRecord, AmiLookupError>
where
    C: DescribeImages,
    F: FnOnce(Region) -> C,
{
    let request = event
        .resource_properties
        .lookup_request(settings.default_region.as_deref())?;
    let query = selector.build_query(&request)?;
    let region = resolve_region(&request.region)?;

    let client = connect(region);
    let images = client.describe_images(&query).await?;
    match select_latest(&images) {
        SelectionResult::Found(image) => Ok(image),
        SelectionResult::NotFound => Err(AmiLookupError::NoMatchingImage),
    }
}

/// Regions newer than the rusoto release are addressed through their
/// conventional EC2 endpoint.
fn resolve_region(name: &str) -> Result<Region, AmiLookupError> {
    if let Ok(region) = Region::from_str(name) {
        return Ok(region);
    }
    if !is_region_name(name) {
        return Err(AmiLookupError::InvalidRegion(name.to_string()));
    }
    let domain = if name.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    Ok(Region::Custom {
        name: name.to_string(),
        endpoint: format!("https://ec2.{}.{}", name, domain),
    })
}

/// `<partition prefix>-<area>-<number>`, e.g. `il-central-1` or `us-gov-east-1`.
fn is_region_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    let (number, words) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };
    words[0].len() == 2
        && words
            .iter()
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()))
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}
