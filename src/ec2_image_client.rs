use async_trait::async_trait;
use log::{info, warn};
use rusoto_core::Region;
use rusoto_ec2::{DescribeImagesRequest, Ec2, Ec2Client, Filter};
use std::convert::TryFrom;

use crate::error::AmiLookupError;
use crate::image::ImageRecord;
use crate::selector::ImageQuery;

pub struct Ec2ImageClient {
    client: Ec2Client,
}

#[async_trait]
pub trait DescribeImages {
    async fn describe_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, AmiLookupError>;
}

#[async_trait]
impl DescribeImages for Ec2ImageClient {
    async fn describe_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, AmiLookupError> {
        let request = describe_images_request(query);
        info!("Image search options: {:?}", request);

        let result = self
            .client
            .describe_images(request)
            .await
            .map_err(AmiLookupError::DescribeImages)?;

        let mut images = Vec::<ImageRecord>::new();
        for image in result.images.unwrap_or_default() {
            let image_id = image.image_id.clone();
            match ImageRecord::try_from(image) {
                Ok(record) => images.push(record),
                Err(error) => warn!("Skipping image {:?}: {}", image_id, error),
            }
        }
        Ok(images)
    }
}

impl Ec2ImageClient {
    pub fn new(region: Region) -> Self {
        Ec2ImageClient::new_with_client(Ec2Client::new(region))
    }

    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2ImageClient { client }
    }
}

fn filter(name: &str, value: &str) -> Filter {
    Filter {
        name: Some(name.to_string()),
        values: Some(vec![value.to_string()]),
    }
}

fn describe_images_request(query: &ImageQuery) -> DescribeImagesRequest {
    DescribeImagesRequest {
        filters: Some(vec![
            filter("name", &query.name_pattern),
            filter("state", query.state),
            filter("image-type", query.image_type),
            filter("architecture", query.architecture),
        ]),
        owners: if query.owners.is_empty() {
            None
        } else {
            Some(query.owners.clone())
        },
        ..DescribeImagesRequest::default()
    }
}
