use crate::error::AmiLookupError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusoto_ec2::Image;
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

impl ImageRecord {
    /// Beta and release-candidate builds are never selected.
    pub fn is_pre_release(&self) -> bool {
        let lower = self.name.to_lowercase();
        lower.contains("beta") || lower.contains(".rc")
    }
}

impl TryFrom<Image> for ImageRecord {
    type Error = AmiLookupError;

    fn try_from(image: Image) -> Result<Self, Self::Error> {
        let id = image
            .image_id
            .ok_or(AmiLookupError::MalformedImage("ImageId"))?;
        let name = image.name.ok_or(AmiLookupError::MalformedImage("Name"))?;
        let creation_date = image
            .creation_date
            .ok_or(AmiLookupError::MalformedImage("CreationDate"))
            .and_then(|date| parse_creation_date(&date))?;
        Ok(ImageRecord {
            id,
            name,
            creation_date,
        })
    }
}

/// EC2 reports RFC 3339 timestamps; bare dates are read as midnight UTC.
pub fn parse_creation_date(date: &str) -> Result<DateTime<Utc>, AmiLookupError> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(date) {
        return Ok(date_time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| Utc.from_local_datetime(&midnight).single())
        .ok_or_else(|| AmiLookupError::InvalidCreationDate(date.to_string()))
}
