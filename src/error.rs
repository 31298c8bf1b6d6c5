use std::error::Error;

use crate::lookup_table::{ArchClass, LookupType};
use rusoto_core::RusotoError;
use rusoto_ec2::DescribeImagesError;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum AmiLookupError {
    UnknownInstanceType(String),
    UnknownLookupType(String),
    UnknownArchForLookupType(LookupType, ArchClass),
    UnknownArchitecture(String),
    MissingProperty(&'static str),
    InvalidRegion(String),
    DescribeImages(RusotoError<DescribeImagesError>),
    NoMatchingImage,
    MalformedImage(&'static str),
    InvalidCreationDate(String),
}

impl Display for AmiLookupError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            AmiLookupError::UnknownInstanceType(ref instance_type) => {
                write!(f, "Unknown instance type: {}", instance_type)
            }
            AmiLookupError::UnknownLookupType(ref lookup_type) => {
                write!(f, "Unknown AMI lookup type: {}", lookup_type)
            }
            AmiLookupError::UnknownArchForLookupType(lookup_type, arch_class) => write!(
                f,
                "No AMI name pattern for architecture {} with lookup type {}",
                arch_class, lookup_type
            ),
            AmiLookupError::UnknownArchitecture(ref architecture) => {
                write!(f, "Unknown architecture: {}", architecture)
            }
            AmiLookupError::MissingProperty(property) => {
                write!(f, "Missing resource property: {}", property)
            }
            AmiLookupError::InvalidRegion(ref region) => write!(f, "Invalid region: {}", region),
            AmiLookupError::DescribeImages(_) => write!(f, "DescribeImages call failed"),
            AmiLookupError::NoMatchingImage => write!(f, "No matching stable AMI found"),
            AmiLookupError::MalformedImage(field) => write!(f, "Image is missing {}", field),
            AmiLookupError::InvalidCreationDate(ref date) => {
                write!(f, "Invalid image creation date: {}", date)
            }
        }
    }
}

impl Error for AmiLookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            AmiLookupError::DescribeImages(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<DescribeImagesError>> for AmiLookupError {
    fn from(e: RusotoError<DescribeImagesError>) -> AmiLookupError {
        AmiLookupError::DescribeImages(e)
    }
}
