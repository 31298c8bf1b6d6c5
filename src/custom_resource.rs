use crate::error::AmiLookupError;
use crate::lookup_table::{ArchClass, LookupType};
use crate::selector::{InstanceSpec, LookupRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Request sent by CloudFormation to a custom resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    #[serde(default)]
    pub resource_type: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    pub region: Option<String>,
    pub instance_type: Option<String>,
    pub architecture: Option<String>,
    pub ami_lookup_type: Option<String>,
}

impl ResourceProperties {
    /// An explicit `Architecture` takes precedence over `InstanceType`. Missing
    /// `Region` falls back to `default_region`.
    pub fn lookup_request(
        &self,
        default_region: Option<&str>,
    ) -> Result<LookupRequest, AmiLookupError> {
        let instance = match (&self.architecture, &self.instance_type) {
            (Some(architecture), _) => InstanceSpec::Architecture(ArchClass::from_str(architecture)?),
            (None, Some(instance_type)) => InstanceSpec::InstanceType(instance_type.clone()),
            (None, None) => return Err(AmiLookupError::MissingProperty("InstanceType")),
        };
        let lookup_type = match self.ami_lookup_type {
            Some(ref lookup_type) => LookupType::from_str(lookup_type)?,
            None => LookupType::default(),
        };
        let region = self
            .region
            .as_deref()
            .or(default_region)
            .ok_or(AmiLookupError::MissingProperty("Region"))?
            .to_string();

        Ok(LookupRequest {
            instance,
            lookup_type,
            region,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseData {
    pub fn image(image_id: &str) -> Self {
        ResponseData {
            image_id: Some(image_id.to_string()),
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        ResponseData {
            image_id: None,
            error: Some(message.to_string()),
        }
    }
}

/// Response document PUT to the event's `ResponseURL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutcomeReport {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: ResponseData,
}

impl OutcomeReport {
    pub fn success(event: &CustomResourceEvent, log_stream_name: &str, data: ResponseData) -> Self {
        Self::new(event, log_stream_name, ResponseStatus::Success, None, data)
    }

    pub fn failed(
        event: &CustomResourceEvent,
        log_stream_name: &str,
        message: &str,
        data: ResponseData,
    ) -> Self {
        Self::new(
            event,
            log_stream_name,
            ResponseStatus::Failed,
            Some(message),
            data,
        )
    }

    fn new(
        event: &CustomResourceEvent,
        log_stream_name: &str,
        status: ResponseStatus,
        message: Option<&str>,
        data: ResponseData,
    ) -> Self {
        OutcomeReport {
            status,
            reason: reason(log_stream_name, message),
            physical_resource_id: event
                .physical_resource_id
                .clone()
                .unwrap_or_else(|| log_stream_name.to_string()),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }

    /// FAILED report for an event that did not deserialize, built from
    /// whichever envelope fields it does carry.
    pub fn malformed(event: &Value, log_stream_name: &str, message: &str) -> Self {
        let field = |name: &str| event.get(name).and_then(Value::as_str).map(str::to_string);
        OutcomeReport {
            status: ResponseStatus::Failed,
            reason: reason(log_stream_name, Some(message)),
            physical_resource_id: field("PhysicalResourceId")
                .unwrap_or_else(|| log_stream_name.to_string()),
            stack_id: field("StackId").unwrap_or_default(),
            request_id: field("RequestId").unwrap_or_default(),
            logical_resource_id: field("LogicalResourceId").unwrap_or_default(),
            data: ResponseData::error(message),
        }
    }
}

fn reason(log_stream_name: &str, message: Option<&str>) -> String {
    let details = format!(
        "See the details in CloudWatch Log Stream: {}",
        log_stream_name
    );
    match message {
        Some(message) => format!("{}. {}", message, details),
        None => details,
    }
}

#[cfg(test)]
mod tests {
    use crate::custom_resource::{
        CustomResourceEvent, OutcomeReport, RequestType, ResourceProperties, ResponseData,
        ResponseStatus,
    };
    use crate::error::AmiLookupError;
    use crate::lookup_table::{ArchClass, LookupType};
    use crate::selector::{InstanceSpec, LookupRequest};
    use serde_json::json;

    fn create_event() -> CustomResourceEvent {
        serde_json::from_value(json!({
            "RequestType": "Create",
            "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:AMILookup",
            "ResponseURL": "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/response",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/web/guid",
            "RequestId": "unique-id-for-this-request",
            "ResourceType": "Custom::AMIInfo",
            "LogicalResourceId": "AMIInfo",
            "ResourceProperties": {
                "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:AMILookup",
                "Region": "us-west-2",
                "InstanceType": "t2.micro",
                "AmiLookupType": "hardened-amzn-linux"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_event() {
        let event = create_event();
        assert_eq!(event.request_type, RequestType::Create);
        assert_eq!(event.physical_resource_id, None);
        assert_eq!(
            event.resource_properties,
            ResourceProperties {
                region: Some("us-west-2".to_string()),
                instance_type: Some("t2.micro".to_string()),
                architecture: None,
                ami_lookup_type: Some("hardened-amzn-linux".to_string()),
            }
        );
    }

    #[test]
    fn test_lookup_request() {
        let request = create_event()
            .resource_properties
            .lookup_request(Some("us-east-1"))
            .unwrap();
        assert_eq!(
            request,
            LookupRequest {
                instance: InstanceSpec::InstanceType("t2.micro".to_string()),
                lookup_type: LookupType::HardenedAmznLinux,
                region: "us-west-2".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_request_defaults() {
        let properties = ResourceProperties {
            instance_type: Some("m1.small".to_string()),
            architecture: Some("HVMG2".to_string()),
            ..Default::default()
        };
        let request = properties.lookup_request(Some("ap-northeast-1")).unwrap();
        assert_eq!(
            request,
            LookupRequest {
                instance: InstanceSpec::Architecture(ArchClass::Hvmg2),
                lookup_type: LookupType::AmznLinux,
                region: "ap-northeast-1".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_request_errors() {
        assert_eq!(
            ResourceProperties::default()
                .lookup_request(Some("us-east-1"))
                .err()
                .unwrap(),
            AmiLookupError::MissingProperty("InstanceType")
        );

        let properties = ResourceProperties {
            instance_type: Some("t2.micro".to_string()),
            ..Default::default()
        };
        assert_eq!(
            properties.lookup_request(None).err().unwrap(),
            AmiLookupError::MissingProperty("Region")
        );

        let properties = ResourceProperties {
            instance_type: Some("t2.micro".to_string()),
            ami_lookup_type: Some("windows".to_string()),
            ..Default::default()
        };
        assert_eq!(
            properties.lookup_request(Some("us-east-1")).err().unwrap(),
            AmiLookupError::UnknownLookupType("windows".to_string())
        );
    }

    #[test]
    fn test_serialize_success_report() {
        let report = OutcomeReport::success(
            &create_event(),
            "2017/04/20/[$LATEST]abcdef",
            ResponseData::image("ami-0b33d91d"),
        );
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "Status": "SUCCESS",
                "Reason": "See the details in CloudWatch Log Stream: 2017/04/20/[$LATEST]abcdef",
                "PhysicalResourceId": "2017/04/20/[$LATEST]abcdef",
                "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/web/guid",
                "RequestId": "unique-id-for-this-request",
                "LogicalResourceId": "AMIInfo",
                "Data": { "ImageId": "ami-0b33d91d" }
            })
        );
    }

    #[test]
    fn test_malformed_report() {
        let event = json!({
            "RequestType": "Create",
            "ResponseURL": "https://example.com/response",
            "RequestId": "unique-id-for-this-request",
            "LogicalResourceId": "AMIInfo"
        });
        let report = OutcomeReport::malformed(&event, "stream", "missing field `StackId`");
        assert_eq!(
            report,
            OutcomeReport {
                status: ResponseStatus::Failed,
                reason: "missing field `StackId`. See the details in CloudWatch Log Stream: stream"
                    .to_string(),
                physical_resource_id: "stream".to_string(),
                stack_id: String::new(),
                request_id: "unique-id-for-this-request".to_string(),
                logical_resource_id: "AMIInfo".to_string(),
                data: ResponseData::error("missing field `StackId`"),
            }
        );
    }

    #[test]
    fn test_serialize_failed_report() {
        let mut event = create_event();
        event.physical_resource_id = Some("existing-resource".to_string());
        let report = OutcomeReport::failed(
            &event,
            "stream",
            "No matching stable AMI found",
            ResponseData::default(),
        );
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "Status": "FAILED",
                "Reason": "No matching stable AMI found. See the details in CloudWatch Log Stream: stream",
                "PhysicalResourceId": "existing-resource",
                "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/web/guid",
                "RequestId": "unique-id-for-this-request",
                "LogicalResourceId": "AMIInfo",
                "Data": {}
            })
        );
    }
}
