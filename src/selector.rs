use crate::error::AmiLookupError;
use crate::image::ImageRecord;
use crate::lookup_table::{
    ArchClass, LookupTables, LookupType, AMAZON_AMI_OWNER, GRAPHICS_AMI_OWNER,
};
use log::{debug, info};

const IMAGE_STATE: &str = "available";
const IMAGE_TYPE: &str = "machine";
const IMAGE_ARCHITECTURE: &str = "x86_64";

/// Where the architecture class of a lookup comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceSpec {
    InstanceType(String),
    Architecture(ArchClass),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub instance: InstanceSpec,
    pub lookup_type: LookupType,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageQuery {
    pub name_pattern: String,
    pub state: &'static str,
    pub image_type: &'static str,
    pub architecture: &'static str,
    pub owners: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum SelectionResult {
    Found(ImageRecord),
    NotFound,
}

pub struct ImageSelector {
    tables: LookupTables,
}

impl Default for ImageSelector {
    fn default() -> Self {
        ImageSelector::new(LookupTables::default())
    }
}

impl ImageSelector {
    pub fn new(tables: LookupTables) -> Self {
        ImageSelector { tables }
    }

    pub fn build_query(&self, request: &LookupRequest) -> Result<ImageQuery, AmiLookupError> {
        let arch_class = match request.instance {
            InstanceSpec::InstanceType(ref instance_type) => {
                self.tables.arch_class(instance_type)?
            }
            InstanceSpec::Architecture(arch_class) => arch_class,
        };
        info!("Image architecture: {}", arch_class);

        let name_pattern = self
            .tables
            .name_pattern(request.lookup_type, arch_class)?
            .to_string();
        let owners = match (request.lookup_type, arch_class) {
            (LookupType::AmznLinux, ArchClass::Hvmg2) => vec![GRAPHICS_AMI_OWNER.to_string()],
            (LookupType::AmznLinux, _) => vec![AMAZON_AMI_OWNER.to_string()],
            // CIS images are published by marketplace sellers.
            (LookupType::HardenedAmznLinux, _) => vec![],
        };

        Ok(ImageQuery {
            name_pattern,
            state: IMAGE_STATE,
            image_type: IMAGE_TYPE,
            architecture: IMAGE_ARCHITECTURE,
            owners,
        })
    }
}

/// Picks the most recently created image that is not a pre-release build.
/// Equal creation dates fall back to the lowest image id.
pub fn select_latest(images: &[ImageRecord]) -> SelectionResult {
    let mut candidates: Vec<&ImageRecord> = images
        .iter()
        .filter(|image| !image.is_pre_release())
        .collect();
    candidates.sort_by(|x, y| {
        y.creation_date
            .cmp(&x.creation_date)
            .then_with(|| x.id.cmp(&y.id))
    });
    debug!("Sorted stable AMIs: {:?}", candidates);

    candidates
        .first()
        .map_or(SelectionResult::NotFound, |latest| {
            SelectionResult::Found((*latest).clone())
        })
}
