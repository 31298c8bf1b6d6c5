use crate::error::AmiLookupError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PV64_INSTANCE_TYPES: [&str; 10] = [
    "c1.medium",
    "c1.xlarge",
    "m1.large",
    "m1.medium",
    "m1.small",
    "m1.xlarge",
    "m2.2xlarge",
    "m2.4xlarge",
    "m2.xlarge",
    "t1.micro",
];

const HVM64_INSTANCE_TYPES: [&str; 35] = [
    "c3.2xlarge",
    "c3.4xlarge",
    "c3.8xlarge",
    "c3.large",
    "c3.xlarge",
    "c4.2xlarge",
    "c4.4xlarge",
    "c4.8xlarge",
    "c4.large",
    "c4.xlarge",
    "cc2.8xlarge",
    "cr1.8xlarge",
    "d2.2xlarge",
    "d2.4xlarge",
    "d2.8xlarge",
    "d2.xlarge",
    "hi1.4xlarge",
    "hs1.8xlarge",
    "i2.2xlarge",
    "i2.4xlarge",
    "i2.8xlarge",
    "i2.xlarge",
    "m3.2xlarge",
    "m3.large",
    "m3.medium",
    "m3.xlarge",
    "r3.2xlarge",
    "r3.4xlarge",
    "r3.8xlarge",
    "r3.large",
    "r3.xlarge",
    "t2.nano",
    "t2.medium",
    "t2.micro",
    "t2.small",
];

const HVMG2_INSTANCE_TYPES: [&str; 1] = ["g2.2xlarge"];

/// Owner of the NVIDIA graphics AMIs.
pub const GRAPHICS_AMI_OWNER: &str = "679593333241";
pub const AMAZON_AMI_OWNER: &str = "amazon";

static DEFAULT_TABLES: Lazy<LookupTables> = Lazy::new(|| {
    let mut instance_types = HashMap::new();
    for (arch_class, names) in [
        (ArchClass::Pv64, &PV64_INSTANCE_TYPES[..]),
        (ArchClass::Hvm64, &HVM64_INSTANCE_TYPES[..]),
        (ArchClass::Hvmg2, &HVMG2_INSTANCE_TYPES[..]),
    ]
    .iter()
    {
        for name in names.iter() {
            instance_types.insert(name.to_string(), *arch_class);
        }
    }

    let mut amzn_linux = HashMap::new();
    amzn_linux.insert(ArchClass::Pv64, "amzn-ami-pv*x86_64-ebs".to_string());
    amzn_linux.insert(ArchClass::Hvm64, "amzn-ami-hvm*x86_64-gp2".to_string());
    amzn_linux.insert(
        ArchClass::Hvmg2,
        "amzn-ami-graphics-hvm*x86_64-ebs*".to_string(),
    );

    let hardened_amzn_linux = ArchClass::ALL
        .iter()
        .map(|arch_class| (*arch_class, "CIS Amazon Linux*".to_string()))
        .collect();

    let mut name_patterns = HashMap::new();
    name_patterns.insert(LookupType::AmznLinux, amzn_linux);
    name_patterns.insert(LookupType::HardenedAmznLinux, hardened_amzn_linux);

    LookupTables {
        instance_types,
        name_patterns,
    }
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchClass {
    Pv64,
    Hvm64,
    Hvmg2,
}

impl ArchClass {
    pub const ALL: [ArchClass; 3] = [ArchClass::Pv64, ArchClass::Hvm64, ArchClass::Hvmg2];

    pub fn as_str(&self) -> &'static str {
        match *self {
            ArchClass::Pv64 => "PV64",
            ArchClass::Hvm64 => "HVM64",
            ArchClass::Hvmg2 => "HVMG2",
        }
    }
}

impl Display for ArchClass {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchClass {
    type Err = AmiLookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArchClass::ALL
            .iter()
            .find(|arch_class| arch_class.as_str() == s)
            .copied()
            .ok_or_else(|| AmiLookupError::UnknownArchitecture(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupType {
    AmznLinux,
    HardenedAmznLinux,
}

impl LookupType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LookupType::AmznLinux => "amzn-linux",
            LookupType::HardenedAmznLinux => "hardened-amzn-linux",
        }
    }
}

impl Default for LookupType {
    fn default() -> Self {
        LookupType::AmznLinux
    }
}

impl Display for LookupType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupType {
    type Err = AmiLookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amzn-linux" => Ok(LookupType::AmznLinux),
            "hardened-amzn-linux" => Ok(LookupType::HardenedAmznLinux),
            _ => Err(AmiLookupError::UnknownLookupType(s.to_string())),
        }
    }
}

/// Instance type to architecture class, and (lookup type, architecture class)
/// to AMI name pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTables {
    pub instance_types: HashMap<String, ArchClass>,
    pub name_patterns: HashMap<LookupType, HashMap<ArchClass, String>>,
}

impl Default for LookupTables {
    fn default() -> Self {
        DEFAULT_TABLES.clone()
    }
}

impl LookupTables {
    pub fn arch_class(&self, instance_type: &str) -> Result<ArchClass, AmiLookupError> {
        self.instance_types
            .get(instance_type)
            .copied()
            .ok_or_else(|| AmiLookupError::UnknownInstanceType(instance_type.to_string()))
    }

    pub fn name_pattern(
        &self,
        lookup_type: LookupType,
        arch_class: ArchClass,
    ) -> Result<&str, AmiLookupError> {
        self.name_patterns
            .get(&lookup_type)
            .ok_or_else(|| AmiLookupError::UnknownLookupType(lookup_type.to_string()))?
            .get(&arch_class)
            .map(|pattern| pattern.as_str())
            .ok_or(AmiLookupError::UnknownArchForLookupType(
                lookup_type,
                arch_class,
            ))
    }
}
