//! Static service catalog.
//!
//! Which AWS services the screener knows about, grouped by Well-Architected
//! pillar, plus the handful of services that need special treatment.
//! Global services are scanned once, in [`DEFAULT_REGION`].

use crate::types::Pillar;

/// Product title shown in generated reports.
pub const ADVISOR_TITLE: &str = "Service Screener";

/// Product version shown in generated reports.
pub const ADVISOR_VERSION: &str = "2.4.0";

/// Date of the last catalog update.
pub const ADVISOR_LAST_UPDATE: &str = "30-Jun-2025";

/// AdminLTE dashboard theme title.
pub const ADMINLTE_TITLE: &str = "AdminLTE.io";

/// AdminLTE dashboard theme version bundled with reports.
pub const ADMINLTE_VERSION: &str = "3.1.0";

/// Copyright date range shown in the AdminLTE footer.
pub const ADMINLTE_DATERANGE: &str = "2014-2021";

/// AdminLTE project URL linked from the report footer.
pub const ADMINLTE_URL: &str = "https://adminlte.io";

/// Request signature version used for SDK clients.
pub const SDK_SIGNATURE_VERSION: &str = "v4";

/// Region used for global services and as the fallback region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Services that are global, not region specific.
pub const GLOBAL_SERVICES: &[&str] = &["iam", "cloudfront"];

/// Services with special keyword handling.
pub const KEYWORD_SERVICES: &[&str] = &["lambda"];

const SECURITY_SERVICES: &[&str] = &[
    "iam",
    "kms",
    "cloudtrail",
    "config",
    "guardduty",
    "cloudwatch",
    "waf",
    "shield",
    "inspector",
];

const RELIABILITY_SERVICES: &[&str] = &[
    "ec2",
    "s3",
    "ebs",
    "rds",
    "autoscaling",
    "elasticloadbalancing",
    "route53",
    "backup",
];

const COST_OPTIMIZATION_SERVICES: &[&str] = &[
    "ec2",
    "rds",
    "s3",
    "elasticache",
    "dynamodb",
    "lambda",
    "cloudwatch",
    "compute-optimizer",
];

/// Services checked under the given pillar.
#[must_use]
pub fn pillar_services(pillar: Pillar) -> &'static [&'static str] {
    match pillar {
        Pillar::Security => SECURITY_SERVICES,
        Pillar::Reliability => RELIABILITY_SERVICES,
        Pillar::CostOptimization => COST_OPTIMIZATION_SERVICES,
    }
}

/// Every catalogued service, sorted and deduplicated.
#[must_use]
pub fn all_services() -> Vec<&'static str> {
    let mut services: Vec<&'static str> = Pillar::ALL
        .into_iter()
        .flat_map(|p| pillar_services(p).iter().copied())
        .collect();
    services.sort_unstable();
    services.dedup();
    services
}

/// Whether the service is global rather than regional.
#[must_use]
pub fn is_global_service(service: &str) -> bool {
    GLOBAL_SERVICES.iter().any(|s| s.eq_ignore_ascii_case(service))
}

/// Whether the service needs keyword handling.
#[must_use]
pub fn is_keyword_service(service: &str) -> bool {
    KEYWORD_SERVICES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(service))
}
