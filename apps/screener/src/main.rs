//! Service Screener - AWS Well-Architected style account reviewer.
//!
//! This binary wires the run together: it loads configuration, opens the AWS
//! SDK session, resolves the caller identity into the process cache, and
//! prints how each configured service would be routed to its driver.
//!
//! # Usage
//!
//! ```text
//! SERVICES=s3,iam,cloudwatch SCREENER_ROOT_DIR=/opt/app screener
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SCREENER_ROOT_DIR` | `.` | Directory report folders are created under |
//! | `DEFAULT_REGION` | `us-east-1` | Region for SDK clients |
//! | `SERVICES` | *(empty = whole catalog)* | Comma-separated services to screen |
//! | `DEBUG` | `false` | Dump the process cache after the run |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod sts;

use std::any::Any;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sts::config::Region;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use screener_core::catalog::{self, ADVISOR_LAST_UPDATE, ADVISOR_TITLE, ADVISOR_VERSION};
use screener_core::{
    CacheValue, IdentityRecord, OutputPathPair, ProcessCache, ScreenerConfig,
    acquire_account_info, keys,
};
use screener_drivers::{DriverRegistry, DriverRoute};

use crate::sts::StsIdentityProvider;

/// Binary version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Drivers are opaque to the entry point; each one registers its own handle.
type AnyDriverRegistry = DriverRegistry<dyn Any + Send + Sync>;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// One service in the run plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicePlan {
    #[serde(flatten)]
    route: DriverRoute,
    /// Region the driver runs against.
    region: String,
}

/// What the run resolved, printed as JSON on stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    title: &'static str,
    version: &'static str,
    last_update: &'static str,
    identity: Option<IdentityRecord>,
    output: OutputPathPair,
    services: Vec<ServicePlan>,
}

/// Route every selected service. Global services always run in the default
/// catalog region.
fn plan_services(config: &ScreenerConfig, registry: &AnyDriverRegistry) -> Vec<ServicePlan> {
    let services = config.selected_services();
    registry
        .plan(&services)
        .into_iter()
        .map(|route| {
            let region = if catalog::is_global_service(&route.service) {
                catalog::DEFAULT_REGION.to_owned()
            } else {
                config.default_region.to_string()
            };
            ServicePlan { route, region }
        })
        .collect()
}

/// Load the shared SDK session for the configured region.
async fn load_sdk_config(config: &ScreenerConfig) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.default_region.to_string()))
        .load()
        .await
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ScreenerConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        root_dir = %config.root_dir,
        region = %config.default_region,
        signature_version = catalog::SDK_SIGNATURE_VERSION,
        version = VERSION,
        "starting {ADVISOR_TITLE} {ADVISOR_VERSION}",
    );

    let cache = ProcessCache::global();

    let sdk_config = load_sdk_config(&config).await;
    cache.set(keys::AWS_SESSION, CacheValue::opaque(sdk_config));

    let session = cache
        .get_opaque::<SdkConfig>(keys::AWS_SESSION)
        .context("SDK session missing from process cache")?;
    let provider = StsIdentityProvider::new(&session);

    let output = acquire_account_info(cache, &provider, &config.root_dir)
        .await
        .context("failed to acquire caller identity")?;

    let registry = AnyDriverRegistry::new();
    let services = plan_services(&config, &registry);
    for plan in &services {
        if !plan.route.registered {
            warn!(
                service = %plan.route.service,
                class_key = %plan.route.class_key,
                "no driver registered for service"
            );
        }
    }

    let summary = RunSummary {
        title: ADVISOR_TITLE,
        version: ADVISOR_VERSION,
        last_update: ADVISOR_LAST_UPDATE,
        identity: cache.get_identity(keys::STS_INFO),
        output,
        services,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if config.debug {
        let snapshot = serde_json::to_string_pretty(&cache.retrieve_all())?;
        info!(cache = %snapshot, "process cache snapshot");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use screener_core::AwsRegion;

    use super::*;

    #[test]
    fn test_should_plan_global_services_in_default_region() {
        let config = ScreenerConfig::builder()
            .default_region(AwsRegion::new("eu-west-1"))
            .services(vec!["iam".into(), "cloudwatch".into()])
            .build();
        let registry = AnyDriverRegistry::new();

        let plans = plan_services(&config, &registry);

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].region, "us-east-1");
        assert_eq!(plans[0].route.class_key, "regionInfo::iam");
        assert_eq!(plans[1].region, "eu-west-1");
        assert_eq!(plans[1].route.class_key, "regionInfo::cloudwat");
    }

    #[test]
    fn test_should_mark_registered_drivers() {
        let config = ScreenerConfig::builder()
            .services(vec!["s3".into(), "rds".into()])
            .build();
        let registry = AnyDriverRegistry::new();
        registry.register("s3", Arc::new("s3-driver"));

        let plans = plan_services(&config, &registry);

        assert!(plans[0].route.registered);
        assert!(!plans[1].route.registered);
    }

    #[test]
    fn test_should_flatten_route_in_plan_json() {
        let plan = ServicePlan {
            route: DriverRoute {
                service: "lambda".to_owned(),
                class_key: "regionInfo::lam".to_owned(),
                registered: false,
            },
            region: "us-east-1".to_owned(),
        };
        let json = serde_json::to_value(&plan).expect("test serialization");
        assert_eq!(json["classKey"], "regionInfo::lam");
        assert_eq!(json["region"], "us-east-1");
    }
}
