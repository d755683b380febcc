//! Service identifier to driver class prefix.
//!
//! Driver implementations are keyed by a short prefix of the service name:
//!
//! 1. anything starting with `s3` (any case) maps to `s3`;
//! 2. anything starting with `elastic` (any case) keeps its first 10 characters;
//! 3. everything else keeps its first 3 characters, or its first 8 when it is
//!    longer than 3 characters and starts with exactly `cloud`.
//!
//! The `cloud` match is case-sensitive while the other two are not, so
//! `CloudWatch` resolves to `Clo`. Unknown services are not rejected.

/// Namespace prepended to a prefix to form the driver lookup key.
pub const CLASS_NAMESPACE: &str = "regionInfo::";

const S3_PREFIX: &str = "s3";
const ELASTIC: &str = "elastic";
const CLOUD: &str = "cloud";

const ELASTIC_PREFIX_LEN: usize = 10;
const CLOUD_PREFIX_LEN: usize = 8;
const DEFAULT_PREFIX_LEN: usize = 3;

/// The first `n` characters of `s`, or all of `s` when it is shorter.
///
/// Counts characters rather than bytes so a multi-byte code point is never
/// split.
#[must_use]
pub fn clamp_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Resolve the driver class prefix for a service identifier.
///
/// # Examples
///
/// ```
/// use screener_drivers::resolve_prefix;
///
/// assert_eq!(resolve_prefix("S3Bucket"), "s3");
/// assert_eq!(resolve_prefix("elasticache"), "elasticach");
/// assert_eq!(resolve_prefix("cloudtrail"), "cloudtra");
/// assert_eq!(resolve_prefix("lambda"), "lam");
/// ```
#[must_use]
pub fn resolve_prefix(identifier: &str) -> String {
    if clamp_prefix(identifier, S3_PREFIX.len()).eq_ignore_ascii_case(S3_PREFIX) {
        return S3_PREFIX.to_owned();
    }

    if clamp_prefix(identifier, ELASTIC.len()).eq_ignore_ascii_case(ELASTIC) {
        return clamp_prefix(identifier, ELASTIC_PREFIX_LEN).to_owned();
    }

    if identifier.chars().count() > DEFAULT_PREFIX_LEN
        && clamp_prefix(identifier, CLOUD.len()) == CLOUD
    {
        return clamp_prefix(identifier, CLOUD_PREFIX_LEN).to_owned();
    }

    clamp_prefix(identifier, DEFAULT_PREFIX_LEN).to_owned()
}

/// Resolve the namespaced driver lookup key, `regionInfo::<prefix>`.
#[must_use]
pub fn namespaced_class_key(identifier: &str) -> String {
    format!("{CLASS_NAMESPACE}{}", resolve_prefix(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_known_services() {
        let cases = [
            ("s3", "s3"),
            ("S3Bucket", "s3"),
            ("elasticloadbalancing", "elasticloa"),
            ("elasticache", "elasticach"),
            ("cloudwatch", "cloudwat"),
            ("cloudtrail", "cloudtra"),
            ("cloudfront", "cloudfro"),
            ("lambda", "lam"),
            ("iam", "iam"),
            ("guardduty", "gua"),
            ("compute-optimizer", "com"),
        ];
        for (input, expected) in cases {
            assert_eq!(resolve_prefix(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_should_resolve_empty_identifier_to_empty_prefix() {
        assert_eq!(resolve_prefix(""), "");
        assert_eq!(namespaced_class_key(""), "regionInfo::");
    }

    #[test]
    fn test_should_clamp_short_identifiers() {
        assert_eq!(resolve_prefix("s"), "s");
        assert_eq!(resolve_prefix("ec"), "ec");
        assert_eq!(resolve_prefix("elastic"), "elastic");
        assert_eq!(resolve_prefix("elasticx"), "elasticx");
        assert_eq!(resolve_prefix("cloud"), "cloud");
    }

    #[test]
    fn test_should_match_s3_and_elastic_case_insensitively() {
        assert_eq!(resolve_prefix("S3"), "s3");
        assert_eq!(resolve_prefix("s3control"), "s3");
        assert_eq!(resolve_prefix("ELASTICACHE"), "ELASTICACH");
        assert_eq!(resolve_prefix("ElasticBeanstalk"), "ElasticBea");
    }

    // The `cloud` rule is case-sensitive, unlike the other two.
    #[test]
    fn test_should_match_cloud_case_sensitively() {
        assert_eq!(resolve_prefix("CloudWatch"), "Clo");
        assert_eq!(resolve_prefix("CLOUDTRAIL"), "CLO");
    }

    #[test]
    fn test_should_not_split_multibyte_characters() {
        assert_eq!(clamp_prefix("ééééé", 3), "ééé");
        assert_eq!(resolve_prefix("día"), "día");
        assert_eq!(clamp_prefix("abc", 0), "");
    }

    #[test]
    fn test_should_namespace_class_key() {
        assert_eq!(namespaced_class_key("lambda"), "regionInfo::lam");
        assert_eq!(namespaced_class_key("s3"), "regionInfo::s3");
        assert_eq!(
            namespaced_class_key("elasticloadbalancing"),
            "regionInfo::elasticloa"
        );
    }

    #[test]
    fn test_should_be_deterministic() {
        for service in ["rds", "cloudwatch", "elasticache", "S3"] {
            assert_eq!(resolve_prefix(service), resolve_prefix(service));
        }
    }
}
