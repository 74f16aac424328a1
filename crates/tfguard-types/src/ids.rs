//! Stable identifiers for rules and diagnostics.
//!
//! A rule has two names. `RULE_*` is the short code consumers allow-list and
//! suppress by; `CHECK_*` is a dotted namespace grouped by provider. Both are
//! stable across releases.

// Azure
pub const RULE_AZU_NO_PUBLIC_RDP: &str = "AZU024";
pub const CHECK_AZURE_NO_PUBLIC_RDP: &str = "azure.network.no_public_rdp";

pub const RULE_AZU_NO_PUBLIC_SSH: &str = "AZU017";
pub const CHECK_AZURE_NO_PUBLIC_SSH: &str = "azure.network.no_public_ssh";

pub const RULE_AZU_STORAGE_HTTPS: &str = "AZU012";
pub const CHECK_AZURE_STORAGE_HTTPS: &str = "azure.storage.enforce_https";

pub const RULE_AZU_STORAGE_MIN_TLS: &str = "AZU011";
pub const CHECK_AZURE_STORAGE_MIN_TLS: &str = "azure.storage.min_tls";

pub const RULE_AZU_DB_PUBLIC_FIREWALL: &str = "AZU015";
pub const CHECK_AZURE_DB_PUBLIC_FIREWALL: &str = "azure.database.no_public_firewall";

pub const RULE_AZU_KEYVAULT_ACL: &str = "AZU020";
pub const CHECK_AZURE_KEYVAULT_ACL: &str = "azure.keyvault.network_acl_deny";

// AWS
pub const RULE_AWS_PUBLIC_INGRESS: &str = "AWS006";
pub const CHECK_AWS_PUBLIC_INGRESS: &str = "aws.vpc.no_public_ingress_sg";

pub const RULE_AWS_PUBLIC_EGRESS: &str = "AWS007";
pub const CHECK_AWS_PUBLIC_EGRESS: &str = "aws.vpc.no_public_egress_sg";

pub const RULE_AWS_S3_PUBLIC_ACL: &str = "AWS001";
pub const CHECK_AWS_S3_PUBLIC_ACL: &str = "aws.s3.no_public_acl";

pub const RULE_AWS_RDS_PUBLIC: &str = "AWS011";
pub const CHECK_AWS_RDS_PUBLIC: &str = "aws.rds.no_public_db";

// Google
pub const RULE_GCP_PUBLIC_INGRESS: &str = "GCP003";
pub const CHECK_GCP_PUBLIC_INGRESS: &str = "gcp.compute.no_public_ingress";

// Engine-level diagnostics
pub const DIAG_ENGINE_INTERNAL_ERROR: &str = "engine_internal_error";
pub const DIAG_CONFIGURATION_DEFECT: &str = "configuration_defect";
