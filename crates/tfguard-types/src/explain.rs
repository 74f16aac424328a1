//! Explain registry for rules.
//!
//! Maps rule codes and check ids to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule inspects and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would fail the rule.
    pub before: &'static str,
    /// Configuration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule code (`AZU024`) or check id
/// (`azure.network.no_public_rdp`). Rule codes match case-insensitively.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    let upper = identifier.to_ascii_uppercase();
    let key = if all_rule_codes().contains(&upper.as_str()) {
        upper.as_str()
    } else {
        identifier
    };

    match key {
        ids::RULE_AZU_NO_PUBLIC_RDP | ids::CHECK_AZURE_NO_PUBLIC_RDP => Some(explain_public_rdp()),
        ids::RULE_AZU_NO_PUBLIC_SSH | ids::CHECK_AZURE_NO_PUBLIC_SSH => Some(explain_public_ssh()),
        ids::RULE_AZU_STORAGE_HTTPS | ids::CHECK_AZURE_STORAGE_HTTPS => {
            Some(explain_storage_https())
        }
        ids::RULE_AZU_STORAGE_MIN_TLS | ids::CHECK_AZURE_STORAGE_MIN_TLS => {
            Some(explain_storage_min_tls())
        }
        ids::RULE_AZU_DB_PUBLIC_FIREWALL | ids::CHECK_AZURE_DB_PUBLIC_FIREWALL => {
            Some(explain_db_public_firewall())
        }
        ids::RULE_AZU_KEYVAULT_ACL | ids::CHECK_AZURE_KEYVAULT_ACL => Some(explain_keyvault_acl()),
        ids::RULE_AWS_PUBLIC_INGRESS | ids::CHECK_AWS_PUBLIC_INGRESS => {
            Some(explain_aws_public_ingress())
        }
        ids::RULE_AWS_PUBLIC_EGRESS | ids::CHECK_AWS_PUBLIC_EGRESS => {
            Some(explain_aws_public_egress())
        }
        ids::RULE_AWS_S3_PUBLIC_ACL | ids::CHECK_AWS_S3_PUBLIC_ACL => Some(explain_s3_public_acl()),
        ids::RULE_AWS_RDS_PUBLIC | ids::CHECK_AWS_RDS_PUBLIC => Some(explain_rds_public()),
        ids::RULE_GCP_PUBLIC_INGRESS | ids::CHECK_GCP_PUBLIC_INGRESS => {
            Some(explain_gcp_public_ingress())
        }
        _ => None,
    }
}

/// List all known rule codes.
pub fn all_rule_codes() -> &'static [&'static str] {
    &[
        ids::RULE_AZU_NO_PUBLIC_RDP,
        ids::RULE_AZU_NO_PUBLIC_SSH,
        ids::RULE_AZU_STORAGE_HTTPS,
        ids::RULE_AZU_STORAGE_MIN_TLS,
        ids::RULE_AZU_DB_PUBLIC_FIREWALL,
        ids::RULE_AZU_KEYVAULT_ACL,
        ids::RULE_AWS_PUBLIC_INGRESS,
        ids::RULE_AWS_PUBLIC_EGRESS,
        ids::RULE_AWS_S3_PUBLIC_ACL,
        ids::RULE_AWS_RDS_PUBLIC,
        ids::RULE_GCP_PUBLIC_INGRESS,
    ]
}

/// List all known check ids.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_AZURE_NO_PUBLIC_RDP,
        ids::CHECK_AZURE_NO_PUBLIC_SSH,
        ids::CHECK_AZURE_STORAGE_HTTPS,
        ids::CHECK_AZURE_STORAGE_MIN_TLS,
        ids::CHECK_AZURE_DB_PUBLIC_FIREWALL,
        ids::CHECK_AZURE_KEYVAULT_ACL,
        ids::CHECK_AWS_PUBLIC_INGRESS,
        ids::CHECK_AWS_PUBLIC_EGRESS,
        ids::CHECK_AWS_S3_PUBLIC_ACL,
        ids::CHECK_AWS_RDS_PUBLIC,
        ids::CHECK_GCP_PUBLIC_INGRESS,
    ]
}

fn explain_public_rdp() -> Explanation {
    Explanation {
        title: "RDP Must Not Be Reachable From The Internet",
        description: "\
Detects network security rules that allow inbound TCP 3389 (Remote Desktop) from
any source.

Both standalone `azurerm_network_security_rule` resources and every
`security_rule` block inside an `azurerm_network_security_group` are inspected.
Each nested rule is judged on its own, so a group is reported once per offending
rule.

A rule fails when it is inbound (the default), allows traffic (the default),
covers TCP or any protocol, lists 3389 among its destination ports, and its
source address is one of `*`, `0.0.0.0`, `0.0.0.0/0`, `/0`, `Internet` or `Any`.",
        remediation: "\
Restrict `source_address_prefix` to the addresses that need RDP, or put the
hosts behind Azure Bastion or a VPN and deny 3389 from the internet.",
        examples: ExamplePair {
            before: r#"resource "azurerm_network_security_rule" "rdp" {
  direction                  = "Inbound"
  access                     = "Allow"
  protocol                   = "Tcp"
  destination_port_range     = "3389"
  source_address_prefix      = "*"
}"#,
            after: r#"resource "azurerm_network_security_rule" "rdp" {
  direction                  = "Inbound"
  access                     = "Allow"
  protocol                   = "Tcp"
  destination_port_range     = "3389"
  source_address_prefix      = "4.53.160.75"
}"#,
        },
    }
}

fn explain_public_ssh() -> Explanation {
    Explanation {
        title: "SSH Must Not Be Reachable From The Internet",
        description: "\
Detects network security rules that allow inbound TCP 22 (SSH) from any source.

Applies to the same resources and uses the same defaults as the RDP rule.",
        remediation: "\
Restrict `source_address_prefix` to known management addresses, or use a
bastion host and deny 22 from the internet.",
        examples: ExamplePair {
            before: r#"security_rule {
  destination_port_range = "22"
  source_address_prefix  = "Internet"
}"#,
            after: r#"security_rule {
  destination_port_range = "22"
  source_address_prefix  = "10.0.0.0/16"
}"#,
        },
    }
}

fn explain_storage_https() -> Explanation {
    Explanation {
        title: "Storage Accounts Must Require HTTPS",
        description: "\
Detects storage accounts with `enable_https_traffic_only = false`.

The provider default is `true`; an account without the attribute passes.",
        remediation: "Remove the attribute or set it to `true`.",
        examples: ExamplePair {
            before: r#"resource "azurerm_storage_account" "logs" {
  enable_https_traffic_only = false
}"#,
            after: r#"resource "azurerm_storage_account" "logs" {
  enable_https_traffic_only = true
}"#,
        },
    }
}

fn explain_storage_min_tls() -> Explanation {
    Explanation {
        title: "Storage Accounts Must Use TLS 1.2",
        description: "\
Detects storage accounts that accept TLS versions older than 1.2.

The provider default for `min_tls_version` is `TLS1_0`, so an account without
the attribute fails.",
        remediation: "Set `min_tls_version = \"TLS1_2\"`.",
        examples: ExamplePair {
            before: r#"resource "azurerm_storage_account" "logs" {
}"#,
            after: r#"resource "azurerm_storage_account" "logs" {
  min_tls_version = "TLS1_2"
}"#,
        },
    }
}

fn explain_db_public_firewall() -> Explanation {
    Explanation {
        title: "Database Firewalls Must Not Allow The Whole Internet",
        description: "\
Detects SQL, PostgreSQL and MySQL firewall rules whose range spans
`0.0.0.0` to `255.255.255.255`.

The special rule `0.0.0.0` to `0.0.0.0` (allow Azure services) is not flagged.",
        remediation: "Narrow the start and end addresses to the clients that need access.",
        examples: ExamplePair {
            before: r#"resource "azurerm_sql_firewall_rule" "all" {
  start_ip_address = "0.0.0.0"
  end_ip_address   = "255.255.255.255"
}"#,
            after: r#"resource "azurerm_sql_firewall_rule" "office" {
  start_ip_address = "4.53.160.75"
  end_ip_address   = "4.53.160.75"
}"#,
        },
    }
}

fn explain_keyvault_acl() -> Explanation {
    Explanation {
        title: "Key Vault Network ACLs Must Deny By Default",
        description: "\
Detects `network_acls` blocks on key vaults whose `default_action` is `Allow`.",
        remediation: "Set `default_action = \"Deny\"` and list the allowed networks explicitly.",
        examples: ExamplePair {
            before: r#"network_acls {
  default_action = "Allow"
  bypass         = "AzureServices"
}"#,
            after: r#"network_acls {
  default_action = "Deny"
  bypass         = "AzureServices"
}"#,
        },
    }
}

fn explain_aws_public_ingress() -> Explanation {
    Explanation {
        title: "Security Groups Must Not Allow Ingress From /0",
        description: "\
Detects ingress rules whose `cidr_blocks` or `ipv6_cidr_blocks` contain an
open range such as `0.0.0.0/0`.

One open entry in the list is enough to fail the rule. Both
`aws_security_group_rule` (with `type = \"ingress\"`) and every `ingress` block
of `aws_security_group` are inspected.",
        remediation: "List the specific CIDR ranges that need access.",
        examples: ExamplePair {
            before: r#"ingress {
  cidr_blocks = ["10.0.0.0/8", "0.0.0.0/0"]
}"#,
            after: r#"ingress {
  cidr_blocks = ["10.0.0.0/8"]
}"#,
        },
    }
}

fn explain_aws_public_egress() -> Explanation {
    Explanation {
        title: "Security Groups Should Not Allow Egress To /0",
        description: "\
Detects egress rules whose `cidr_blocks` or `ipv6_cidr_blocks` contain an open range.",
        remediation: "List the destinations the workload actually needs.",
        examples: ExamplePair {
            before: r#"egress {
  cidr_blocks = ["0.0.0.0/0"]
}"#,
            after: r#"egress {
  cidr_blocks = ["10.2.0.0/16"]
}"#,
        },
    }
}

fn explain_s3_public_acl() -> Explanation {
    Explanation {
        title: "S3 Buckets Must Not Use Public ACLs",
        description: "\
Detects buckets whose `acl` is `public-read`, `public-read-write` or `website`.

A bucket without an `acl` attribute is private.",
        remediation: "Use `acl = \"private\"` and grant access through bucket policies.",
        examples: ExamplePair {
            before: r#"resource "aws_s3_bucket" "assets" {
  acl = "public-read"
}"#,
            after: r#"resource "aws_s3_bucket" "assets" {
  acl = "private"
}"#,
        },
    }
}

fn explain_rds_public() -> Explanation {
    Explanation {
        title: "Databases Must Not Be Publicly Accessible",
        description: "\
Detects `aws_db_instance` and `aws_rds_cluster_instance` resources with
`publicly_accessible = true`. The default is `false`.",
        remediation: "Remove the attribute or set it to `false`.",
        examples: ExamplePair {
            before: r#"resource "aws_db_instance" "main" {
  publicly_accessible = true
}"#,
            after: r#"resource "aws_db_instance" "main" {
  publicly_accessible = false
}"#,
        },
    }
}

fn explain_gcp_public_ingress() -> Explanation {
    Explanation {
        title: "Firewalls Must Not Allow Ingress From The Internet",
        description: "\
Detects `google_compute_firewall` resources with an ingress direction (the
default) whose `source_ranges` contain an open range.",
        remediation: "Restrict `source_ranges` or use `source_tags` for internal traffic.",
        examples: ExamplePair {
            before: r#"resource "google_compute_firewall" "web" {
  source_ranges = ["0.0.0.0/0"]
}"#,
            after: r#"resource "google_compute_firewall" "web" {
  source_ranges = ["35.191.0.0/16"]
}"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_code_and_check_id_has_an_explanation() {
        for id in all_rule_codes().iter().chain(all_check_ids()) {
            assert!(lookup_explanation(id).is_some(), "missing explanation for {id}");
        }
    }

    #[test]
    fn rule_codes_match_case_insensitively() {
        let exp = lookup_explanation("azu024").expect("lowercase rule code");
        assert!(exp.title.contains("RDP"));
    }

    #[test]
    fn unknown_identifier_is_none() {
        assert!(lookup_explanation("AZU999").is_none());
        assert!(lookup_explanation("Azure.Network.No_Public_Rdp").is_none());
    }
}
