//! Rule predicates and the process-wide registry.
//!
//! Every check is a `static CheckDef`: a rule code, the blocks it targets and a
//! pure `evaluate` function. The registry is assembled once, on first use,
//! and is read-only afterwards.

use crate::model::{Block, Value};
use crate::normalize::{Expect, Normalized, normalize};
use crate::resolve::Resolver;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use tfguard_types::{Severity, Status};

pub mod defaults;

#[cfg(feature = "provider-aws")]
mod aws_rds;
#[cfg(feature = "provider-aws")]
mod aws_s3;
#[cfg(feature = "provider-aws")]
mod aws_security_group;
#[cfg(feature = "provider-azure")]
mod azure_database;
#[cfg(feature = "provider-azure")]
mod azure_keyvault;
#[cfg(feature = "provider-azure")]
mod azure_storage;
#[cfg(feature = "provider-gcp")]
mod gcp_firewall;
#[cfg(feature = "provider-azure")]
mod network_exposure;

#[cfg(all(
    test,
    feature = "provider-azure",
    feature = "provider-aws",
    feature = "provider-gcp"
))]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Azure,
    Aws,
    Google,
}

/// Which blocks a check runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Every top-level block of this type.
    TopLevel(&'static str),
    /// Every `child` block nested directly in a top-level `parent` block,
    /// each evaluated on its own.
    Nested {
        parent: &'static str,
        child: &'static str,
    },
}

/// What a predicate concluded about one evaluation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub status: Status,
    pub description: String,
    pub data: JsonValue,
}

impl Verdict {
    pub fn pass(description: impl Into<String>) -> Self {
        Self {
            status: Status::Pass,
            description: description.into(),
            data: JsonValue::Null,
        }
    }

    pub fn fail(description: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            description: description.into(),
            data: JsonValue::Null,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }

    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }
}

pub type EvaluateFn = fn(&EvalContext<'_>, &Block) -> Option<Verdict>;

pub struct CheckDef {
    pub rule_code: &'static str,
    pub check_id: &'static str,
    pub provider: Provider,
    pub title: &'static str,
    pub default_severity: Severity,
    pub targets: &'static [Target],
    pub evaluate: EvaluateFn,
}

impl std::fmt::Debug for CheckDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDef")
            .field("rule_code", &self.rule_code)
            .field("check_id", &self.check_id)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// What a predicate may consult besides the block itself.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'g> {
    resolver: Resolver<'g>,
}

impl<'g> EvalContext<'g> {
    pub fn new(resolver: Resolver<'g>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver<'g> {
        &self.resolver
    }

    /// The attribute's value with every reference resolved, or `None` if absent.
    pub fn resolved(&self, block: &Block, name: &str) -> Option<Value> {
        block
            .get_attribute(name)
            .map(|attr| self.resolver.resolve(&attr.value))
    }

    pub fn normalized(&self, block: &Block, name: &str, expect: Expect) -> Option<Normalized> {
        self.resolved(block, name).map(|v| normalize(&v, expect))
    }

    /// Candidates from every present attribute in `names`, as one list.
    /// `None` when none of them is present.
    pub fn candidates_from(&self, block: &Block, names: &[&str]) -> Option<Normalized> {
        let parts: Vec<Normalized> = names
            .iter()
            .filter_map(|name| self.normalized(block, name, Expect::List))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(Normalized::concat(parts))
        }
    }
}

static REGISTRY: LazyLock<Vec<&'static CheckDef>> = LazyLock::new(|| {
    let mut checks: Vec<&'static CheckDef> = Vec::new();

    #[cfg(feature = "provider-azure")]
    {
        checks.push(&network_exposure::AZURE_NO_PUBLIC_RDP);
        checks.push(&network_exposure::AZURE_NO_PUBLIC_SSH);
        checks.push(&azure_storage::STORAGE_HTTPS);
        checks.push(&azure_storage::STORAGE_MIN_TLS);
        checks.push(&azure_database::PUBLIC_FIREWALL);
        checks.push(&azure_keyvault::NETWORK_ACL_DENY);
    }

    #[cfg(feature = "provider-aws")]
    {
        checks.push(&aws_security_group::PUBLIC_INGRESS);
        checks.push(&aws_security_group::PUBLIC_EGRESS);
        checks.push(&aws_s3::PUBLIC_ACL);
        checks.push(&aws_rds::PUBLIC_DB);
    }

    #[cfg(feature = "provider-gcp")]
    {
        checks.push(&gcp_firewall::PUBLIC_INGRESS);
    }

    checks
});

/// Every compiled-in check, in registration order.
pub fn registry() -> &'static [&'static CheckDef] {
    REGISTRY.as_slice()
}

/// Find a check by rule code (case-insensitive) or check id.
pub fn lookup(identifier: &str) -> Option<&'static CheckDef> {
    registry()
        .iter()
        .copied()
        .find(|c| c.rule_code.eq_ignore_ascii_case(identifier) || c.check_id == identifier)
}
