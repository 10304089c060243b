//! Hierarchy expansion.
//!
//! Turns a forest of authority specs into a flat list of key pairs, each
//! authority immediately followed by its signed certs in declaration order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::generate::{issue, Issued};
use crate::types::{CertificateSpec, KeyPair};

/// How children of an authority are signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningMode {
    /// Every node signs itself; children are only grouped under their
    /// authority.
    #[default]
    SelfSigned,
    /// Children are signed by their authority's key.
    Chained,
}

/// Expands specs into key pairs with every node self-signed.
///
/// # Errors
///
/// Returns the first generation error. Pairs generated before the failure
/// are discarded.
pub fn expand(specs: &[CertificateSpec]) -> Result<Vec<KeyPair>> {
    expand_with(specs, SigningMode::SelfSigned)
}

/// Expands specs into key pairs using the given signing mode.
///
/// Children are only visited for authorities.
///
/// # Errors
///
/// Returns the first generation error. Pairs generated before the failure
/// are discarded.
pub fn expand_with(specs: &[CertificateSpec], mode: SigningMode) -> Result<Vec<KeyPair>> {
    let mut pairs = Vec::with_capacity(flatten(specs).len());

    for spec in specs {
        let authority = issue(spec, None)?;

        if spec.is_ca {
            let children = spec
                .signed_certs
                .iter()
                .map(|child| {
                    let parent: Option<&Issued> = match mode {
                        SigningMode::SelfSigned => None,
                        SigningMode::Chained => Some(&authority),
                    };
                    issue(child, parent).map(Issued::into_pair)
                })
                .collect::<Result<Vec<_>>>()?;

            debug!(
                common_name = %spec.common_name,
                children = children.len(),
                "expanded authority"
            );
            pairs.push(authority.into_pair());
            pairs.extend(children);
        } else {
            pairs.push(authority.into_pair());
        }
    }

    Ok(pairs)
}

/// Lists the nodes [`expand`] visits, in the order it emits their pairs.
#[must_use]
pub fn flatten(specs: &[CertificateSpec]) -> Vec<&CertificateSpec> {
    let mut nodes = Vec::new();
    for spec in specs {
        nodes.push(spec);
        if spec.is_ca {
            nodes.extend(spec.signed_certs.iter());
        }
    }
    nodes
}
