//! Built-in classification criteria.
//!
//! Registration order matters: when two criteria tie on priority and
//! confidence with compatible kinds, the earlier one wins.

pub mod domain;
pub mod model;
pub mod port;
pub mod support;

use std::sync::Arc;

use super::anchors::AnchorContext;
use super::criterion::Criterion;
use super::interface_facts::InterfaceFactsIndex;

pub use domain::{
    EmbeddedValueObjectCriterion, ExplicitDomainAnnotationCriterion,
    IdentityEntityCriterion, ImplementsDomainTypeCriterion, InheritedClassificationCriterion,
    NamingDomainEventCriterion, RecordSingleIdCriterion, RepositoryDominantCriterion,
};
pub use model::ModelNamingCriterion;
pub use port::{
    CommandPatternCriterion, ExplicitPortAnnotationCriterion, InjectedAsDependencyCriterion,
    PackageDirectionCriterion, PortNamingCriterion, QueryPatternCriterion,
    SemanticDrivenPortCriterion, SemanticDrivingPortCriterion, SignatureBasedDrivenPortCriterion,
};

fn boxed<C: Criterion + 'static>(criteria: Vec<C>) -> impl Iterator<Item = Box<dyn Criterion>> {
    criteria
        .into_iter()
        .map(|c| Box::new(c) as Box<dyn Criterion>)
}

pub fn domain_criteria() -> Vec<Box<dyn Criterion>> {
    let mut criteria: Vec<Box<dyn Criterion>> = Vec::new();
    criteria.extend(boxed(ExplicitDomainAnnotationCriterion::all()));
    criteria.extend(boxed(ImplementsDomainTypeCriterion::all()));
    criteria.push(Box::new(RepositoryDominantCriterion));
    criteria.push(Box::new(RecordSingleIdCriterion));
    criteria.extend(boxed(InheritedClassificationCriterion::all()));
    criteria.push(Box::new(EmbeddedValueObjectCriterion));
    criteria.push(Box::new(NamingDomainEventCriterion));
    criteria.push(Box::new(IdentityEntityCriterion));
    criteria
}

pub fn port_criteria(
    facts: &Arc<InterfaceFactsIndex>,
    anchors: &Arc<AnchorContext>,
) -> Vec<Box<dyn Criterion>> {
    let mut criteria: Vec<Box<dyn Criterion>> = Vec::new();
    criteria.extend(boxed(ExplicitPortAnnotationCriterion::all()));
    criteria.push(Box::new(SemanticDrivingPortCriterion::new(Arc::clone(facts))));
    criteria.extend(boxed(SemanticDrivenPortCriterion::all(facts)));
    criteria.extend(boxed(PortNamingCriterion::all()));
    criteria.push(Box::new(CommandPatternCriterion));
    criteria.push(Box::new(QueryPatternCriterion));
    criteria.push(Box::new(InjectedAsDependencyCriterion::new(Arc::clone(anchors))));
    criteria.push(Box::new(SignatureBasedDrivenPortCriterion));
    criteria.push(Box::new(PackageDirectionCriterion::inbound()));
    criteria.push(Box::new(PackageDirectionCriterion::outbound()));
    criteria
}

pub fn model_criteria() -> Vec<Box<dyn Criterion>> {
    boxed(ModelNamingCriterion::all()).collect()
}

/// Every built-in criterion: domain, then port, then model
pub fn default_criteria(
    facts: Arc<InterfaceFactsIndex>,
    anchors: Arc<AnchorContext>,
) -> Vec<Box<dyn Criterion>> {
    let mut criteria = domain_criteria();
    criteria.extend(port_criteria(&facts, &anchors));
    criteria.extend(model_criteria());
    criteria
}
