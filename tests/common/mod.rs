// Shared fixtures for archlens integration tests
#![allow(dead_code)]

use archlens::classification::{ClassificationResults, Classifier};
use archlens::config::ClassificationConfig;
use archlens::graph::{ApplicationGraph, GraphBuilder, TypeForm, TypeRef};
use archlens::semantic::{SemanticModel, SourceField, SourceMethod, SourceType};
use std::path::PathBuf;

pub fn model(types: Vec<SourceType>) -> SemanticModel {
    SemanticModel {
        root_package: Some("shop".to_string()),
        types,
        ..Default::default()
    }
}

pub fn build(types: Vec<SourceType>) -> ApplicationGraph {
    GraphBuilder::new()
        .build(&model(types))
        .expect("fixture model should build")
}

pub fn classify_with(graph: &ApplicationGraph, explicit: &[(&str, &str)]) -> ClassificationResults {
    let config = explicit
        .iter()
        .fold(ClassificationConfig::default(), |config, (name, kind)| {
            config.with_explicit(*name, *kind)
        });
    Classifier::new(&config)
        .expect("fixture config should compile")
        .classify(graph)
}

pub fn field(name: &str, type_name: &str) -> SourceField {
    SourceField::private_final(name, TypeRef::new(type_name))
}

/// A small order-management codebase:
/// an aggregate with an identifier, a repository port with a JPA adapter,
/// a payment gateway consumed by an application service and a REST controller.
pub fn shop_model() -> SemanticModel {
    model(vec![
        SourceType::new("shop.order.domain.Order", TypeForm::Class)
            .with_field(field("id", "shop.order.domain.OrderId"))
            .with_field(field("total", "shop.order.domain.Money")),
        SourceType::new("shop.order.domain.OrderId", TypeForm::Record)
            .with_field(field("value", "java.util.UUID")),
        SourceType::new("shop.order.domain.Money", TypeForm::Record)
            .with_field(field("amount", "java.math.BigDecimal")),
        SourceType::new("shop.order.domain.OrderRepository", TypeForm::Interface).with_method(
            SourceMethod::new("save", TypeRef::void())
                .with_parameter("order", TypeRef::new("shop.order.domain.Order")),
        ),
        SourceType::new("shop.order.domain.PaymentGateway", TypeForm::Interface).with_method(
            SourceMethod::new("charge", TypeRef::void())
                .with_parameter("amount", TypeRef::new("shop.order.domain.Money")),
        ),
        SourceType::new("shop.order.application.OrderService", TypeForm::Class)
            .with_field(field("orders", "shop.order.domain.OrderRepository"))
            .with_field(field("payments", "shop.order.domain.PaymentGateway")),
        SourceType::new("shop.order.infrastructure.JpaOrderRepository", TypeForm::Class)
            .implementing("shop.order.domain.OrderRepository"),
        SourceType::new("shop.order.infrastructure.StripePaymentGateway", TypeForm::Class)
            .implementing("shop.order.domain.PaymentGateway"),
        SourceType::new("shop.order.web.OrderController", TypeForm::Class)
            .annotated("org.springframework.web.bind.annotation.RestController")
            .with_field(field("service", "shop.order.application.OrderService")),
    ])
}

/// Write `model` as JSON into a fresh temp dir and return both
pub fn write_model(model: &SemanticModel) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("model.json");
    let json = serde_json::to_string_pretty(model).expect("model should serialize");
    std::fs::write(&path, json).expect("Failed to write model");
    (dir, path)
}
