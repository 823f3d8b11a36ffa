//! Business operations layered on top of the basic vocabulary.

use crate::error::ValidationError;
use crate::model::contrib::Contributions;
use crate::model::event::SubspaceOpEvent;
use crate::model::ops_spec::DEFAULT_SUBSPACE_OPS;
use crate::validate::registry::OpRegistry;

/// Publish a model.
pub const OP_MODEL: &str = "model";
/// Contribute a dataset.
pub const OP_DATA: &str = "data";
/// Contribute compute.
pub const OP_COMPUTE: &str = "compute";
/// Contribute an algorithm.
pub const OP_ALGO: &str = "algo";
/// Validate another contribution.
pub const OP_VALID: &str = "valid";

/// Business vocabulary, numbered after the basic four.
pub const BUSINESS_OPS: &str = "model=5,data=6,compute=7,algo=8,valid=9";

const BUSINESS_OP_NAMES: [&str; 5] = [OP_MODEL, OP_DATA, OP_COMPUTE, OP_ALGO, OP_VALID];

/// Basic plus business vocabulary.
pub fn all_ops() -> String {
    format!("{},{}", DEFAULT_SUBSPACE_OPS, BUSINESS_OPS)
}

/// Whether `operation` is one of the business operations.
pub fn is_business_op(operation: &str) -> bool {
    BUSINESS_OP_NAMES.contains(&operation)
}

/// Contribution weights, when present, must parse.
pub fn validate_business_op(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    if let Some(contrib) = &event.contributions {
        Contributions::parse(contrib)?;
    }
    Ok(())
}

/// Registers [`validate_business_op`] for every business operation.
pub fn register(registry: &mut OpRegistry) {
    for op in BUSINESS_OP_NAMES {
        registry.register(op, validate_business_op);
    }
}

/// The basic registry extended with the business operations.
pub fn business_registry() -> OpRegistry {
    let mut registry = OpRegistry::basic();
    register(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::OpEventBuilder;
    use crate::model::ops_spec::OpsSpec;

    #[test]
    fn test_all_ops_is_a_valid_spec() {
        let spec = OpsSpec::parse(&all_ops()).unwrap();
        assert_eq!(spec.len(), 9);
        for op in BUSINESS_OP_NAMES {
            assert!(spec.contains(op));
        }
        assert_eq!(
            all_ops(),
            "post=1,propose=2,vote=3,invite=4,model=5,data=6,compute=7,algo=8,valid=9"
        );
    }

    #[test]
    fn test_business_registry() {
        let registry = business_registry();
        assert_eq!(registry.operations().len(), 9);
        assert!(is_business_op("compute"));
        assert!(!is_business_op("post"));

        let ok = OpEventBuilder::new("0x", OP_MODEL)
            .parent("parent-hash")
            .contributions("base:0.1,data:0.6,algo:0.3")
            .build();
        assert!(registry.validate(&ok).is_ok());

        let bare = OpEventBuilder::new("0x", OP_DATA).build();
        assert!(registry.validate(&bare).is_ok());

        let bad = OpEventBuilder::new("0x", OP_ALGO).contributions("base=0.1").build();
        assert!(matches!(
            registry.validate(&bad),
            Err(ValidationError::InvalidContributions { .. })
        ));
    }
}
