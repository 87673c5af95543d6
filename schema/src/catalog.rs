//! Built-in minimal catalog.
//!
//! A small capture of the emulated host's core type hierarchy, enough to run
//! a session without an artifact on disk. Real deployments load a full
//! artifact generated against the target application release instead.

use crate::builder::SchemaBuilder;
use crate::store::SchemaStore;
use crate::types::AttrDef;
use mayamock_core::{AttrType, Value};

fn vec3(x: f64, y: f64, z: f64) -> Value {
    Value::List(vec![Value::Float(x), Value::Float(y), Value::Float(z)])
}

impl SchemaStore {
    /// Built-in minimal catalog mirroring the host's core hierarchy:
    /// `node` <- `dagNode` <- `transform`/`mesh`, plus a few DG utility
    /// types. Abstract bases cannot be instantiated, as in the host.
    pub fn minimal() -> SchemaStore {
        let mut builder = SchemaBuilder::new("2020");

        builder
            .node_type("node")
            .abstract_type()
            .attr(AttrDef::new("message", AttrType::Message).read_only())
            .attr(AttrDef::new("caching", AttrType::Bool))
            .attr(AttrDef::new(
                "nodeState",
                AttrType::Enum {
                    fields: vec![
                        "normal".to_string(),
                        "hasNoEffect".to_string(),
                        "blocking".to_string(),
                    ],
                },
            ))
            .done()
            .expect("builtin catalog");

        builder
            .node_type("dagNode")
            .abstract_type()
            .extends("node")
            .attr(AttrDef::new("visibility", AttrType::Bool).with_default(true))
            .attr(AttrDef::new("intermediateObject", AttrType::Bool))
            .done()
            .expect("builtin catalog");

        let float3 = || AttrType::Array(Box::new(AttrType::Float));
        builder
            .node_type("transform")
            .extends("dagNode")
            .attr(AttrDef::new("translate", float3()).with_default(vec3(0.0, 0.0, 0.0)))
            .attr(AttrDef::new("translateX", AttrType::Float))
            .attr(AttrDef::new("translateY", AttrType::Float))
            .attr(AttrDef::new("translateZ", AttrType::Float))
            .attr(AttrDef::new("rotate", float3()).with_default(vec3(0.0, 0.0, 0.0)))
            .attr(AttrDef::new("rotateX", AttrType::Float))
            .attr(AttrDef::new("rotateY", AttrType::Float))
            .attr(AttrDef::new("rotateZ", AttrType::Float))
            .attr(AttrDef::new("scale", float3()).with_default(vec3(1.0, 1.0, 1.0)))
            .attr(AttrDef::new("scaleX", AttrType::Float).with_default(1.0))
            .attr(AttrDef::new("scaleY", AttrType::Float).with_default(1.0))
            .attr(AttrDef::new("scaleZ", AttrType::Float).with_default(1.0))
            .done()
            .expect("builtin catalog");

        builder
            .node_type("mesh")
            .extends("dagNode")
            .attr(AttrDef::new("inMesh", AttrType::Message))
            .attr(AttrDef::new("displayColors", AttrType::Bool))
            .done()
            .expect("builtin catalog");

        builder
            .node_type("polyCube")
            .extends("node")
            .attr(AttrDef::new("width", AttrType::Float).with_default(1.0))
            .attr(AttrDef::new("height", AttrType::Float).with_default(1.0))
            .attr(AttrDef::new("depth", AttrType::Float).with_default(1.0))
            .attr(AttrDef::new("output", AttrType::Message).read_only())
            .done()
            .expect("builtin catalog");

        builder
            .node_type("multiplyDivide")
            .extends("node")
            .attr(AttrDef::new(
                "operation",
                AttrType::Enum {
                    fields: vec![
                        "noOperation".to_string(),
                        "multiply".to_string(),
                        "divide".to_string(),
                        "power".to_string(),
                    ],
                },
            ))
            .attr(AttrDef::new("input1X", AttrType::Float))
            .attr(AttrDef::new("input2X", AttrType::Float))
            .attr(AttrDef::new("outputX", AttrType::Float).read_only())
            .done()
            .expect("builtin catalog");

        builder
            .node_type("plusMinusAverage")
            .extends("node")
            .attr(AttrDef::new("input1D", AttrType::Float).multi())
            .attr(AttrDef::new("output1D", AttrType::Float).read_only())
            .done()
            .expect("builtin catalog");

        builder
            .node_type("time")
            .extends("node")
            .attr(AttrDef::new("outTime", AttrType::Float))
            .done()
            .expect("builtin catalog");

        builder.build().expect("builtin catalog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_catalog_builds() {
        let store = SchemaStore::minimal();
        assert_eq!(store.version(), "2020");
        assert!(store.has_type("transform"));
        assert!(store.resolve_type("node").unwrap().is_abstract);
    }

    #[test]
    fn test_transform_inherits_dag_and_node_attrs() {
        let store = SchemaStore::minimal();
        let attrs = store.resolved_attrs("transform").unwrap();
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert!(names.contains(&"message"));
        assert!(names.contains(&"visibility"));
        assert!(names.contains(&"translateX"));
    }

    #[test]
    fn test_translate_default_is_zero_vector() {
        let store = SchemaStore::minimal();
        let translate = store.resolved_attr("transform", "translate").unwrap().unwrap();
        assert_eq!(
            translate.default,
            Value::List(vec![Value::Float(0.0), Value::Float(0.0), Value::Float(0.0)])
        );
    }
}
