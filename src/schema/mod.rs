//! Schema model consumed by the validators: ports, fields, node-type registry.

pub mod fields;
pub mod ports;
pub mod registry;

pub use fields::{FieldDescriptor, FieldKind, Pattern};
pub use ports::{DataType, Endpoint, Port, PortDirection, PortRule};
pub use registry::{NodeTypeRegistry, NodeTypeSpec, WizardStep};
