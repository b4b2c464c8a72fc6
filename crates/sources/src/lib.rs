//! cncsnap-sources: Field collector implementations for cncsnap.

mod dynamic;
mod identifier;
mod machine;
mod parameter;
mod program;
mod simulated;
mod status;

pub use dynamic::DynamicCollector;
pub use identifier::{format_identifier, IdentifierCollector};
pub use machine::{AxisNamesCollector, MachineInfoCollector};
pub use parameter::ParameterCollector;
pub use program::ProgramCollector;
pub use simulated::{DeviceCall, SimulatedDevice, SimulatedState};
pub use status::{DerivedStatusCollector, RawStatusCollector};

use cncsnap_core::Registry;
use once_cell::sync::Lazy;

/// Registry holding every built-in collector
static BUILTIN_REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new();
    register_all(&mut registry);
    registry
});

/// Shared registry of built-in collectors
pub fn builtin_registry() -> &'static Registry {
    &BUILTIN_REGISTRY
}

/// Register all built-in collectors with `registry`
pub fn register_all(registry: &mut Registry) {
    registry.register_collector("identifier", "Identifier", &[], |_| {
        Box::new(IdentifierCollector::new())
    });

    registry.register_collector("parameter", "Parameters", &[], |config| {
        Box::new(ParameterCollector::new(config.parameters.clone()))
    });

    registry.register_collector("machine_info", "Machine Info", &[], |_| {
        Box::new(MachineInfoCollector::new())
    });

    registry.register_collector("axis_names", "Axis Names", &[], |_| {
        Box::new(AxisNamesCollector::new())
    });

    registry.register_collector("raw_status", "Raw Status", &[], |_| {
        Box::new(RawStatusCollector::new())
    });

    // Derived fields read raw_status from the same generation
    registry.register_collector("execution", "Execution", &["raw_status"], |_| {
        Box::new(DerivedStatusCollector::execution())
    });

    registry.register_collector("mode", "Mode", &["raw_status"], |_| {
        Box::new(DerivedStatusCollector::mode())
    });

    registry.register_collector("emergency", "Emergency", &["raw_status"], |_| {
        Box::new(DerivedStatusCollector::emergency())
    });

    registry.register_collector("dynamic", "Dynamic Data", &[], |_| {
        Box::new(DynamicCollector::new())
    });

    registry.register_collector("program", "Program", &[], |_| {
        Box::new(ProgramCollector::new())
    });
}
