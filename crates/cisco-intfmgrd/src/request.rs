//! Reconciliation requests read from YAML.
//!
//! ```yaml
//! interface: FastEthernet0/1
//! current: { description: a, speed: 10, duplex: half }
//! desired: { speed: auto, duplex: auto }
//! ```

use netdev_cfgmgr_common::{CfgMgrError, CfgMgrResult};
use serde::{Deserialize, Serialize};

use crate::property::PropertySet;

/// Observed and desired state of one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceRequest {
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub current: PropertySet,
    #[serde(default)]
    pub desired: PropertySet,
}

impl InterfaceRequest {
    /// Parses a request document.
    pub fn from_yaml(doc: &str) -> CfgMgrResult<Self> {
        serde_yaml::from_str(doc).map_err(|e| CfgMgrError::invalid_config("request", e.to_string()))
    }

    /// Interface name to configure; `name_override` wins over the document.
    ///
    /// The name ends up on the device command line, so it must be a single
    /// non-empty line.
    pub fn interface_name(&self, name_override: Option<&str>) -> CfgMgrResult<String> {
        let name = name_override
            .or(self.interface.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if name.is_empty() {
            return Err(CfgMgrError::invalid_config(
                "interface",
                "no interface name given",
            ));
        }
        if name.contains(['\n', '\r']) {
            return Err(CfgMgrError::invalid_config(
                "interface",
                format!("'{}' spans several lines", name.escape_debug()),
            ));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Property, PropertyValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_request() {
        let doc = r#"
interface: FastEthernet0/1
current:
  duplex: half
  speed: 10
desired:
  duplex: auto
  speed: auto
"#;
        let request = InterfaceRequest::from_yaml(doc).unwrap();

        assert_eq!(request.interface.as_deref(), Some("FastEthernet0/1"));
        assert_eq!(request.current[&Property::Speed], PropertyValue::text("10"));
        assert_eq!(request.desired[&Property::Duplex], PropertyValue::text("auto"));
    }

    #[test]
    fn test_sections_default_to_empty() {
        let request = InterfaceRequest::from_yaml("interface: Gi0/1").unwrap();
        assert!(request.current.is_empty());
        assert!(request.desired.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = InterfaceRequest::from_yaml("interfaces: Gi0/1").unwrap_err();
        assert!(matches!(err, CfgMgrError::InvalidConfig { .. }));
    }

    #[test]
    fn test_interface_name_override() {
        let request = InterfaceRequest::from_yaml("interface: Gi0/1").unwrap();

        assert_eq!(request.interface_name(None).unwrap(), "Gi0/1");
        assert_eq!(request.interface_name(Some("Gi0/2")).unwrap(), "Gi0/2");
    }

    #[test]
    fn test_interface_name_required() {
        let request = InterfaceRequest::default();
        assert!(request.interface_name(None).is_err());
        assert!(request.interface_name(Some("  ")).is_err());
        assert!(request.interface_name(Some("Gi0/1\nreload")).is_err());
    }
}
